use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::editor::Editor;

/// Text-area dimensions measured during a draw; the caller feeds them back
/// into the editor's viewport so scrolling math matches the screen.
pub struct ViewportUpdate {
    pub width: usize,
    pub height: usize,
}

pub fn render<B: Backend>(f: &mut Frame<B>, editor: &Editor) -> Option<ViewportUpdate> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Text area
            Constraint::Length(1), // Status line
        ])
        .split(f.size());

    let viewport_update = render_text_area(f, editor, chunks[0]);
    render_status_line(f, editor, chunks[1]);

    viewport_update
}

/// Width of the line-number gutter, including its trailing space.
fn gutter_width(editor: &Editor) -> usize {
    if !editor.config.line_numbers {
        return 0;
    }
    editor.buffer.line_count().to_string().len() + 1
}

fn render_text_area<B: Backend>(
    f: &mut Frame<B>,
    editor: &Editor,
    area: Rect,
) -> Option<ViewportUpdate> {
    let gutter = gutter_width(editor);
    let text_width = (area.width as usize).saturating_sub(gutter);
    let text_height = area.height as usize;

    let viewport = &editor.viewport;
    let number_style = Style::default().fg(Color::DarkGray);

    let mut lines = Vec::new();
    for row in viewport.visible_rows(editor.buffer.line_count()) {
        let visible: String = editor
            .buffer
            .line(row)
            .chars()
            .skip(viewport.col_offset)
            .take(text_width)
            .collect();

        let mut spans = Vec::new();
        if gutter > 0 {
            spans.push(Span::styled(
                format!("{:>width$} ", row + 1, width = gutter - 1),
                number_style,
            ));
        }
        spans.push(Span::raw(visible));
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), area);

    // Place the terminal cursor; its shape comes from the editor's style
    // stack and is applied outside the draw call.
    let column = editor.cursor.column(&editor.buffer);
    if editor.cursor.y >= viewport.row_offset && column >= viewport.col_offset {
        let x = area.x as usize + gutter + column - viewport.col_offset;
        let y = area.y as usize + editor.cursor.y - viewport.row_offset;
        if x < (area.x + area.width) as usize && y < (area.y + area.height) as usize {
            f.set_cursor(x as u16, y as u16);
        }
    }

    if text_width != viewport.width || text_height != viewport.height {
        Some(ViewportUpdate {
            width: text_width,
            height: text_height,
        })
    } else {
        None
    }
}

fn render_status_line<B: Backend>(f: &mut Frame<B>, editor: &Editor, area: Rect) {
    let theme = &editor.config.theme;
    let bar_style = Style::default()
        .bg(parse_color(&theme.status_line_bg, Color::DarkGray))
        .fg(parse_color(&theme.status_line_fg, Color::White));

    let file = editor
        .buffer
        .file_path
        .as_deref()
        .unwrap_or("[No Name]");
    let modified = if editor.buffer.is_modified { " [+]" } else { "" };

    let left = Line::from(vec![
        Span::styled(
            format!(" {} ", editor.mode.name().to_uppercase()),
            bar_style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}{}", file, modified), bar_style),
        Span::styled(format!("  {}", editor.status_message), bar_style),
    ]);
    f.render_widget(Paragraph::new(left).style(bar_style), area);

    let position = format!(
        "{}:{} ",
        editor.cursor.y + 1,
        editor.cursor.column(&editor.buffer) + 1
    );
    f.render_widget(
        Paragraph::new(position)
            .style(bar_style)
            .alignment(Alignment::Right),
        area,
    );
}

/// Parse a "#rrggbb" theme value, falling back when it does not parse.
fn parse_color(hex: &str, fallback: Color) -> Color {
    let digits = match hex.strip_prefix('#') {
        Some(d) if d.len() == 6 => d,
        _ => return fallback,
    };
    match (
        u8::from_str_radix(&digits[0..2], 16),
        u8::from_str_radix(&digits[2..4], 16),
        u8::from_str_radix(&digits[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
        _ => fallback,
    }
}
