mod config;
mod editor;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::SetCursorStyle,
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{io, time::Duration};
use tui::{backend::CrosstermBackend, Terminal};

use editor::Editor;

/// Modus - a small modal text editor for the terminal
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Cli {
    /// File to open
    #[clap(name = "FILE")]
    file: Option<String>,
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut editor: Editor,
) -> Result<()> {
    // Track the applied cursor shape so it only changes on mode switches.
    let mut applied_style = None;

    loop {
        let style = editor.cursor_style();
        if applied_style != Some(style) {
            execute!(io::stdout(), style.terminal_style())?;
            applied_style = Some(style);
        }

        let mut viewport_update = None;
        terminal.draw(|f| {
            viewport_update = ui::render(f, &editor);
        })?;

        // Feed the measured text-area size back before the next scroll.
        if let Some(update) = viewport_update {
            editor.viewport.resize(update.width, update.height);
            editor.sync_viewport();
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                let consumed = editor.handle_key(key)?;
                if !consumed {
                    log::debug!("Key {:?} not consumed by {} mode", key.code, editor.mode.name());
                }
                if editor.should_quit {
                    return Ok(());
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Ok(log_path) = std::env::var("MODUS_LOG") {
        simple_logging::log_to_file(&log_path, log::LevelFilter::Debug)
            .with_context(|| format!("Failed to open log file: {}", log_path))?;
    }

    let config = config::Config::load();

    let mut editor = Editor::with_config(config);
    if let Some(file_path) = &cli.file {
        editor.load_file(file_path)?;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, editor);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        SetCursorStyle::DefaultUserShape
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}
