use std::io::{self, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;

use jot::app::Editor;
use jot::config::Config;
use jot::services::storage::FileStore;
use jot::services::tracing_setup;

/// A terminal rich-text jotter
#[derive(Parser, Debug)]
#[command(name = "jot")]
#[command(about = "A rich-text jotter with markdown-style typing shortcuts", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for editor diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Directory for the document store (default: user data dir)
    #[arg(long, value_name = "PATH")]
    store_dir: Option<PathBuf>,

    /// Don't load the previously saved document (start empty)
    #[arg(long)]
    no_restore: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

type Term = Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>;

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(tracing_setup::default_log_path);
    tracing_setup::init_global(&log_file);
    tracing::info!("Editor starting");

    let config = if let Some(config_path) = &args.config {
        Config::load_from_file(config_path)?
    } else {
        Config::load_default()
    };

    // Handle --dump-config early (no terminal setup needed)
    if args.dump_config {
        let json =
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    let store_root = args
        .store_dir
        .clone()
        .or_else(|| config.storage.store_dir.clone())
        .unwrap_or_else(FileStore::default_root);
    let store = FileStore::open(&store_root).context("Failed to open document store")?;
    tracing::info!("Document store at {}", store_root.display());

    let restore = config.editor.restore_on_start && !args.no_restore;
    let mut editor = Editor::new(&config, Box::new(store), restore);

    install_panic_hook();
    let mut terminal = setup_terminal().context("Failed to initialize terminal")?;
    let result = run_event_loop(&mut editor, &mut terminal);
    restore_terminal();

    result.context("Editor loop returned an error")
}

fn setup_terminal() -> Result<Term> {
    terminal::enable_raw_mode()?;
    execute!(
        stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let mut terminal = Terminal::new(ratatui::backend::CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal() {
    let _ = execute!(
        stdout(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        restore_terminal();
        original_hook(panic);
    }));
}

/// Main event loop: draw, read one event, dispatch, repeat. Everything runs
/// synchronously on this thread; each event is handled to completion before
/// the next is read.
fn run_event_loop(editor: &mut Editor, terminal: &mut Term) -> Result<()> {
    loop {
        terminal.draw(|frame| editor.render(frame))?;

        match event::read()? {
            Event::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press {
                    tracing::trace!(
                        "Key event: code={:?}, modifiers={:?}",
                        key_event.code,
                        key_event.modifiers
                    );
                    editor.handle_key(key_event.code, key_event.modifiers);
                }
            }
            Event::Mouse(mouse_event) => {
                editor.handle_mouse(mouse_event);
            }
            Event::Paste(text) => {
                // External paste from terminal (bracketed paste mode)
                editor.paste_text(&text);
            }
            Event::Resize(w, h) => {
                tracing::trace!("Terminal resized to {}x{}", w, h);
            }
            _ => {}
        }

        if editor.should_quit() {
            break;
        }
    }

    Ok(())
}
