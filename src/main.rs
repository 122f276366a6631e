use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tortoise::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    library::SnippetLibrary,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Input, Runner},
    scores::ScoreLog,
    snippet::Snippet,
};
use tracing::{info, warn};

/// typing practice for source code snippets
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type real code snippets in the terminal. Mistakes must be backspaced away before the cursor moves on; newlines auto-indent and tab inserts one indentation unit."
)]
pub struct Cli {
    /// snippet library (json) to use instead of the bundled one
    #[clap(long)]
    snippets: Option<PathBuf>,

    /// start with a specific snippet id
    #[clap(short = 's', long)]
    snippet: Option<u32>,

    /// only practice snippets from this category (repeatable, saved as a preference)
    #[clap(short = 'c', long = "category")]
    categories: Vec<u32>,

    /// practice every category again (clears the saved preference)
    #[clap(long, conflicts_with = "categories")]
    all_categories: bool,

    /// wpm refresh interval in milliseconds
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// write debug logs to this file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// don't append finished scores to the score log
    #[clap(long)]
    no_score_log: bool,

    /// list categories and snippets, then exit
    #[clap(long)]
    list: bool,
}

impl Cli {
    /// Category preferences given on the command line, if any.
    fn category_override(&self) -> Option<Vec<u32>> {
        if self.all_categories {
            Some(vec![])
        } else if !self.categories.is_empty() {
            Some(self.categories.clone())
        } else {
            None
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let mut config = store.load();

    if let Some(path) = cli.log_file.as_ref().or(config.log_file.as_ref()) {
        init_logging(path)?;
    }

    let mut library = match cli.snippets.as_ref().or(config.snippet_file.as_ref()) {
        Some(path) => SnippetLibrary::load(path)?,
        None => SnippetLibrary::bundled()?,
    };

    match cli.category_override() {
        Some(ids) => {
            library.apply_enabled_ids(&ids)?;
            config.enabled_categories = ids;
            store.save(&config)?;
            info!(path = %store.path().display(), "saved category preferences");
        }
        None => {
            if let Err(e) = library.apply_enabled_ids(&config.enabled_categories) {
                warn!("ignoring saved category preferences: {e}");
                library.apply_enabled_ids(&[])?;
            }
        }
    }

    if cli.list {
        print_library(&library);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let tick_rate_ms = cli.tick_rate_ms.unwrap_or(config.tick_rate_ms);
    let score_log = if cli.no_score_log || !config.score_log {
        None
    } else {
        AppDirs::score_log_path().map(ScoreLog::new)
    };

    let mut app = App::new(
        library,
        cli.snippet,
        FixedTicker::from_millis(tick_rate_ms),
        score_log,
    )?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, tick_rate_ms);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_rate_ms: u64,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::from_millis(tick_rate_ms),
    );

    let mut redraw = true;
    loop {
        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }

        redraw = match runner.step() {
            // only a session timer tick changes the live wpm
            AppEvent::Tick => app.refresh_wpm(),
            AppEvent::Resize => true,
            AppEvent::Key(key) => {
                if let Some(input) = Input::from_key(key) {
                    if app.handle(input)? == Control::Quit {
                        break;
                    }
                }
                true
            }
        };
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn print_library(library: &SnippetLibrary) {
    println!("categories:");
    for category in &library.categories {
        let mark = if category.enabled { "x" } else { " " };
        println!("  [{mark}] {:>3}  {}", category.id, category.name);
    }

    println!("snippets:");
    for record in &library.snippets {
        let snippet = Snippet::from_record(record);
        let text = snippet.text();
        let first_line = text.lines().next().unwrap_or_default();
        println!(
            "  {:>3}  (category {})  {}",
            record.id, record.category_id, first_line
        );
    }
}
