use lectern::{
    cli::Cli,
    config::{Config, get_app_data_prefix},
    document::Document,
    i18n::LocalizationStore,
    logging::{self, LogLevel},
    state::{MemoryStore, PreferenceStore, State},
    ui::{app::App, board::dump_program},
    viewer::{Startup, Viewer},
};

use clap::Parser;
use eyre::Result;
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it logs to a file.
    let interactive = !cli.dump && !cli.reset_language;
    let log_file = interactive
        .then(|| get_app_data_prefix().ok())
        .flatten()
        .map(|prefix| prefix.join("lectern.log"));
    logging::init(LogLevel::from_verbosity(cli.verbose, cli.debug), log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path.clone())?,
        None => match Config::new() {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Warning: Could not load configuration: {err}");
                eprintln!("Starting with default settings");
                Config::load_from(PathBuf::new())?
            }
        },
    };

    let document = match &cli.program {
        Some(path) => Document::load(path)?,
        None => Document::bundled()?,
    };
    let translations = match &cli.translations {
        Some(path) => LocalizationStore::load(path)?,
        None => LocalizationStore::bundled()?,
    };
    let persistence = open_persistence(cli.no_persist);

    let mut viewer = Viewer::new(document, translations, persistence, &config.settings.product)?;
    info!(
        sections = viewer.navigator().len(),
        product = config.settings.product.as_str(),
        "Program loaded"
    );

    if cli.reset_language {
        viewer.reset_language()?;
        println!("Stored language cleared ({})", viewer.language_key());
        return Ok(());
    }

    if cli.dump {
        dump(&mut viewer, &config, cli.lang.as_deref());
        return Ok(());
    }

    if let Startup::Restored(code) = viewer.start() {
        info!(language = code.as_str(), "Starting in stored language");
    }
    let mut app = App::new(viewer, &config);
    app.run()
}

fn open_persistence(no_persist: bool) -> Box<dyn PreferenceStore> {
    if no_persist {
        return Box::new(MemoryStore::new());
    }
    match State::new() {
        Ok(state) => Box::new(state),
        Err(err) => {
            warn!("Preferences will not be kept: {err}");
            Box::new(MemoryStore::new())
        }
    }
}

/// Print the program in the requested language, or the stored one, without
/// storing anything.
fn dump<P: PreferenceStore>(viewer: &mut Viewer<P>, config: &Config, lang: Option<&str>) {
    let code = match lang {
        Some(code) => Some(code.to_string()),
        None => viewer.saved_language().unwrap_or_else(|err| {
            warn!("Could not read stored language: {err}");
            None
        }),
    };
    if let Some(code) = code {
        viewer.apply_language(&code);
    }
    let width = config.settings.text_width(viewer.document().font_size());
    print!("{}", dump_program(viewer.document(), width));
}
