//! Events sheet navigator - Entry Point

use clap::Parser;
use evsheet::model::AppError;
use evsheet::session::SheetSession;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Prints the outline of an events sheet, optionally searching it first
#[derive(Parser, Debug)]
#[command(name = "evsheet")]
#[command(version)]
#[command(about = "Search, replace and browse events sheets from the terminal")]
pub struct Args {
    /// Path to the JSON sheet (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Text to search for
    #[arg(short, long)]
    pub search: Option<String>,

    /// Replace every occurrence of the search text with this text
    #[arg(short, long, requires = "search")]
    pub replace: Option<String>,

    /// Case-sensitive search
    #[arg(long)]
    pub match_case: bool,

    /// Unfold events down to this depth before printing
    #[arg(short, long)]
    pub unfold_level: Option<usize>,

    /// Viewport height in lines (must be positive)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Move to the Nth search result before printing
    #[arg(short, long, default_value = "1")]
    pub next: usize,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = evsheet::config::load_config_with_precedence(args.config.clone())?;
        let merged = evsheet::config::merge_config(config_file);
        let with_env = evsheet::config::apply_env_overrides(merged);

        // Only an explicit flag overrides the configured case sensitivity.
        let match_case_override = args.match_case.then_some(true);
        let height_override = args.height.map(|height| height as usize);
        evsheet::config::apply_cli_overrides(with_env, match_case_override, height_override)
    };

    evsheet::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let input_source = evsheet::source::detect_input_source(args.file.clone())?;
    let sheet = evsheet::source::load_sheet(input_source)?;

    let mut session = SheetSession::new(sheet, (&config).into());
    if let Some(level) = args.unfold_level {
        session.unfold_to_level(level);
    }

    let mut stdout = std::io::stdout().lock();
    if let Some(text) = &args.search {
        let inputs = config.search_inputs(text.as_str());
        match &args.replace {
            Some(replacement) => {
                let modified = session.replace(&inputs.replace_with(replacement.as_str()));
                writeln!(stdout, "{} event(s) modified", modified.len())?;
            }
            None => {
                let count = session.search(&inputs);
                writeln!(stdout, "{count} event(s) found")?;
                for _ in 0..args.next {
                    session.go_to_next_search_result();
                }
            }
        }
    }

    session.on_rendered();
    writeln!(stdout, "{}", session.visible_outline())?;
    Ok(())
}
