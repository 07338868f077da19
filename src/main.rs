//! typeshow - Entry Point

use clap::Parser;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use typeshow::config::{self, KeyBindings, ResolvedConfig};
use typeshow::model::{parse_area_list, AppError, AreaList};
use typeshow::session::{Session, SessionOptions, SessionOutcome, Timing};
use typeshow::view::{CrosstermConsole, Palette, TuiSurface};

/// Exit status after a termination signal (128 + SIGINT).
const EXIT_INTERRUPTED: u8 = 130;

/// typeshow - show a file and type selected lines into it live
#[derive(Parser, Debug)]
#[command(name = "typeshow")]
#[command(version)]
#[command(about = "Show a file in the terminal and simulate typing selected line ranges")]
pub struct Args {
    /// File to present
    pub filename: PathBuf,

    /// Seconds to pause after each typed character (instant if omitted)
    #[arg(long, value_parser = parse_delay)]
    pub delay: Option<f64>,

    /// Line ranges to type, e.g. "5,10-12" (1-based, inclusive)
    #[arg(long, value_parser = parse_area_list)]
    pub areas: Option<AreaList>,

    /// Line shown at the top of the first screen
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: Option<u32>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn parse_delay(raw: &str) -> Result<f64, String> {
    let delay: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    config::valid_delay(delay).ok_or_else(|| format!("delay must be a non-negative number of seconds, got {raw}"))
}

/// Defaults → Config File → Env Vars → CLI Args
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);
    let with_env = config::apply_env_overrides(merged);

    let no_color_override = if args.no_color { Some(true) } else { None };
    let page_override = args.page.map(|page| page as usize);

    Ok(config::apply_cli_overrides(
        with_env,
        args.delay,
        page_override,
        no_color_override,
    ))
}

/// Record a failure that happened before the configured log file is known.
///
/// Goes to the default log path (or `TYPESHOW_LOG_FILE`). Stderr still gets
/// the message when that file cannot be opened.
fn log_startup_error(err: &dyn std::fmt::Display) {
    let fallback = config::apply_env_overrides(ResolvedConfig::default());
    if let Ok(_log) = typeshow::logging::init(&fallback.log_file_path) {
        error!(error = %err, "typeshow failed before logging was configured");
    }
}

fn run(args: Args) -> Result<SessionOutcome, AppError> {
    let resolved = resolve_config(&args).and_then(|config| {
        let palette = Palette::from_scheme(&config.colors, config.no_color)?;
        Ok((config, palette))
    });
    let (config, palette) = match resolved {
        Ok(resolved) => resolved,
        Err(err) => {
            log_startup_error(&err);
            return Err(err);
        }
    };

    let _log = typeshow::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let result = present(&args, &config, palette);
    if let Err(err) = &result {
        error!(error = %err, "typeshow exiting with error");
    }
    result
}

fn present(
    args: &Args,
    config: &ResolvedConfig,
    palette: Palette,
) -> Result<SessionOutcome, AppError> {
    let interrupt = typeshow::interrupt::install()?;

    let spans = args
        .areas
        .clone()
        .map(AreaList::into_spans)
        .unwrap_or_default();
    let options = SessionOptions {
        timing: Timing::from_config(config.delay, config.scroll_delay_ms),
        page: config.page,
        gutter_width: config.gutter_width,
        palette,
        interrupt: interrupt.clone(),
    };

    // Everything that can fail on bad input happens before the terminal is touched.
    let mut session = Session::load(&args.filename, &spans, options)?;

    let mut surface = TuiSurface::new(
        CrosstermBackend::new(io::stdout()),
        CrosstermConsole::new(interrupt),
        KeyBindings::default(),
    )?;
    session.run(&mut surface)
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if err.use_stderr() {
                log_startup_error(&err);
            }
            err.exit()
        }
    };

    match run(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) if err.is_interrupt() => {
            eprintln!("typeshow: interrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(err) => {
            eprintln!("typeshow: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["typeshow", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["typeshow", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_filename_is_required() {
        let err = Args::try_parse_from(["typeshow"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_only_filename_defaults() {
        let args = Args::parse_from(["typeshow", "demo.rs"]);
        assert_eq!(args.filename, PathBuf::from("demo.rs"));
        assert_eq!(args.delay, None);
        assert_eq!(args.areas, None);
        assert_eq!(args.page, None);
        assert_eq!(args.config, None);
        assert!(!args.no_color);
    }

    #[test]
    fn test_areas_are_parsed_and_sorted() {
        let args = Args::parse_from(["typeshow", "demo.rs", "--areas", "10-12,5"]);
        let areas = args.areas.unwrap();
        let rendered: Vec<String> = areas.spans().iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["5", "10-12"]);
    }

    #[test]
    fn test_areas_rejects_malformed_token() {
        let err = Args::try_parse_from(["typeshow", "demo.rs", "--areas", "3,x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_areas_rejects_inverted_range() {
        let result = Args::try_parse_from(["typeshow", "demo.rs", "--areas", "9-3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_areas_rejects_overlap() {
        let result = Args::try_parse_from(["typeshow", "demo.rs", "--areas", "3-6,5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_areas_rejects_zero() {
        let result = Args::try_parse_from(["typeshow", "demo.rs", "--areas", "0-2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_delay_accepts_fraction() {
        let args = Args::parse_from(["typeshow", "demo.rs", "--delay", "0.05"]);
        assert_eq!(args.delay, Some(0.05));
    }

    #[test]
    fn test_delay_rejects_negative() {
        let err = Args::try_parse_from(["typeshow", "demo.rs", "--delay=-1"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_delay_rejects_nan_and_infinity() {
        assert!(Args::try_parse_from(["typeshow", "demo.rs", "--delay", "NaN"]).is_err());
        assert!(Args::try_parse_from(["typeshow", "demo.rs", "--delay", "inf"]).is_err());
    }

    #[test]
    fn test_delay_rejects_values_too_large_for_a_duration() {
        let err = Args::try_parse_from(["typeshow", "demo.rs", "--delay", "1e20"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_page_rejects_zero() {
        let result = Args::try_parse_from(["typeshow", "demo.rs", "--page", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_no_color_flag() {
        let args = Args::parse_from(["typeshow", "demo.rs", "--no-color"]);
        assert!(args.no_color);
    }

    #[test]
    fn test_config_path() {
        let args = Args::parse_from(["typeshow", "demo.rs", "--config", "/custom/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_cli_overrides_flow_through_precedence_chain() {
        use typeshow::config::{apply_cli_overrides, merge_config, ConfigFile};

        let config_file = ConfigFile {
            delay: Some(0.2),
            page: Some(4),
            ..ConfigFile::default()
        };

        let merged = merge_config(Some(config_file));
        assert_eq!(merged.delay, Some(0.2));
        assert_eq!(merged.page, 4);

        let with_cli = apply_cli_overrides(merged, Some(0.01), Some(9), Some(true));
        assert_eq!(with_cli.delay, Some(0.01));
        assert_eq!(with_cli.page, 9);
        assert!(with_cli.no_color);
    }
}
