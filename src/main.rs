//! # DLSS Finder: The Main Entry Point
//!
//! This module handles Command Line Interface (CLI) parsing, logging
//! initialization, the status window, and the hand-off to the installer.
//! It is the orchestrator of the dlss-finder application.
//!
//! The program is meant to be dropped next to (or near) a game binary and
//! run without a console. All outcome reporting happens through message
//! boxes; the process exit code tells scripts what happened:
//!
//! - `0` - installed, or a valid library was already in place
//! - `1` - unsupported directory layout and no local library
//! - `2` - no library found within the search bounds
//! - `3` - a library was found but is too small to be real
//! - `4` - the copy (or a read of the found file) failed
//! - `98` - invalid command line
//! - `99` - startup failure (window creation, working directory)

#![cfg_attr(windows, windows_subsystem = "windows")]

use clap::Parser;
use log::{error, info, LevelFilter};
use simplelog::{Config, SimpleLogger};

mod installer;
mod invariant;
mod notify;
mod search;
#[cfg(windows)]
mod window;

use notify::{MessageBoxNotifier, Notifier, Reporting};

const EXIT_INVALID_ARGUMENT: i32 = 98;
const EXIT_GENERAL_FAILURE: i32 = 99;

/// The Command Line Interface (CLI) configuration.
///
/// Uses `clap` for flag parsing and help generation.
#[derive(Parser, Debug)]
#[command(name = "dlss-finder")]
#[command(version)]
#[command(about = "Locates the DLSS runtime near a game and installs it under the loader's expected name", long_about = None)]
struct Cli {
    /// Do not show the success pop-up.
    #[arg(short, long)]
    silent: bool,

    /// Do not show error pop-ups when the operation fails.
    #[arg(short, long)]
    quiet: bool,

    /// How many directory levels above the working directory may be climbed.
    #[arg(long, default_value_t = installer::DEFAULT_SEARCH_DEPTH)]
    depth: u32,

    /// Turn on verbose logging.
    ///
    /// - `-v`: Debug
    /// - `-vv`: Trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => handle_parse_error(err),
    };

    // Determine log level based on verbosity flag
    let log_level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // Initialize logger
    // We ignore the result here as logging failure shouldn't crash the startup
    let _ = SimpleLogger::init(log_level, Config::default());

    let reporting = Reporting {
        success: !cli.silent,
        errors: !cli.quiet,
    };

    #[cfg(windows)]
    if let Err(err) = window::show_status_window() {
        error!("Could not create the status window: {}", err);
        std::process::exit(EXIT_GENERAL_FAILURE);
    }

    let start_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            error!("Could not resolve the working directory: {}", err);
            std::process::exit(EXIT_GENERAL_FAILURE);
        }
    };

    info!(
        "Searching for {} near {:?}",
        installer::DLSS_FILENAME,
        start_dir
    );
    let result = installer::install_dlss(&start_dir, cli.depth, installer::EXCLUDED_ANCESTORS);
    let code = notify::report_outcome(&result, &start_dir, reporting, &MessageBoxNotifier);
    std::process::exit(code);
}

/// Reports an invalid command line the same way every other failure is
/// reported: through an error box, since there is normally no console to
/// print to. Help and version requests still print and exit cleanly.
fn handle_parse_error(err: clap::Error) -> ! {
    use clap::error::ErrorKind;

    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        let _ = err.print();
        std::process::exit(0);
    }

    // Parsing failed, so the quiet flag has to be fished out of the raw
    // arguments instead of the parsed ones.
    let quiet = quiet_requested(std::env::args().skip(1));
    if !quiet {
        let current_dir = std::env::current_dir().unwrap_or_default();
        let message = err.render().to_string();
        let body = notify::error_body(message.trim_end(), EXIT_INVALID_ARGUMENT, &current_dir);
        MessageBoxNotifier.show_error(notify::ERROR_CAPTION, &body);
    }
    std::process::exit(EXIT_INVALID_ARGUMENT);
}

/// Looks for a quiet request in a raw argument list.
///
/// Operates on unparsed tokens so it still works when parsing itself
/// failed. Both the exact flags and a `q` bundled into a combined short
/// token such as `-sq` count.
fn quiet_requested<I>(args: I) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    args.into_iter().any(|arg| {
        let arg = arg.as_ref();
        let bundled = arg.starts_with('-') && !arg.starts_with("--") && arg[1..].contains('q');
        arg == "--quiet" || bundled
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_request_prints_instead_of_failing() {
        let err = Cli::try_parse_from(["dlss-finder", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_request_prints_instead_of_failing() {
        let err = Cli::try_parse_from(["dlss-finder", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn unknown_flags_are_invalid_arguments() {
        let err = Cli::try_parse_from(["dlss-finder", "--nonsense"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn short_flags_and_defaults_parse_as_expected() {
        let cli = Cli::try_parse_from(["dlss-finder", "-s", "-q"]).unwrap();
        assert!(cli.silent);
        assert!(cli.quiet);
        assert_eq!(cli.depth, installer::DEFAULT_SEARCH_DEPTH);
    }

    #[test]
    fn quiet_is_found_as_an_exact_flag() {
        assert!(quiet_requested(["-q"]));
        assert!(quiet_requested(["--depth", "oops", "--quiet"]));
    }

    #[test]
    fn quiet_is_found_inside_a_bundled_short_flag() {
        assert!(quiet_requested(["-sq", "--bogus"]));
        assert!(quiet_requested(["-qv"]));
    }

    #[test]
    fn quiet_is_not_imagined_in_other_arguments() {
        assert!(!quiet_requested(["-s", "--depth", "3"]));
        assert!(!quiet_requested(["--quieter"]));
        assert!(!quiet_requested(["quest"]));
        assert!(!quiet_requested(Vec::<String>::new()));
    }
}
