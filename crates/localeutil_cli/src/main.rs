//! CLI probe for the locale resolver.
//!
//! # Responsibility
//! - Print what the resolver answers on this machine for both execution modes.
//! - Keep output deterministic for quick local sanity checks.

use clap::Parser;
use flexi_logger::Logger;
use localeutil_core::{configure_shared, shared_instance, ResolverConfig, DEFAULT_LANGUAGE_CODE};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "localeutil", version, about = "Show the language code resolved for this process")]
struct Args {
    /// Resolve as an app-extension host would.
    #[arg(long)]
    extension: bool,

    /// Print the full locale diagnostics dump.
    #[arg(long, conflicts_with = "json")]
    explore: bool,

    /// Print the diagnostics snapshot as JSON.
    #[arg(long)]
    json: bool,

    /// Fallback language used when no locale is available.
    #[arg(long, default_value = DEFAULT_LANGUAGE_CODE)]
    fallback: String,

    /// Application-level language preference for standard mode.
    #[arg(long)]
    prefer: Option<String>,

    /// Log level written to stderr.
    #[arg(long, default_value_t = localeutil_core::default_log_level().to_string())]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match localeutil_core::logging::normalize_level(&args.log_level) {
        Ok(level) => level,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let _logger = Logger::try_with_str(level)
        .and_then(|logger| logger.log_to_stderr().start())
        .map_err(|err| eprintln!("warning: logging disabled: {err}"))
        .ok();

    let config = ResolverConfig {
        fallback_language: args.fallback,
        preferred_language: args.prefer,
    };
    if let Err(err) = configure_shared(config) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let resolver = shared_instance();
    resolver.set_extension_mode(args.extension);
    log::info!(
        "event=cli_probe module=cli status=ok extension_mode={} version={}",
        resolver.extension_mode(),
        localeutil_core::core_version()
    );

    if args.json {
        match serde_json::to_string_pretty(&resolver.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to serialize snapshot: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else if args.explore {
        println!("{}", resolver.explore());
    } else {
        println!("{}", resolver.current_language_code());
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_resolve_standard_mode_with_english_fallback() {
        let args = Args::try_parse_from(["localeutil"]).expect("defaults parse");
        assert!(!args.extension);
        assert_eq!(args.fallback, "en");
        assert_eq!(args.prefer, None);
    }

    #[test]
    fn explore_and_json_are_mutually_exclusive() {
        assert!(Args::try_parse_from(["localeutil", "--explore", "--json"]).is_err());
    }
}
