//! Command-line arguments.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::loader::DEFAULT_CONFIG_PATH;

#[derive(Debug, Parser)]
#[command(name = "relayed-mint")]
#[command(about = "Mint a token through a relayed smart wallet transaction", long_about = None)]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

impl Cli {
    /// Parse process arguments, accepting the single-dash `-config` form.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }
}

/// Rewrite `-config` and `-config=<path>` to their double-dash spelling.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-config") => OsString::from("--config"),
            Some(s) if s.starts_with("-config=") => OsString::from(format!("-{}", s)),
            _ => arg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(normalize_legacy_flags(args.iter().map(OsString::from)))
    }

    #[test]
    fn test_default_path() {
        assert_eq!(parse(&["relayed-mint"]).config, PathBuf::from("config.json"));
    }

    #[test]
    fn test_long_and_short_flags() {
        assert_eq!(
            parse(&["relayed-mint", "--config", "a.json"]).config,
            PathBuf::from("a.json")
        );
        assert_eq!(
            parse(&["relayed-mint", "-c", "b.json"]).config,
            PathBuf::from("b.json")
        );
    }

    #[test]
    fn test_legacy_single_dash_flag() {
        assert_eq!(
            parse(&["relayed-mint", "-config", "c.json"]).config,
            PathBuf::from("c.json")
        );
        assert_eq!(
            parse(&["relayed-mint", "-config=d.json"]).config,
            PathBuf::from("d.json")
        );
    }

    #[test]
    fn test_other_arguments_untouched() {
        let args = normalize_legacy_flags(["bin", "-c", "-configured"].map(OsString::from));
        assert_eq!(args, ["bin", "-c", "-configured"].map(OsString::from).to_vec());
    }
}
