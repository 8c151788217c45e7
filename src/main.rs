//! dialog-row - Entry Point

use clap::Parser;
use dialog_row::model::{AppError, SwipeGesture};
use dialog_row::source::FixtureProvider;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

/// Interactive terminal preview of animated conversation-list rows
#[derive(Parser, Debug)]
#[command(name = "dialog-row")]
#[command(version)]
#[command(about = "Interactive terminal preview of animated conversation-list rows")]
pub struct Args {
    /// Path to a JSON fixture with a `rows` array (built-in samples if omitted)
    pub fixture: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Action revealed by swiping ordinary conversations
    #[arg(long, value_parser = parse_swipe_action)]
    pub swipe_action: Option<SwipeGesture>,

    /// Lay rows out right to left
    #[arg(long)]
    pub rtl: bool,
}

fn parse_swipe_action(value: &str) -> Result<SwipeGesture, String> {
    value.parse().map_err(|e: dialog_row::model::UnknownSwipeGesture| e.to_string())
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = dialog_row::config::load_config_with_precedence(args.config.clone())?;
        let merged = dialog_row::config::merge_config(config_file);
        let with_env = dialog_row::config::apply_env_overrides(merged)?;
        dialog_row::config::apply_cli_overrides(with_env, args.swipe_action, args.rtl)
    };
    config.validate()?;

    dialog_row::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let provider = match &args.fixture {
        Some(path) => FixtureProvider::load(path)?,
        None => FixtureProvider::sample(),
    };

    dialog_row::view::run(&config, Rc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["dialog-row", "--help"]);
        let err = result.expect_err("help exits early");
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["dialog-row", "--version"]);
        let err = result.expect_err("version exits early");
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["dialog-row"]);
        assert_eq!(args.fixture, None);
        assert_eq!(args.config, None);
        assert_eq!(args.swipe_action, None);
        assert!(!args.rtl);
    }

    #[test]
    fn test_fixture_path_and_flags() {
        let args = Args::parse_from([
            "dialog-row",
            "rows.json",
            "--swipe-action",
            "Pin",
            "--rtl",
            "--config",
            "/custom/config.toml",
        ]);
        assert_eq!(args.fixture, Some(PathBuf::from("rows.json")));
        assert_eq!(args.swipe_action, Some(SwipeGesture::Pin));
        assert!(args.rtl);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_unknown_swipe_action_rejected() {
        let result = Args::try_parse_from(["dialog-row", "--swipe-action", "explode"]);
        let err = result.expect_err("unknown action");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_swipe_action_flows_through_precedence_chain() {
        use dialog_row::config::{apply_cli_overrides, merge_config, ConfigFile};

        let merged = merge_config(Some(ConfigFile {
            swipe_action: Some(SwipeGesture::Mute),
            ..ConfigFile::default()
        }));
        assert_eq!(merged.swipe_action, SwipeGesture::Mute);

        let with_cli = apply_cli_overrides(merged, Some(SwipeGesture::Read), false);
        assert_eq!(with_cli.swipe_action, SwipeGesture::Read);
    }
}
