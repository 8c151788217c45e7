//! Configuration: TOML file, environment and CLI overrides.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, AnimationSection, ConfigError,
    ConfigFile, MetricsSection, ResolvedConfig, SwipeSection, CONFIG_ENV_VAR,
    SWIPE_ACTION_ENV_VAR,
};
