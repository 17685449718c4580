//! Runtime configuration resolved from flags, environment and defaults.

use crate::cli::Cli;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "todo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub log_level: String,
    /// `None` when no platform data directory exists and none was given.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self::resolve(cli, std::env::current_dir().ok().as_deref())
    }

    fn resolve(cli: &Cli, cwd: Option<&Path>) -> Self {
        let log_dir = match &cli.log_dir {
            Some(dir) if dir.is_absolute() => Some(dir.clone()),
            Some(dir) => cwd.map(|cwd| cwd.join(dir)),
            None => default_log_dir(),
        };

        Self {
            data_file: cli.file.clone(),
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| todo_core::default_log_level().to_string()),
            log_dir,
        }
    }
}

fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME).join("logs"))
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::cli::Cli;
    use clap::Parser;
    use std::path::{Path, PathBuf};

    #[test]
    fn relative_log_dir_is_anchored_to_cwd() {
        let cli = Cli::try_parse_from(["todo", "--log-dir", "logs", "--log-level", "warn", "stats"])
            .unwrap();

        let config = AppConfig::resolve(&cli, Some(Path::new("/work")));

        assert_eq!(config.log_dir, Some(PathBuf::from("/work/logs")));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn level_falls_back_to_build_default() {
        let cli = Cli::try_parse_from(["todo", "--log-dir", "/var/log/todo", "stats"]).unwrap();

        let config = AppConfig::resolve(&cli, None);

        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/todo")));
        assert_eq!(config.log_level, todo_core::default_log_level());
    }
}
