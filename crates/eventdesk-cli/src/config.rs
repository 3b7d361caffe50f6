//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/eventdesk/config.toml` by default. A missing file means
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use eventdesk_core::time::MINUTES_PER_DAY;
use eventdesk_core::{SlotPolicy, TimeOfDay, TracingConfig, TracingOutputFormat};

use crate::error::{CliError, CliResult};

// ---------------------------------------------------------------------------
// AppConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the eventdesk CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Debug mode.
    pub debug: bool,

    /// Admin credentials.
    pub admin: AdminSettings,

    /// Slot suggestion settings.
    pub slots: SlotSettings,

    /// Log output settings.
    pub logging: LoggingSettings,
}

/// How logs are written to stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `compact`, `pretty` or `json`.
    pub format: TracingOutputFormat,

    /// Prefix compact lines with a timestamp.
    pub timestamps: bool,

    /// Filter directive such as `eventdesk_core=trace`; RUST_LOG syntax.
    pub filter: Option<String>,
}

impl LoggingSettings {
    /// Builds the tracing setup. `format` from the command line wins over
    /// the configured one.
    pub fn tracing_config(&self, debug: bool, format: Option<TracingOutputFormat>) -> TracingConfig {
        let mut config = TracingConfig::for_debug_flag(debug).with_format(format.unwrap_or(self.format));
        config.include_timestamp = self.timestamps;
        match &self.filter {
            Some(filter) => config.with_env_filter(filter.clone()),
            None => config,
        }
    }
}

/// Credentials accepted by the admin login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    /// Any of these usernames may log in.
    pub usernames: Vec<String>,

    /// Shared admin password.
    pub password: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            usernames: vec!["admin".to_string(), "ACMadmin".to_string()],
            password: "admin123".to_string(),
        }
    }
}

/// Working window and limits for free-slot suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotSettings {
    /// First candidate start, `HH:MM`.
    pub window_start: String,

    /// Latest candidate end, `HH:MM`.
    pub window_end: String,

    /// Minutes between candidate starts.
    pub step_minutes: i64,

    /// Most suggestions shown at once.
    pub max_suggestions: usize,
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            window_start: "08:00".to_string(),
            window_end: "20:00".to_string(),
            step_minutes: 30,
            max_suggestions: 5,
        }
    }
}

impl SlotSettings {
    /// Converts to the engine's slot policy, checking every field.
    pub fn to_policy(&self) -> CliResult<SlotPolicy> {
        let start = parse_window_time("window_start", &self.window_start)?;
        let end = parse_window_time("window_end", &self.window_end)?;
        if start >= end {
            return Err(CliError::Config(format!(
                "slots.window_start ({start}) must be before slots.window_end ({end})"
            )));
        }
        if !(1..=MINUTES_PER_DAY).contains(&self.step_minutes) {
            return Err(CliError::Config(format!(
                "slots.step_minutes must be between 1 and {MINUTES_PER_DAY}"
            )));
        }
        if self.max_suggestions == 0 {
            return Err(CliError::Config(
                "slots.max_suggestions must be at least 1".to_string(),
            ));
        }

        Ok(SlotPolicy::default()
            .with_window(start, end)
            .with_step(self.step_minutes)
            .with_max_suggestions(self.max_suggestions))
    }
}

fn parse_window_time(field: &str, value: &str) -> CliResult<TimeOfDay> {
    TimeOfDay::parse(value).map_err(|e| CliError::Config(format!("slots.{field}: {e}")))
}

impl AppConfig {
    /// Loads configuration from the default path.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration text.
    pub fn parse(content: &str) -> CliResult<Self> {
        toml::from_str(content).map_err(|e| CliError::Config(format!("failed to parse config: {e}")))
    }

    /// Checks settings that TOML parsing alone cannot.
    pub fn validate(&self) -> CliResult<()> {
        if self.admin.usernames.iter().all(|u| u.trim().is_empty()) {
            return Err(CliError::Config(
                "admin.usernames must name at least one user".to_string(),
            ));
        }
        if self.admin.password.is_empty() {
            return Err(CliError::Config("admin.password must not be empty".to_string()));
        }
        self.slots.to_policy()?;
        Ok(())
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eventdesk")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod loading {
        use super::*;
        use std::io::Write;

        #[test]
        fn empty_file_gives_defaults() {
            let config = AppConfig::parse("").unwrap();
            assert_eq!(config, AppConfig::default());
            assert_eq!(config.admin.usernames, vec!["admin", "ACMadmin"]);
            assert_eq!(config.admin.password, "admin123");
        }

        #[test]
        fn load_from_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(
                file,
                r#"
debug = true

[admin]
usernames = ["organizer"]
password = "s3cret"

[slots]
window_start = "09:00"
window_end = "17:00"
step_minutes = 15
"#
            )
            .unwrap();

            let config = AppConfig::load_from(file.path()).unwrap();
            assert!(config.debug);
            assert_eq!(config.admin.usernames, vec!["organizer"]);
            assert_eq!(config.admin.password, "s3cret");
            assert_eq!(config.slots.window_start, "09:00");
            assert_eq!(config.slots.step_minutes, 15);
            // unset keys keep their defaults
            assert_eq!(config.slots.max_suggestions, 5);
        }

        #[test]
        fn missing_file_is_an_error() {
            let dir = tempfile::tempdir().unwrap();
            let err = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
            assert!(matches!(err, CliError::ConfigRead { .. }));
        }

        #[test]
        fn malformed_toml() {
            let err = AppConfig::parse("[slots\nstep_minutes = 5").unwrap_err();
            assert!(err.to_string().contains("failed to parse config"));
        }

        #[test]
        fn logging_section() {
            let config = AppConfig::parse(
                "[logging]\nformat = \"json\"\ntimestamps = true\nfilter = \"eventdesk_core=trace\"\n",
            )
            .unwrap();
            assert_eq!(config.logging.format, TracingOutputFormat::Json);

            let setup = config.logging.tracing_config(false, None);
            assert_eq!(setup.output_format, TracingOutputFormat::Json);
            assert!(setup.include_timestamp);
            assert_eq!(setup.env_filter.as_deref(), Some("eventdesk_core=trace"));

            let setup = config.logging.tracing_config(true, Some(TracingOutputFormat::Pretty));
            assert_eq!(setup.output_format, TracingOutputFormat::Pretty);
            assert_eq!(setup.default_level, tracing::Level::DEBUG);
        }

        #[test]
        fn logging_defaults() {
            let setup = LoggingSettings::default().tracing_config(false, None);
            assert_eq!(setup.output_format, TracingOutputFormat::Compact);
            assert!(setup.env_filter.is_none());
            assert!(!setup.include_timestamp);
        }

        #[test]
        fn dump_round_trips() {
            let config = AppConfig::default();
            let text = toml::to_string_pretty(&config).unwrap();
            assert_eq!(AppConfig::parse(&text).unwrap(), config);
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn defaults_are_valid() {
            AppConfig::default().validate().unwrap();
            assert_eq!(SlotSettings::default().to_policy().unwrap(), SlotPolicy::default());
        }

        #[test]
        fn custom_window() {
            let settings = SlotSettings {
                window_start: "09:00".to_string(),
                window_end: "12:00".to_string(),
                step_minutes: 60,
                max_suggestions: 2,
            };
            let policy = settings.to_policy().unwrap();
            assert_eq!(policy.window_start.to_string(), "09:00");
            assert_eq!(policy.window_end.to_string(), "12:00");
            assert_eq!(policy.step_minutes, 60);
            assert_eq!(policy.max_suggestions, 2);
        }

        #[test]
        fn rejects_unordered_window() {
            let settings = SlotSettings {
                window_start: "18:00".to_string(),
                window_end: "08:00".to_string(),
                ..SlotSettings::default()
            };
            let err = settings.to_policy().unwrap_err();
            assert!(err.to_string().contains("must be before"));
        }

        #[test]
        fn rejects_bad_time() {
            let settings = SlotSettings {
                window_end: "25:00".to_string(),
                ..SlotSettings::default()
            };
            let err = settings.to_policy().unwrap_err();
            assert!(err.to_string().contains("slots.window_end"));
        }

        #[test]
        fn rejects_zero_step_and_limit() {
            let zero_step = SlotSettings {
                step_minutes: 0,
                ..SlotSettings::default()
            };
            assert!(zero_step.to_policy().is_err());

            let zero_limit = SlotSettings {
                max_suggestions: 0,
                ..SlotSettings::default()
            };
            assert!(zero_limit.to_policy().is_err());
        }

        #[test]
        fn rejects_oversized_step() {
            let huge = SlotSettings {
                step_minutes: i64::MAX,
                ..SlotSettings::default()
            };
            let err = huge.to_policy().unwrap_err();
            assert!(err.to_string().contains("between 1 and 1440"));

            let whole_day = SlotSettings {
                step_minutes: 1440,
                ..SlotSettings::default()
            };
            assert_eq!(whole_day.to_policy().unwrap().step_minutes, 1440);
        }

        #[test]
        fn rejects_empty_credentials() {
            let mut config = AppConfig::default();
            config.admin.password.clear();
            assert!(config.validate().is_err());

            let mut config = AppConfig::default();
            config.admin.usernames = vec![" ".to_string()];
            assert!(config.validate().is_err());
        }
    }
}
