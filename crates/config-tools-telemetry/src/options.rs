use std::path::PathBuf;

use tracing_appender::rolling::Rotation;

/// Logging related CLI arguments which every tool flattens into its own argument set.
///
/// ```
/// use clap::Parser;
/// use config_tools_telemetry::LoggingOptions;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[arg(long)]
///     name: String,
///
///     #[command(flatten)]
///     logging: LoggingOptions,
/// }
///
/// let cli = Cli::parse_from(["foobar", "--name", "foo", "--debug"]);
/// assert!(cli.logging.debug);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, clap::Args)]
#[command(next_help_heading = "Logging Options")]
pub struct LoggingOptions {
    /// Enable debug logging. The `<APP>_LOG` environment variable still takes precedence.
    #[arg(long)]
    pub debug: bool,

    /// Enable logging to rolling files located in the specified DIRECTORY.
    #[arg(long, env, value_name = "DIRECTORY", group = "file_log")]
    pub file_log_directory: Option<PathBuf>,

    /// Time PERIOD after which log files are rolled over.
    #[arg(long, env, value_name = "PERIOD", requires = "file_log")]
    pub file_log_rotation_period: Option<RotationPeriod>,
}

/// Supported periods when the log file is rolled over.
#[derive(Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RotationPeriod {
    Minutely,
    Hourly,
    Daily,

    #[default]
    Never,
}

impl From<RotationPeriod> for Rotation {
    fn from(value: RotationPeriod) -> Self {
        match value {
            RotationPeriod::Minutely => Self::MINUTELY,
            RotationPeriod::Hourly => Self::HOURLY,
            RotationPeriod::Daily => Self::DAILY,
            RotationPeriod::Never => Self::NEVER,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        logging: LoggingOptions,
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generic_debug_variable_is_ignored() {
        // Commonly set by unrelated tooling, e.g. DEBUG=express:*
        unsafe {
            std::env::set_var("DEBUG", "express:*");
        }

        let cli = Cli::try_parse_from(["test"]).expect("DEBUG must not be parsed");

        assert!(!cli.logging.debug);
    }

    #[test]
    fn rotation_period_requires_directory() {
        let result = Cli::try_parse_from(["test", "--file-log-rotation-period", "daily"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_file_log_options() {
        let cli = Cli::try_parse_from([
            "test",
            "--file-log-directory",
            "/tmp/logs",
            "--file-log-rotation-period",
            "hourly",
        ])
        .expect("valid file log arguments");

        assert_eq!(
            cli.logging,
            LoggingOptions {
                debug: false,
                file_log_directory: Some(PathBuf::from("/tmp/logs")),
                file_log_rotation_period: Some(RotationPeriod::Hourly),
            }
        );
    }
}
