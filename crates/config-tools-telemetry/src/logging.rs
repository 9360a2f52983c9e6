use std::path::PathBuf;

use snafu::{ResultExt as _, Snafu};
use tracing::{Dispatch, level_filters::LevelFilter};
use tracing_appender::rolling::{InitError, RollingFileAppender};
use tracing_subscriber::{EnvFilter, Layer, Registry, filter::Directive, layer::SubscriberExt};

use crate::{LoggingOptions, RotationPeriod};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors which can be encountered when building the [`Dispatch`] of a [`Logging`] instance.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to initialize rolling file appender"))]
    InitRollingFileAppender { source: InitError },
}

/// Where console log output is written to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,

    /// Used by tools which reserve stdout for their actual output.
    Stderr,
}

/// Settings of the optional rolling file output.
#[derive(Debug, PartialEq, Eq)]
pub struct FileLogSettings {
    pub directory: PathBuf,
    pub rotation_period: RotationPeriod,
}

/// A set of pre-configured [`Layer`]s, bundled into a [`Dispatch`].
///
/// The console output is always enabled. Its level is read from the environment variable returned
/// by [`Logging::environment_variable`], falling back to `INFO` (or `DEBUG` if requested).
/// Optionally, JSON formatted events are additionally written to rolling log files.
#[derive(Debug, PartialEq, Eq)]
pub struct Logging {
    app_name: &'static str,
    environment_variable: String,
    default_level: LevelFilter,
    console_target: ConsoleTarget,
    file_log_settings: Option<FileLogSettings>,
}

impl Logging {
    const FILE_LOG_SUFFIX: &'static str = "log";

    /// Creates a new instance for the application named `app_name`.
    ///
    /// The log level environment variable is derived from the application name, e.g.
    /// `configmap-sync` reads `CONFIGMAP_SYNC_LOG`.
    pub fn new(app_name: &'static str) -> Self {
        let environment_variable = format!(
            "{prefix}_LOG",
            prefix = app_name.to_uppercase().replace('-', "_")
        );

        Self {
            app_name,
            environment_variable,
            default_level: LevelFilter::INFO,
            console_target: ConsoleTarget::default(),
            file_log_settings: None,
        }
    }

    /// Creates a new instance configured by the common [`LoggingOptions`].
    pub fn pre_configured(app_name: &'static str, options: LoggingOptions) -> Self {
        let LoggingOptions {
            debug,
            file_log_directory,
            file_log_rotation_period,
        } = options;

        let default_level = if debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };

        Self::new(app_name)
            .with_default_level(default_level)
            .with_file_output(file_log_directory.map(|directory| FileLogSettings {
                directory,
                rotation_period: file_log_rotation_period.unwrap_or_default(),
            }))
    }

    pub fn with_default_level(mut self, level: LevelFilter) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_console_target(mut self, target: ConsoleTarget) -> Self {
        self.console_target = target;
        self
    }

    pub fn with_file_output(mut self, settings: Option<FileLogSettings>) -> Self {
        self.file_log_settings = settings;
        self
    }

    /// The name of the environment variable which overrides the default level.
    pub fn environment_variable(&self) -> &str {
        &self.environment_variable
    }

    /// Builds the configured layers into a [`Dispatch`].
    ///
    /// No global default is installed, the caller decides in which scope the returned
    /// [`Dispatch`] is active.
    pub fn dispatch(self) -> Result<Dispatch> {
        let mut layers: Vec<Box<dyn Layer<Registry> + Sync + Send>> = Vec::new();

        let env_filter_layer = env_filter_builder(&self.environment_variable, self.default_level);
        let console_output_layer = match self.console_target {
            ConsoleTarget::Stdout => tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(env_filter_layer)
                .boxed(),
            ConsoleTarget::Stderr => tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(env_filter_layer)
                .boxed(),
        };
        layers.push(console_output_layer);

        if let Some(FileLogSettings {
            directory,
            rotation_period,
        }) = self.file_log_settings
        {
            let env_filter_layer =
                env_filter_builder(&self.environment_variable, self.default_level);

            let file_appender = RollingFileAppender::builder()
                .rotation(rotation_period.into())
                .filename_prefix(self.app_name)
                .filename_suffix(Self::FILE_LOG_SUFFIX)
                .max_log_files(6)
                .build(directory)
                .context(InitRollingFileAppenderSnafu)?;

            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(file_appender)
                    .with_filter(env_filter_layer)
                    .boxed(),
            );
        }

        Ok(Dispatch::new(Registry::default().with(layers)))
    }
}

fn env_filter_builder(env_var: &str, default_directive: impl Into<Directive>) -> EnvFilter {
    EnvFilter::builder()
        .with_env_var(env_var)
        .with_default_directive(default_directive.into())
        .from_env_lossy()
}
