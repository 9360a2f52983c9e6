use clap::Parser;
use config_tools_telemetry::Logging;
use configmap_sync::{APP_NAME, cli::Opts};
use snafu::{ResultExt, Snafu};
use tracing::instrument::WithSubscriber;

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to set up logging"))]
    SetUpLogging {
        source: config_tools_telemetry::Error,
    },

    #[snafu(display("failed to sync ConfigMap"))]
    Sync { source: configmap_sync::Error },
}

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), Error> {
    let opts = Opts::parse();

    let dispatch = Logging::pre_configured(APP_NAME, opts.logging.clone())
        .dispatch()
        .context(SetUpLoggingSnafu)?;

    configmap_sync::run(&opts)
        .with_subscriber(dispatch)
        .await
        .context(SyncSnafu)?;

    Ok(())
}
