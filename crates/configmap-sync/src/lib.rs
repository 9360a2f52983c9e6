//! Pushes the contents of local files into a Kubernetes ConfigMap.
//!
//! Files are collected from directories (without recursion) and explicit paths, keyed by their
//! basename. The ConfigMap is then patched or replaced, and created if it doesn't exist yet. See
//! [`reconcile::ensure`] for details.
use snafu::{ResultExt, Snafu};

use crate::{api::KubeConfigMapApi, cli::Opts, reconcile::Ensured};

pub mod api;
pub mod cli;
pub mod client;
pub mod collect;
pub mod reconcile;

/// Used as the application name in logs and as the field manager for API requests.
pub const APP_NAME: &str = "configmap-sync";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("invalid ConfigMap reference"))]
    InvalidTarget { source: api::InvalidReferenceError },

    #[snafu(display("failed to collect files"))]
    CollectFiles { source: collect::Error },

    #[snafu(display("failed to create Kubernetes client"))]
    DiscoverClient { source: client::Error },

    #[snafu(display("failed to ensure ConfigMap"))]
    EnsureConfigMap { source: reconcile::Error },
}

/// Collects the files given in `opts` and pushes them into the ConfigMap.
pub async fn run(opts: &Opts) -> Result<Ensured, Error> {
    let target = opts.target().context(InvalidTargetSnafu)?;
    let data = collect::collect_files(&opts.dirs, &opts.paths).context(CollectFilesSnafu)?;

    let client = client::discover_client()
        .await
        .context(DiscoverClientSnafu)?;
    let api = KubeConfigMapApi::new(client, APP_NAME);

    let ensured = reconcile::ensure(&api, &target, opts.sync_mode(), &data)
        .await
        .context(EnsureConfigMapSnafu)?;

    tracing::debug!(
        %target,
        resource_version = ensured.config_map.metadata.resource_version.as_deref(),
        "ConfigMap is up to date"
    );

    Ok(ensured)
}
