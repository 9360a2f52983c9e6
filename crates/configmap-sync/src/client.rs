use kube::{
    Client, Config,
    config::{InClusterError, KubeConfigOptions, KubeconfigError},
};
use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display(
        "failed to load kubeconfig, after in-cluster configuration was unavailable: {in_cluster}"
    ))]
    LoadKubeconfig {
        source: KubeconfigError,
        in_cluster: InClusterError,
    },

    #[snafu(display("failed to create Kubernetes client"))]
    CreateClient { source: kube::Error },
}

/// Creates a [`Client`], preferring the in-cluster service account over the local kubeconfig.
pub async fn discover_client() -> Result<Client> {
    let config = match Config::incluster() {
        Ok(config) => {
            tracing::debug!("using in-cluster configuration");
            config
        }
        Err(in_cluster) => {
            tracing::debug!(
                error = %in_cluster,
                "in-cluster configuration unavailable, falling back to kubeconfig"
            );
            Config::from_kubeconfig(&KubeConfigOptions::default())
                .await
                .context(LoadKubeconfigSnafu { in_cluster })?
        }
    };

    Client::try_from(config).context(CreateClientSnafu)
}
