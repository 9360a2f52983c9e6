//! Makes sure a ConfigMap exists with the desired data.
//!
//! Depending on the [`SyncMode`], the existing ConfigMap is either patched or replaced. If it
//! doesn't exist yet, it is created instead. Every other failure is fatal and not retried.
use k8s_openapi::api::core::v1::ConfigMap;
use snafu::{ResultExt, Snafu};

use crate::{
    api::{ApiError, ConfigMapApi, ConfigMapRef, Mutation},
    collect::FileEntries,
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to replace ConfigMap {target}"))]
    Replace {
        source: ApiError,
        target: ConfigMapRef,
    },

    #[snafu(display("failed to patch ConfigMap {target}"))]
    Patch {
        source: ApiError,
        target: ConfigMapRef,
    },

    #[snafu(display("failed to create ConfigMap {target}"))]
    Create {
        source: ApiError,
        target: ConfigMapRef,
    },
}

/// How an existing ConfigMap is updated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Merge the data into the existing ConfigMap, keeping keys which are not part of the data.
    #[default]
    Patch,

    /// Overwrite the existing ConfigMap.
    Replace,
}

impl SyncMode {
    pub fn from_replace_flag(replace: bool) -> Self {
        if replace { Self::Replace } else { Self::Patch }
    }
}

/// Which operation brought the ConfigMap into the desired state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    Replaced,

    #[strum(serialize = "updated")]
    Patched,

    Created,
}

/// The result of [`ensure`].
#[derive(Clone, Debug, PartialEq)]
pub struct Ensured {
    pub outcome: Outcome,

    /// The ConfigMap as returned by the API server.
    pub config_map: ConfigMap,
}

/// Ensures that the ConfigMap `target` exists and contains `data`.
///
/// The existing ConfigMap is patched or replaced according to `mode`. Only if the API reports
/// that it doesn't exist, it is created.
pub async fn ensure<A>(
    api: &A,
    target: &ConfigMapRef,
    mode: SyncMode,
    data: &FileEntries,
) -> Result<Ensured>
where
    A: ConfigMapApi + ?Sized,
{
    let mutation = match mode {
        SyncMode::Replace => api
            .replace(target, data)
            .await
            .context(ReplaceSnafu { target: target.clone() })?,
        SyncMode::Patch => api
            .patch(target, data)
            .await
            .context(PatchSnafu { target: target.clone() })?,
    };

    let ensured = match mutation {
        Mutation::Applied(config_map) => Ensured {
            outcome: match mode {
                SyncMode::Replace => Outcome::Replaced,
                SyncMode::Patch => Outcome::Patched,
            },
            config_map,
        },
        Mutation::NotFound => {
            tracing::debug!(%target, ?mode, "ConfigMap does not exist, creating it");

            let config_map = api
                .create(target, data)
                .await
                .context(CreateSnafu { target: target.clone() })?;

            Ensured {
                outcome: Outcome::Created,
                config_map,
            }
        }
    };

    let (name, outcome) = (target.name(), ensured.outcome);
    tracing::info!(%target, keys = data.len(), "ConfigMap {name} {outcome}");

    Ok(ensured)
}
