//! The remote collaborator used to mutate ConfigMaps.
//!
//! [`ConfigMapApi`] is the seam between the reconciliation logic and the Kubernetes API server.
//! [`KubeConfigMapApi`] implements it on top of [`kube::Api`].
use std::fmt;

use async_trait::async_trait;
use k8s_openapi::{api::core::v1::ConfigMap, apimachinery::pkg::apis::meta::v1::ObjectMeta};
use kube::{
    Api, Client,
    api::{Patch, PatchParams, PostParams},
};
use snafu::{Snafu, ensure};

use crate::collect::FileEntries;

const NOT_FOUND: u16 = 404;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum InvalidReferenceError {
    #[snafu(display("ConfigMap name must not be empty"))]
    EmptyName,

    #[snafu(display("ConfigMap namespace must not be empty"))]
    EmptyNamespace,
}

/// Errors returned by a [`ConfigMapApi`], except for "not found" on mutations which is modelled
/// as [`Mutation::NotFound`].
#[derive(Debug, Snafu)]
pub enum ApiError {
    #[snafu(display("API server rejected the request with status {code} ({reason}): {message}"))]
    Rejected {
        code: u16,
        reason: String,
        message: String,
    },

    #[snafu(display("failed to talk to the API server"))]
    Transport { source: kube::Error },
}

impl From<kube::Error> for ApiError {
    fn from(error: kube::Error) -> Self {
        match error {
            kube::Error::Api(status) => Self::Rejected {
                code: status.code,
                reason: status.reason,
                message: status.message,
            },
            source => Self::Transport { source },
        }
    }
}

/// Identifies a namespaced ConfigMap. Both parts are guaranteed to be non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigMapRef {
    name: String,
    namespace: String,
}

impl ConfigMapRef {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, InvalidReferenceError> {
        let name = name.into();
        let namespace = namespace.into();

        ensure!(!name.is_empty(), EmptyNameSnafu);
        ensure!(!namespace.is_empty(), EmptyNamespaceSnafu);

        Ok(Self { name, namespace })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Builds the desired ConfigMap object carrying `data`.
    pub fn to_config_map(&self, data: &FileEntries) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(self.namespace.clone()),
                ..ObjectMeta::default()
            },
            data: Some(data.clone()),
            ..ConfigMap::default()
        }
    }
}

impl fmt::Display for ConfigMapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// The result of mutating an object which might not exist.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    /// The object existed and the API server returned its new state.
    Applied(ConfigMap),

    /// The object does not exist.
    NotFound,
}

/// Create, patch and replace operations on namespaced ConfigMaps.
#[async_trait]
pub trait ConfigMapApi: Send + Sync {
    /// Creates the ConfigMap. Fails if it already exists.
    async fn create(&self, target: &ConfigMapRef, data: &FileEntries)
    -> Result<ConfigMap, ApiError>;

    /// Merges `data` into the existing ConfigMap.
    async fn patch(&self, target: &ConfigMapRef, data: &FileEntries)
    -> Result<Mutation, ApiError>;

    /// Overwrites the existing ConfigMap, dropping keys not contained in `data`.
    async fn replace(
        &self,
        target: &ConfigMapRef,
        data: &FileEntries,
    ) -> Result<Mutation, ApiError>;
}

/// A [`ConfigMapApi`] backed by a [`kube::Client`].
#[derive(Clone)]
pub struct KubeConfigMapApi {
    client: Client,
    post_params: PostParams,
    merge_patch_params: PatchParams,
}

impl KubeConfigMapApi {
    pub fn new(client: Client, field_manager: &str) -> Self {
        Self {
            client,
            post_params: PostParams {
                field_manager: Some(field_manager.to_owned()),
                ..PostParams::default()
            },
            merge_patch_params: PatchParams {
                field_manager: Some(field_manager.to_owned()),
                ..PatchParams::default()
            },
        }
    }

    fn api(&self, target: &ConfigMapRef) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), target.namespace())
    }
}

#[async_trait]
impl ConfigMapApi for KubeConfigMapApi {
    async fn create(
        &self,
        target: &ConfigMapRef,
        data: &FileEntries,
    ) -> Result<ConfigMap, ApiError> {
        let config_map = target.to_config_map(data);

        Ok(self
            .api(target)
            .create(&self.post_params, &config_map)
            .await?)
    }

    async fn patch(
        &self,
        target: &ConfigMapRef,
        data: &FileEntries,
    ) -> Result<Mutation, ApiError> {
        let config_map = target.to_config_map(data);
        let result = self
            .api(target)
            .patch(
                target.name(),
                &self.merge_patch_params,
                &Patch::Merge(&config_map),
            )
            .await;

        into_mutation(result)
    }

    async fn replace(
        &self,
        target: &ConfigMapRef,
        data: &FileEntries,
    ) -> Result<Mutation, ApiError> {
        // Without a resourceVersion the API server performs an unconditional update
        let config_map = target.to_config_map(data);
        let result = self
            .api(target)
            .replace(target.name(), &self.post_params, &config_map)
            .await;

        into_mutation(result)
    }
}

fn into_mutation(result: Result<ConfigMap, kube::Error>) -> Result<Mutation, ApiError> {
    match result {
        Ok(config_map) => Ok(Mutation::Applied(config_map)),
        Err(kube::Error::Api(status)) if status.code == NOT_FOUND => Ok(Mutation::NotFound),
        Err(error) => Err(error.into()),
    }
}
