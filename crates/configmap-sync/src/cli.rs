use std::path::PathBuf;

use clap::{
    ArgAction,
    builder::{BoolishValueParser, NonEmptyStringValueParser},
};
use config_tools_telemetry::LoggingOptions;

use crate::{
    api::{ConfigMapRef, InvalidReferenceError},
    reconcile::SyncMode,
};

/// Create and update ConfigMaps from the files of local directories.
#[derive(Debug, PartialEq, Eq, clap::Parser)]
#[command(name = "configmap-sync", author, version)]
pub struct Opts {
    /// Replace the existing ConfigMap. Existing ConfigMaps are patched otherwise.
    #[arg(
        long,
        env = "CONFIGMAP_SYNC_REPLACE",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new(),
    )]
    pub replace: bool,

    /// Name of the ConfigMap.
    #[arg(long, env = "CONFIGMAP_SYNC_CM_NAME", value_parser = NonEmptyStringValueParser::new())]
    pub cm_name: String,

    /// Namespace of the ConfigMap.
    #[arg(
        long,
        env = "CONFIGMAP_SYNC_CM_NAMESPACE",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub cm_namespace: String,

    /// Directory whose files are uploaded. Subdirectories are ignored. Can be given multiple times.
    #[arg(short = 'd', long = "dirs", value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// File to upload. Can be given multiple times.
    #[arg(short = 'p', long = "paths", value_name = "FILE")]
    pub paths: Vec<PathBuf>,

    // IMPORTANT: All (flattened) sub structs should be placed at the end to ensure the help
    // headings are correct.
    #[command(flatten)]
    pub logging: LoggingOptions,
}

impl Opts {
    pub fn sync_mode(&self) -> SyncMode {
        SyncMode::from_replace_flag(self.replace)
    }

    pub fn target(&self) -> Result<ConfigMapRef, InvalidReferenceError> {
        ConfigMapRef::new(&self.cm_name, &self.cm_namespace)
    }
}
