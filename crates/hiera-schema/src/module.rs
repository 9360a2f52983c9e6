//! The Ansible module interface.
//!
//! The module is invoked with the path of a JSON file containing its arguments and reports its
//! result as a single JSON object on stdout, following the conventions of Ansible binary modules.
use std::{
    collections::BTreeMap,
    error::Error as StdError,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt, Snafu};

use crate::{
    mapper::{self, ConfDict},
    schema::{self, Schema},
    source::{self, HieraData, HieraSource},
};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read module arguments from {path:?}"))]
    ReadArguments {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse module arguments"))]
    ParseArguments { source: serde_json::Error },

    #[snafu(display("missing required arguments: schema"))]
    MissingSchema,

    #[snafu(display("Either hieradata or hieradata_file must be set"))]
    MissingHieradata,

    #[snafu(display("invalid schema"))]
    InvalidSchema { source: schema::Error },

    #[snafu(display("failed to load hieradata"))]
    LoadHieradata { source: source::Error },
}

/// The arguments accepted by the module. Internal `_ansible_*` arguments are ignored.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ModuleArgs {
    #[serde(default)]
    pub hieradata: Option<HieraData>,

    #[serde(default)]
    pub hieradata_file: Option<String>,

    #[serde(default)]
    pub schema: Option<BTreeMap<String, String>>,
}

impl ModuleArgs {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).context(ReadArgumentsSnafu { path })?;
        serde_json::from_str(&contents).context(ParseArgumentsSnafu)
    }
}

/// The JSON object written to stdout.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModuleResponse {
    Exit { changed: bool, conf_dict: ConfDict },
    Fail { failed: bool, msg: String },
}

impl ModuleResponse {
    pub fn failed(error: &(dyn StdError + 'static)) -> Self {
        Self::Fail {
            failed: true,
            msg: failure_message(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

impl From<Result<ConfDict>> for ModuleResponse {
    fn from(result: Result<ConfDict>) -> Self {
        match result {
            Ok(conf_dict) => Self::Exit {
                changed: false,
                conf_dict,
            },
            Err(error) => Self::failed(&error),
        }
    }
}

/// Builds the nested dictionary from the module arguments.
pub fn run(args: ModuleArgs) -> Result<ConfDict> {
    let ModuleArgs {
        hieradata,
        hieradata_file,
        schema,
    } = args;

    let schema = schema.context(MissingSchemaSnafu)?;
    let source = HieraSource::select(
        hieradata.unwrap_or_default(),
        hieradata_file.as_deref().unwrap_or_default(),
    )
    .context(MissingHieradataSnafu)?;

    let hieradata = source.load().context(LoadHieradataSnafu)?;

    mapper::map(&Schema::from(schema), &hieradata).context(InvalidSchemaSnafu)
}

/// Reads the arguments file at `path` and runs the module, converting any failure into a
/// [`ModuleResponse::Fail`].
pub fn execute(path: &Path) -> ModuleResponse {
    ModuleArgs::from_file(path).and_then(run).into()
}

/// Joins the messages of `error` and all of its sources.
fn failure_message(error: &(dyn StdError + 'static)) -> String {
    std::iter::successors(Some(error), |&error| error.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}
