//! Selection and loading of the hieradata.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use snafu::{ResultExt, Snafu};

/// Flat hiera key to value mapping.
pub type HieraData = BTreeMap<String, Value>;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read hieradata file {path:?}"))]
    ReadFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to parse hieradata file {path:?} as a YAML or JSON mapping"))]
    ParseFile {
        source: serde_yaml::Error,
        path: PathBuf,
    },
}

/// Where the hieradata comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HieraSource {
    File(PathBuf),
    Inline(HieraData),
}

impl HieraSource {
    /// Picks the source to use.
    ///
    /// An existing `file` always takes precedence, inline data is not merged into it. Otherwise
    /// non-empty `inline` data is used. Returns [`None`] if neither is usable.
    pub fn select(inline: HieraData, file: &str) -> Option<Self> {
        if !file.is_empty() {
            let path = Path::new(file);

            if path.exists() {
                if !inline.is_empty() {
                    tracing::debug!(path = file, "hieradata file exists, ignoring inline hieradata");
                }
                return Some(Self::File(path.to_path_buf()));
            }

            tracing::debug!(path = file, "hieradata file doesn't exist");
        }

        (!inline.is_empty()).then_some(Self::Inline(inline))
    }

    /// Returns the hieradata, reading and parsing the file if necessary.
    pub fn load(self) -> Result<HieraData> {
        match self {
            Self::Inline(data) => Ok(data),
            Self::File(path) => {
                let contents = fs::read_to_string(&path).context(ReadFileSnafu { path: &path })?;

                // An empty document is parsed as null
                let data: Option<HieraData> =
                    serde_yaml::from_str(&contents).context(ParseFileSnafu { path: &path })?;
                tracing::debug!(path = %path.display(), "loaded hieradata file");

                Ok(data.unwrap_or_default())
            }
        }
    }
}
