//! Mapping of flat hiera keys to their destination in the nested dictionary.
use std::{collections::BTreeMap, str::FromStr};

use snafu::{OptionExt, ResultExt, Snafu, ensure};

const SEPARATOR: char = '.';

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum ParseDestinationError {
    #[snafu(display("expected exactly one {SEPARATOR:?} separating group and name, found {dots}"))]
    SeparatorCount { dots: usize },
}

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum Error {
    #[snafu(display("schema entry {key:?} maps to {mapping:?}, which is not a \"group.name\" pair"))]
    InvalidMapping {
        source: ParseDestinationError,
        key: String,
        mapping: String,
    },
}

/// Where a hiera value ends up, parsed from a `group.name` string.
///
/// Either side of the separator may be empty, `GROUP.` puts the value under an empty name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    pub group: String,
    pub name: String,
}

impl FromStr for Destination {
    type Err = ParseDestinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dots = s.matches(SEPARATOR).count();
        ensure!(dots == 1, SeparatorCountSnafu { dots });

        let (group, name) = s
            .split_once(SEPARATOR)
            .context(SeparatorCountSnafu { dots })?;

        Ok(Self {
            group: group.to_owned(),
            name: name.to_owned(),
        })
    }
}

/// Maps flat hiera keys to `group.name` destinations.
///
/// Mappings are kept as given and only parsed by [`Schema::destination`], so a malformed mapping
/// only matters once its key shows up in the hieradata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    entries: BTreeMap<String, String>,
}

impl Schema {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the parsed destination of `key`, or [`None`] if the key is not part of the schema.
    pub fn destination(&self, key: &str) -> Option<Result<Destination, Error>> {
        let mapping = self.entries.get(key)?;

        Some(
            mapping
                .parse::<Destination>()
                .context(InvalidMappingSnafu { key, mapping }),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, String>> for Schema {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}
