use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    schema::{self, Destination, Schema},
    source::HieraData,
};

/// Nested group to name to value mapping.
pub type ConfDict = BTreeMap<String, BTreeMap<String, Value>>;

/// Copies every value of `hieradata` that is part of the `schema` to its destination.
///
/// Keys missing from `hieradata` are skipped without looking at their mapping.
pub fn map(schema: &Schema, hieradata: &HieraData) -> Result<ConfDict, schema::Error> {
    let mut conf_dict = ConfDict::new();

    for key in schema.keys() {
        let Some(value) = hieradata.get(key) else {
            tracing::debug!(key, "key is not part of the hieradata, skipping");
            continue;
        };
        let Some(destination) = schema.destination(key) else {
            continue;
        };
        let Destination { group, name } = destination?;

        conf_dict.entry(group).or_default().insert(name, value.clone());
    }

    Ok(conf_dict)
}
