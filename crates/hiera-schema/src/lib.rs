//! Remaps flat hieradata into a nested dictionary of groups.
//!
//! Every entry of a [`schema::Schema`] maps a hiera key to a `group.name` destination. Applying
//! the schema to the hieradata yields a [`mapper::ConfDict`], which is suited to render INI-style
//! configuration files:
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use hiera_schema::{mapper, schema::Schema, source::HieraData};
//! use serde_json::json;
//!
//! let schema = Schema::from(BTreeMap::from([(
//!     "nova::debug".to_owned(),
//!     "DEFAULT.debug".to_owned(),
//! )]));
//! let hieradata = HieraData::from([("nova::debug".to_owned(), json!(true))]);
//!
//! let conf_dict = mapper::map(&schema, &hieradata).expect("valid mappings");
//! assert_eq!(conf_dict["DEFAULT"]["debug"], json!(true));
//! ```
//!
//! The [`module`] wraps this into an Ansible module.
pub mod mapper;
pub mod module;
pub mod schema;
pub mod source;

pub const APP_NAME: &str = "hiera-schema";
