//! Command module structure for face-relations CLI

use anyhow::Result;

use face_relations::config::{expand_path, Config};

pub mod config;
pub mod control;
pub mod query;
pub mod util;
pub mod validate;

/// Load the merged configuration, with an optional explicit file on top.
pub fn load_config(explicit: Option<&str>) -> Result<Config> {
    let explicit = explicit.map(expand_path);
    Config::load(explicit.as_deref())
}
