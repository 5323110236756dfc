//! # face-relations - Spanish tax identifiers and FACe relations
//!
//! Validates Spanish tax identifiers (NIF, NIE and CIF) and queries the FACe
//! directory "relations" endpoint, which links an entity's tax identifier to
//! its accounting office (`oc`), managing body (`og`) and processing unit
//! (`ut`).
//!
//! ## Modules
//!
//! - [`nif`] - Identifier normalization, classification and check characters
//! - [`params`] - Query parameter filtering
//! - [`polling`] - Fixed-interval polling policy
//! - [`fetch`] - HTTP fetch and JSON decode capabilities
//! - [`client`] - The relations query client
//! - [`config`] - Configuration loading and merging
//! - [`error`] - Query errors
//!
//! ## Example
//!
//! ```no_run
//! use face_relations::client::RelationsQueryClient;
//! use face_relations::config::Config;
//!
//! assert!(face_relations::nif::validate("ESA58818501"));
//!
//! let config = Config::load(None).expect("Failed to load config");
//! let client = RelationsQueryClient::new(&config);
//!
//! match client.query([("cif", "A58818501")]) {
//!     Ok(Some(relations)) => println!("{} relations", relations.item_count()),
//!     Ok(None) => println!("No relations"),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod nif;
pub mod params;
pub mod polling;

pub use client::{Relations, RelationsQueryClient};
pub use error::QueryError;
pub use nif::{validate, IdentifierClass, TaxId};
pub use params::{filter_params, ParamKey, QueryParams};
