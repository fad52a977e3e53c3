//! HCL recipe library
//!
//! Typed model of the HCL package recipe: the declarative revision tables and
//! the resolver that turns a variant selection into CMake definitions and
//! package dependencies.

pub mod cli;
pub mod config_file;
pub mod error;
pub mod flags;
pub mod logic;
pub mod report;
pub mod schema;
pub mod types;
pub mod variant_set;

// Re-export main types for convenience
pub use config_file::BuildConfig;
pub use error::{RecipeError, Result};
pub use flags::{Definition, FlagList};
pub use logic::resolver::{resolve, ActiveDependency, Resolution};
pub use schema::{schema, Schema};
pub use types::{Backend, LogLevel, Protocol, SchemaVersion, Variant};
pub use variant_set::{parse_selection, VariantSet};
