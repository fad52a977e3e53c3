//! Logic modules — translates high-level variant choices into concrete build inputs.
//!
//! # Modules
//!
//! - `resolver` — variant-to-flag and dependency resolution

pub mod resolver;
