//! Variant selection: user choices merged over a revision's defaults.
//!
//! A [`VariantSet`] always holds a value for every variant its schema
//! declares. Selections naming variants the schema does not declare are
//! skipped with a warning, so configurations written for a newer revision
//! still load against an older one.
//!
//! # Selection syntax
//!
//! Selections follow Spack's spec syntax:
//!
//! | Form              | Meaning        |
//! |-------------------|----------------|
//! | `+name`           | enable         |
//! | `~name`, `-name`  | disable        |
//! | `name=true`       | enable (`true`, `on`, `yes`, `1`) |
//! | `name=false`      | disable (`false`, `off`, `no`, `0`) |
//!
//! Sigil forms may be concatenated (`+thallium~ofi+ucx`) and tokens may be
//! separated by whitespace. Later selections override earlier ones.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{RecipeError, Result};
use crate::schema::{schema, Schema};
use crate::types::{SchemaVersion, Variant};

/// Boolean state of every variant declared by one schema revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantSet {
    schema: SchemaVersion,
    variants: BTreeMap<Variant, bool>,
}

impl VariantSet {
    /// Every declared variant at its documented default.
    pub fn defaults(version: SchemaVersion) -> Self {
        let variants = schema(version)
            .variants
            .iter()
            .map(|decl| (decl.variant, decl.default))
            .collect();
        Self {
            schema: version,
            variants,
        }
    }

    /// Defaults overridden by `selections`, applied in order.
    pub fn from_selections<I, S>(version: SchemaVersion, selections: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let mut set = Self::defaults(version);
        for (name, enabled) in selections {
            set.set(name.as_ref(), enabled);
        }
        set
    }

    /// Parse a Spack-style selection string and apply it over the defaults.
    pub fn parse(version: SchemaVersion, input: &str) -> Result<Self> {
        let selections = parse_selection(input)?;
        Ok(Self::from_selections(version, selections))
    }

    /// Set a variant by name. Returns `false` when the name is unknown or not
    /// declared by this revision; the set is left unchanged in that case.
    pub fn set(&mut self, name: &str, enabled: bool) -> bool {
        let Ok(variant) = name.parse::<Variant>() else {
            warn!(variant = name, schema = %self.schema, "ignoring unknown variant");
            return false;
        };
        match self.variants.get_mut(&variant) {
            Some(state) => {
                *state = enabled;
                true
            }
            None => {
                warn!(variant = name, schema = %self.schema, "variant not declared by this schema, ignoring");
                false
            }
        }
    }

    /// Builder form of [`set`](Self::set) for a typed variant.
    pub fn with(mut self, variant: Variant, enabled: bool) -> Self {
        if let Some(state) = self.variants.get_mut(&variant) {
            *state = enabled;
        } else {
            debug!(%variant, schema = %self.schema, "variant not declared by this schema, ignoring");
        }
        self
    }

    pub fn version(&self) -> SchemaVersion {
        self.schema
    }

    pub fn schema(&self) -> &'static Schema {
        schema(self.schema)
    }

    /// Undeclared variants read as disabled.
    pub fn is_enabled(&self, variant: Variant) -> bool {
        self.variants.get(&variant).copied().unwrap_or(false)
    }

    /// State of a declared variant, `None` if undeclared.
    pub fn get(&self, variant: Variant) -> Option<bool> {
        self.variants.get(&variant).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variant, bool)> + '_ {
        self.variants.iter().map(|(v, on)| (*v, *on))
    }

    pub fn enabled(&self) -> impl Iterator<Item = Variant> + '_ {
        self.iter().filter(|(_, on)| *on).map(|(v, _)| v)
    }
}

/// Spack-style rendering in declaration order: `+thallium~ofi~ucx`.
impl fmt::Display for VariantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decl in self.schema().variants {
            let sigil = if self.is_enabled(decl.variant) { '+' } else { '~' };
            write!(f, "{}{}", sigil, decl.variant)?;
        }
        Ok(())
    }
}

/// Split a selection string into `(name, enabled)` pairs.
///
/// Names are not checked against any schema here; that happens when the
/// pairs are applied to a [`VariantSet`].
pub fn parse_selection(input: &str) -> Result<Vec<(String, bool)>> {
    let mut selections = Vec::new();
    for token in input.split_whitespace() {
        if let Some((name, value)) = token.split_once('=') {
            if token.starts_with(['+', '~', '-']) {
                return Err(RecipeError::invalid_selection(format!(
                    "'{}' mixes a sigil with an assignment",
                    token
                )));
            }
            validate_name(name, token)?;
            selections.push((name.to_string(), parse_bool(value, token)?));
            continue;
        }
        parse_sigil_token(token, &mut selections)?;
    }
    Ok(selections)
}

fn parse_sigil_token(token: &str, out: &mut Vec<(String, bool)>) -> Result<()> {
    let mut enabled = match token.chars().next() {
        Some('+') => true,
        Some('~' | '-') => false,
        _ => {
            return Err(RecipeError::invalid_selection(format!(
                "'{}' needs a '+' or '~' prefix, or name=value",
                token
            )));
        }
    };
    // sigils are ASCII, so byte offsets below are char boundaries
    let rest = &token[1..];
    let mut start = 0;
    for (i, c) in rest.char_indices() {
        if c == '+' || c == '~' {
            let name = &rest[start..i];
            validate_name(name, token)?;
            out.push((name.to_string(), enabled));
            enabled = c == '+';
            start = i + 1;
        }
    }
    let name = &rest[start..];
    validate_name(name, token)?;
    out.push((name.to_string(), enabled));
    Ok(())
}

fn validate_name(name: &str, token: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RecipeError::invalid_selection(format!(
            "empty variant name in '{}'",
            token
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(RecipeError::invalid_selection(format!(
            "'{}' is not a valid variant name",
            name
        )));
    }
    Ok(())
}

fn parse_bool(value: &str, token: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(RecipeError::invalid_selection(format!(
            "'{}' is not a boolean in '{}'",
            value, token
        ))),
    }
}
