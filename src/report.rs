//! Human- and machine-readable renderings for the command line.

use std::fmt;

use crate::cli::OutputFormat;
use crate::logic::resolver::Resolution;
use crate::schema::{ProtocolPolicy, Schema};

/// Render a resolution in the requested format.
pub fn render_resolution(resolution: &Resolution, format: OutputFormat) -> serde_json::Result<String> {
    let out = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(resolution)?;
            json.push('\n');
            json
        }
        OutputFormat::Text => {
            let mut out: String = resolution.flags.iter().map(|def| format!("{}\n", def)).collect();
            out.push_str(&dependency_section(resolution));
            out
        }
        OutputFormat::Cmake => {
            let mut out = resolution.flags.cmake_args().join(" ");
            out.push('\n');
            out.push_str(&dependency_section(resolution));
            out
        }
    };
    Ok(out)
}

fn dependency_section(resolution: &Resolution) -> String {
    if resolution.dependencies.is_empty() {
        return String::new();
    }
    let lines: String = resolution
        .dependencies
        .iter()
        .map(|dep| format!("    {}\n", dep.spec))
        .collect();
    format!("\nDependencies:\n{}", lines)
}

/// `spack info`-style description of a recipe revision.
pub fn render_schema(schema: &Schema) -> String {
    SchemaInfo(schema).to_string()
}

/// Display adapter behind [`render_schema`].
pub struct SchemaInfo<'a>(pub &'a Schema);

impl fmt::Display for SchemaInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.0;
        writeln!(f, "hcl (recipe {})", schema.version)?;
        writeln!(f, "    url: {}", schema.url)?;
        writeln!(f, "    git: {}", schema.git)?;

        writeln!(f, "\nVersions:")?;
        for version in schema.versions {
            writeln!(f, "    {}", version)?;
        }

        writeln!(f, "\nVariants:")?;
        let width = schema
            .variants
            .iter()
            .map(|d| d.variant.to_string().len())
            .max()
            .unwrap_or(0);
        for decl in schema.variants {
            let kind = if decl.variant.is_communication() { "comm" } else { "aux " };
            writeln!(
                f,
                "    {:<width$}  [{}] default={:<5}  {}",
                decl.variant.to_string(),
                kind,
                decl.default,
                decl.description,
                width = width
            )?;
        }

        let order: Vec<String> = schema
            .backend_order
            .iter()
            .map(|(variant, backend)| format!("+{} -> {}", variant, backend))
            .collect();
        writeln!(f, "\nBackend precedence:")?;
        writeln!(f, "    {} (fallback {})", order.join(", "), schema.fallback_backend)?;

        writeln!(f, "\nProtocol:")?;
        match schema.protocol {
            ProtocolPolicy::Coupled { backend, order } => {
                let order: Vec<String> = order.iter().map(|(v, p)| format!("+{} -> {}", v, p)).collect();
                writeln!(f, "    only with {}: {}", backend, order.join(", "))?;
            }
            ProtocolPolicy::Decoupled { order, fallback } => {
                let order: Vec<String> = order.iter().map(|(v, p)| format!("+{} -> {}", v, p)).collect();
                writeln!(f, "    {} (fallback {})", order.join(", "), fallback)?;
            }
        }

        writeln!(f, "\nDependencies:")?;
        for rule in schema.dependencies {
            let when = rule.when.to_string();
            if when.is_empty() {
                writeln!(f, "    {}", rule.spec())?;
            } else {
                writeln!(f, "    {}  when {}", rule.spec(), when)?;
            }
        }

        if !schema.conflicts.is_empty() {
            writeln!(f, "\nConflicts:")?;
            for rule in schema.conflicts {
                writeln!(f, "    {} with {}: {}", rule.first, rule.second, rule.message)?;
            }
        }
        Ok(())
    }
}
