//! Non-interactive catalog listing (`--list`)

use std::fmt::Write as _;

use crate::catalog::Catalog;
use crate::cli::OutputFormat;
use crate::error::DocumentError;

/// Render a catalog for scripting or for checking the enumerator setup
///
/// # Errors
///
/// Returns `DocumentError` if JSON or YAML serialization fails.
pub fn render(catalog: &Catalog, format: OutputFormat) -> Result<String, DocumentError> {
    match format {
        OutputFormat::Text => Ok(render_text(catalog)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(catalog)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => Ok(serde_yaml::to_string(catalog)?),
    }
}

fn render_text(catalog: &Catalog) -> String {
    let mut out = String::new();
    for domain in catalog.domains() {
        let _ = writeln!(out, "{} ({} beans)", domain.name, domain.beans.len());
        for bean in &domain.beans {
            let _ = writeln!(
                out,
                "  {} <{}>{}: {}",
                bean.name, bean.attribute, bean.value_name, bean.value
            );
        }
    }
    let _ = writeln!(
        out,
        "{} domains, {} beans",
        catalog.len(),
        catalog.bean_count()
    );
    out
}
