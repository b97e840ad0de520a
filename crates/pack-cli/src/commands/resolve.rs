//! Resolve command implementation

use std::path::Path;

use colored::Colorize;
use pack_core::resolve_components;

use crate::commands::load_manifest;
use crate::error::{CliError, Result};

/// Run the resolve command
///
/// With no components given, every manifest component is resolved.
pub fn run_resolve(components: &[String], manifest: Option<&Path>, json: bool) -> Result<()> {
    let manifest = load_manifest(manifest)?;
    let selected = if components.is_empty() {
        manifest.component_names()
    } else {
        components.to_vec()
    };

    let result = resolve_components(&manifest, &selected);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for warning in &result.warnings {
            println!("{} {}", "WARN".yellow().bold(), warning);
        }
        for error in &result.errors {
            println!("{} {}", "ERROR".red().bold(), error);
        }
        if let Some(resolved) = &result.resolved {
            println!("{} Resolved {} component(s):", "OK".green().bold(), resolved.len());
            for name in resolved {
                println!("   {} {}", "+".green(), name.cyan());
            }
        }
    }

    if result.is_ok() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "component resolution failed with {} error(s)",
            result.errors.len()
        )))
    }
}
