//! Apply and pr-body command implementations
//!
//! Both commands share one pipeline: layered config, component
//! resolution, source loading and the apply run itself.

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use pack_core::config::{
    ConfigLayer, DEFAULT_CONFIG_PATH, RedactedInputs, default_layer, load_config_file,
    merge_config,
};
use pack_core::summary::bodies_equivalent;
use pack_core::{
    ApplyMode, ApplyOptions, ApplyResult, ChangeStatus, PackConfig, PackManifest, PrContext,
    SourceMapping, apply_files, build_pr_body, load_pack_source, resolve_components,
};
use pack_fs::{NormalizedPath, io};
use pack_manifest::ComponentGraph;
use serde::Serialize;
use serde_json::Value;

use crate::cli::RunArgs;
use crate::commands::load_manifest;
use crate::error::{CliError, Result};

/// Everything a finished pipeline run produced.
struct Outcome {
    config: PackConfig,
    manifest: PackManifest,
    mode: ApplyMode,
    result: ApplyResult,
    /// Config and source warnings; per-file warnings live in `result`.
    warnings: Vec<String>,
    redacted_inputs: RedactedInputs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    mode: ApplyMode,
    strategy: pack_core::ApplyStrategy,
    result: &'a ApplyResult,
    warnings: &'a [String],
    redacted_inputs: &'a RedactedInputs,
}

/// Build the input layer from options that were actually given.
fn input_layer(args: &RunArgs) -> ConfigLayer {
    let mut layer = ConfigLayer::new();
    if let Some(repo) = &args.repo {
        layer.insert("repo".into(), Value::String(repo.clone()));
    }
    if let Some(version) = &args.pack_version {
        layer.insert("packVersion".into(), Value::String(version.clone()));
    }
    if let Some(components) = &args.components {
        let names = components
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(|name| Value::String(name.to_string()))
            .collect();
        layer.insert("components".into(), Value::Array(names));
    }
    if let Some(config) = &args.config {
        layer.insert(
            "configPath".into(),
            Value::String(NormalizedPath::new(config).to_string()),
        );
    }
    if args.apply {
        layer.insert("apply".into(), Value::Bool(true));
    }
    if args.strict {
        layer.insert("strict".into(), Value::Bool(true));
    }
    if let Some(strategy) = args.strategy {
        layer.insert("strategy".into(), Value::String(strategy.to_string()));
    }
    if let Some(line_ending) = args.line_ending {
        layer.insert("lineEnding".into(), Value::String(line_ending.to_string()));
    }
    layer
}

/// Run the whole pipeline. `force_dry_run` overrides the configured mode.
fn execute(args: &RunArgs, force_dry_run: bool) -> Result<Outcome> {
    let manifest = load_manifest(args.manifest.as_deref())?;
    let target = NormalizedPath::new(&args.target);

    let config_path = match &args.config {
        Some(path) => NormalizedPath::new(path),
        None => target.join(DEFAULT_CONFIG_PATH),
    };
    let file = load_config_file(&config_path);
    let mut warnings = file.warnings;

    let merged = merge_config(
        &default_layer(&manifest),
        Some(&file.values),
        Some(&input_layer(args)),
    );
    let Some(config) = merged.config else {
        let messages: Vec<String> = merged.errors.iter().map(ToString::to_string).collect();
        return Err(CliError::user(format!(
            "invalid configuration: {}",
            messages.join("; ")
        )));
    };
    warnings.extend(merged.warnings.iter().map(ToString::to_string));

    if config.strict && !merged.unknown_fields.is_empty() {
        return Err(CliError::user(format!(
            "unknown config fields in strict mode: {}",
            merged.unknown_fields.join(", ")
        )));
    }

    let selection = resolve_components(&manifest, &config.components);
    warnings.extend(selection.warnings.iter().cloned());
    let Some(resolved) = selection.resolved else {
        return Err(CliError::user(format!(
            "component resolution failed: {}",
            selection.errors.join("; ")
        )));
    };
    let ordered = ComponentGraph::from_manifest(&manifest).install_order(&resolved)?;
    tracing::debug!(components = ?ordered, "install order");

    let source = load_pack_source(
        &NormalizedPath::new(&args.pack_root),
        &ordered,
        &SourceMapping::standard(),
    )?;
    warnings.extend(source.warnings);

    let mode = if force_dry_run {
        ApplyMode::DryRun
    } else {
        ApplyMode::from_apply_flag(config.apply)
    };
    let options = ApplyOptions {
        mode,
        strategy: config.strategy,
        line_ending: config.line_ending,
    };
    let result = apply_files(&target, &source.files, &options)?;

    Ok(Outcome {
        config,
        manifest,
        mode,
        result,
        warnings,
        redacted_inputs: merged.redacted_inputs,
    })
}

fn status_marker(status: ChangeStatus) -> colored::ColoredString {
    match status {
        ChangeStatus::Added => "+".green(),
        ChangeStatus::Updated => "~".yellow(),
        ChangeStatus::Unchanged => "=".dimmed(),
        ChangeStatus::Skipped => "!".red(),
    }
}

fn print_report(outcome: &Outcome) {
    for warning in &outcome.warnings {
        println!("{} {}", "WARN".yellow().bold(), warning);
    }

    let verb = match outcome.mode {
        ApplyMode::Apply => "Applied",
        ApplyMode::DryRun => "Dry run of",
    };
    println!(
        "{} {} {} to {} ({} strategy):",
        "=>".blue().bold(),
        verb,
        outcome
            .manifest
            .name
            .as_deref()
            .unwrap_or("pack")
            .cyan(),
        outcome.config.repo.cyan(),
        outcome.config.strategy
    );

    for change in &outcome.result.changes {
        match &change.reason {
            Some(reason) => println!(
                "   {} {} {}",
                status_marker(change.status),
                change.path,
                format!("({reason})").dimmed()
            ),
            None => println!(
                "   {} {} {}",
                status_marker(change.status),
                change.path,
                change.status.to_string().dimmed()
            ),
        }
    }

    let summary = outcome.result.summary;
    if outcome.result.no_changes {
        println!("{} No changes needed. {}", "OK".green().bold(), summary);
    } else {
        println!("{} {}", "OK".green().bold(), summary);
    }
}

fn enforce_strict(outcome: &Outcome) -> Result<()> {
    if outcome.config.strict && outcome.result.has_skips() {
        return Err(CliError::user(format!(
            "{} file(s) skipped in strict mode",
            outcome.result.summary.skipped
        )));
    }
    Ok(())
}

/// Run the apply command
pub fn run_apply(args: &RunArgs) -> Result<()> {
    let outcome = execute(args, false)?;

    if args.json {
        let report = JsonReport {
            mode: outcome.mode,
            strategy: outcome.config.strategy,
            result: &outcome.result,
            warnings: &outcome.warnings,
            redacted_inputs: &outcome.redacted_inputs,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&outcome);
    }

    enforce_strict(&outcome)
}

/// Extra inputs of the pr-body command.
pub struct PrBodyOptions<'a> {
    pub run_id: &'a str,
    pub signals: &'a [(String, String)],
    pub questions: &'a [String],
    pub previous: Option<&'a Path>,
}

/// Run the pr-body command
///
/// Always a dry run. The body goes to stdout; a comparison with
/// `--previous` is reported on stderr so the body stays pipeable.
pub fn run_pr_body(args: &RunArgs, options: &PrBodyOptions<'_>) -> Result<()> {
    let outcome = execute(args, true)?;

    let mut context = PrContext::new(options.run_id, outcome.config.repo.clone());
    context.signals = options.signals.iter().cloned().collect::<BTreeMap<_, _>>();
    context.questions = options.questions.to_vec();
    context.pack_version = outcome.config.pack_version.clone();
    let mut result = outcome.result.clone();
    result.warnings.extend(outcome.warnings.iter().cloned());

    let body = build_pr_body(&result, &outcome.manifest, &context);

    if let Some(previous) = options.previous {
        let previous = io::read_text(&NormalizedPath::new(previous))?;
        if bodies_equivalent(&previous, &body) {
            eprintln!("{} PR body unchanged apart from run id", "OK".green().bold());
        } else {
            eprintln!("{} PR body differs from previous", "=>".blue().bold());
        }
    }

    print!("{body}");
    enforce_strict(&outcome)
}
