//! Pull-request body rendering.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use pack_fs::normalize_line_endings;
use pack_manifest::PackManifest;
use regex::Regex;

use crate::report::ApplyResult;

static RUN_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Run ID: \d+").expect("Invalid run id regex"));

const DEFAULT_PACK_NAME: &str = "AgentOps Pack";
const DEFAULT_PACK_VERSION: &str = "latest";

/// Run metadata rendered alongside the change set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrContext {
    pub run_id: String,
    /// Target repository, `owner/name`.
    pub repo: String,
    /// Detected repository signals; rendered sorted by key.
    pub signals: BTreeMap<String, String>,
    pub questions: Vec<String>,
    /// Version shown in the title in place of the manifest's, unless `latest`.
    pub pack_version: Option<String>,
}

impl PrContext {
    pub fn new(run_id: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            repo: repo.into(),
            ..Self::default()
        }
    }
}

/// Render the pull-request body for an apply run.
///
/// Only added and updated files are listed. The output depends on nothing
/// but the arguments.
pub fn build_pr_body(result: &ApplyResult, manifest: &PackManifest, context: &PrContext) -> String {
    let name = manifest.name.as_deref().unwrap_or(DEFAULT_PACK_NAME);
    let version = context
        .pack_version
        .as_deref()
        .filter(|version| *version != DEFAULT_PACK_VERSION)
        .or(manifest.version.as_deref())
        .unwrap_or(DEFAULT_PACK_VERSION);
    let summary = &result.summary;

    let mut lines = vec![
        format!("## AgentOps Pack: {name} v{version}"),
        String::new(),
        format!("Target repository: `{}`", context.repo),
        String::new(),
        "### Summary".to_string(),
        String::new(),
        "| Added | Updated | Unchanged | Skipped |".to_string(),
        "|---|---|---|---|".to_string(),
        format!(
            "| {} | {} | {} | {} |",
            summary.added, summary.updated, summary.unchanged, summary.skipped
        ),
        String::new(),
        "### Changed Files".to_string(),
        String::new(),
    ];

    let mut changed: Vec<_> = result
        .changes
        .iter()
        .filter(|change| change.status.is_write())
        .collect();
    changed.sort_by(|a, b| a.path.cmp(&b.path));
    if changed.is_empty() {
        lines.push("_No file changes_".to_string());
    }
    lines.extend(
        changed
            .iter()
            .map(|change| format!("- `{}` ({})", change.path, change.status)),
    );

    if !result.warnings.is_empty() {
        lines.extend([String::new(), "### Warnings".to_string(), String::new()]);
        lines.extend(result.warnings.iter().map(|warning| format!("- {warning}")));
    }

    if !context.signals.is_empty() {
        lines.extend([String::new(), "### Detected Signals".to_string(), String::new()]);
        lines.extend(
            context
                .signals
                .iter()
                .map(|(key, value)| format!("- **{key}**: {value}")),
        );
    }

    if !context.questions.is_empty() {
        lines.extend([
            String::new(),
            "### Questions & Assumptions".to_string(),
            String::new(),
        ]);
        lines.extend(context.questions.iter().map(|question| format!("- [ ] {question}")));
    }

    lines.extend([
        String::new(),
        "---".to_string(),
        format!("Run ID: {}", context.run_id),
    ]);

    let mut body = lines.join("\n");
    body.push('\n');
    body
}

/// Replace every `Run ID: <digits>` with a fixed placeholder.
pub fn strip_run_ids(content: &str) -> String {
    RUN_ID_REGEX
        .replace_all(content, "Run ID: <stripped>")
        .into_owned()
}

/// Whether two bodies differ only in run ids or line endings.
pub fn bodies_equivalent(a: &str, b: &str) -> bool {
    strip_run_ids(&normalize_line_endings(a)) == strip_run_ids(&normalize_line_endings(b))
}
