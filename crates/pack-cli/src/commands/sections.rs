//! Sections command implementation

use std::path::Path;

use colored::Colorize;
use pack_blocks::parse_blocks;
use pack_fs::{NormalizedPath, io, normalize_line_endings};
use serde::Serialize;

use crate::error::Result;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionInfo {
    id: String,
    start_line: usize,
    end_line: usize,
}

/// Run the sections command
///
/// Lists every well-formed managed section in `file`.
pub fn run_sections(file: &Path, json: bool) -> Result<()> {
    let path = NormalizedPath::new(file);
    let content = normalize_line_endings(&io::read_text(&path)?);
    let sections: Vec<SectionInfo> = parse_blocks(&content)
        .into_iter()
        .map(|block| SectionInfo {
            id: block.id,
            start_line: block.start_line,
            end_line: block.end_line,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    if sections.is_empty() {
        println!("{} No managed sections in {}", "=>".blue().bold(), path);
        return Ok(());
    }

    println!(
        "{} {} managed section(s) in {}:",
        "=>".blue().bold(),
        sections.len(),
        path
    );
    for section in &sections {
        println!(
            "   {} {} {}",
            "-".green(),
            section.id.cyan(),
            format!("(lines {}-{})", section.start_line, section.end_line).dimmed()
        );
    }
    Ok(())
}
