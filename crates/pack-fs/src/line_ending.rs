//! Line-ending detection and conversion
//!
//! Text is matched and rewritten in LF form. The target convention is
//! only reapplied to the bytes that are finally written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Newline convention used when writing a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    /// Detect the convention of existing content.
    ///
    /// Any `\r\n` pair selects CRLF. Absent or LF-only content selects LF.
    pub fn detect(content: Option<&str>) -> Self {
        match content {
            Some(text) if text.contains("\r\n") => Self::Crlf,
            _ => Self::Lf,
        }
    }

    /// Convert LF-normalized text to this convention.
    pub fn apply(self, content: &str) -> String {
        match self {
            Self::Lf => normalize_line_endings(content),
            Self::Crlf => normalize_line_endings(content).replace('\n', "\r\n"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "lf",
            Self::Crlf => "crlf",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" => Ok(Self::Lf),
            "crlf" => Ok(Self::Crlf),
            other => Err(format!("unknown line ending '{other}' (expected lf or crlf)")),
        }
    }
}

/// Replace every `\r\n` with `\n`.
pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
