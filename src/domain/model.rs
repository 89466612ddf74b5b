use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named subdirectory of the batch root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub name: String,
    /// Marker subdirectory, relative to the root.
    pub marker_dir: PathBuf,
}

/// One qualifying line of a link-list file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub division: String,
    pub source: PathBuf,
    /// 1-based line number in `source`.
    pub line_number: usize,
    pub url: String,
    /// Directory receiving the artifact, relative to the root.
    pub output_dir: PathBuf,
}

/// Output of discovery: every entry to encode, sequenced before any write.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    pub divisions: Vec<Division>,
    pub link_lists: Vec<PathBuf>,
    pub entries: Vec<LinkEntry>,
    pub failures: Vec<BatchFailure>,
}

/// Output path chosen for one entry, before anything is encoded.
#[derive(Debug, Clone)]
pub struct PlannedArtifact {
    pub entry: LinkEntry,
    pub path: PathBuf,
    /// An earlier line in the same directory has the same URL and already
    /// owns `path`.
    pub duplicate: bool,
}

/// Every entry with its output path, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct ArtifactPlan {
    pub divisions: usize,
    pub link_lists: usize,
    pub artifacts: Vec<PlannedArtifact>,
    pub failures: Vec<BatchFailure>,
}

impl ArtifactPlan {
    /// Planned artifacts that get their own file.
    pub fn distinct(&self) -> impl Iterator<Item = &PlannedArtifact> {
        self.artifacts.iter().filter(|artifact| !artifact.duplicate)
    }
}

/// A QR image written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrArtifact {
    pub division: String,
    pub url: String,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub line_number: Option<usize>,
    pub reason: String,
}

impl BatchFailure {
    pub fn file(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            line_number: None,
            reason: reason.to_string(),
        }
    }

    pub fn line(entry: &LinkEntry, reason: impl ToString) -> Self {
        Self {
            path: entry.source.clone(),
            line_number: Some(entry.line_number),
            reason: reason.to_string(),
        }
    }
}

/// Result of one batch run, artifacts in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub divisions: usize,
    pub link_lists: usize,
    pub artifacts: Vec<QrArtifact>,
    /// Lines repeating a URL already written to the same directory.
    pub duplicates: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        format!(
            "{} QR code(s) generated from {} link list(s) across {} division(s), {} duplicate line(s), {} failure(s)",
            self.artifacts.len(),
            self.link_lists,
            self.divisions,
            self.duplicates,
            self.failures.len()
        )
    }
}

/// One row of the municipality coordinate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    #[serde(rename = "Municipality")]
    pub municipality: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AscopeReport {
    pub report_id: String,
    pub generated_at: String,
    pub content: serde_json::Value,
}
