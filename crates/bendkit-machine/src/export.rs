//! Profile export
//!
//! After a job is processed, the formed sheet is handed to downstream
//! consumers (renderers, reports) as a [`ProfileSnapshot`]. Exporters are
//! plugged in through the [`ProfileExporter`] trait.

use crate::error::ExportError;
use async_trait::async_trait;
use bendkit_job::{BendStep, SheetMetal};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Consistent view of a formed sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSnapshot {
    pub job_name: String,
    pub sheet_id: String,
    pub length: f64,
    pub width: f64,
    pub thickness: f64,
    pub material: String,
    /// Formed bends in execution order
    pub bends: Vec<BendStep>,
}

impl ProfileSnapshot {
    pub fn from_sheet(job_name: &str, sheet: &SheetMetal) -> Self {
        Self {
            job_name: job_name.to_string(),
            sheet_id: sheet.id().to_string(),
            length: sheet.original_length(),
            width: sheet.width(),
            thickness: sheet.thickness(),
            material: sheet.material().name.to_string(),
            bends: sheet.current_bends().to_vec(),
        }
    }
}

/// What an exporter produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileArtifact {
    /// Short format tag, e.g. "json"
    pub format: String,
    /// Where the artifact was written, if it was written to disk
    pub location: Option<PathBuf>,
    pub bytes_written: u64,
}

/// Receives formed profiles after successful processing
#[async_trait]
pub trait ProfileExporter: Send + Sync {
    async fn export(&self, snapshot: &ProfileSnapshot) -> Result<ProfileArtifact, ExportError>;
}

/// Writes each profile as pretty-printed JSON into a directory
#[derive(Debug, Clone)]
pub struct JsonProfileExporter {
    output_dir: PathBuf,
}

impl JsonProfileExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Target file for a sheet id; path separators are replaced
    pub fn path_for(&self, sheet_id: &str) -> PathBuf {
        let file_stem: String = sheet_id
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.output_dir.join(format!("{}.profile.json", file_stem))
    }
}

#[async_trait]
impl ProfileExporter for JsonProfileExporter {
    async fn export(&self, snapshot: &ProfileSnapshot) -> Result<ProfileArtifact, ExportError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self.path_for(&snapshot.sheet_id);
        tokio::fs::write(&path, json.as_bytes()).await?;
        tracing::info!(path = %path.display(), bends = snapshot.bends.len(), "Profile exported");

        Ok(ProfileArtifact {
            format: "json".to_string(),
            location: Some(path),
            bytes_written: json.len() as u64,
        })
    }
}
