//! Batch export configuration.
//!
//! A batch file lists independent exports:
//!
//! ```yaml
//! exports:
//!   - input: notebooks/analysis.ipynb
//!     output: site/analysis.html
//!     template: academic
//!     context:
//!       title: Quarterly Analysis
//!   - input: notebooks/scratch.ipynb
//!     output: site/scratch.html
//! ```
//!
//! Relative paths are taken as given, relative to the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ExportSummary;
use super::context::ExtraContext;
use crate::error::{ExportError, ExportResult};
use crate::templates::DEFAULT_TEMPLATE;

/// A list of exports to run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub exports: Vec<ExportRecord>,
}

/// One export of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Notebook to read.
    pub input: PathBuf,

    /// HTML file to write.
    pub output: PathBuf,

    /// Template name, `default` when omitted.
    #[serde(default = "default_template")]
    pub template: String,

    /// Extra template variables.
    #[serde(default)]
    pub context: ExtraContext,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl BatchConfig {
    /// Read a batch configuration from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> ExportResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content).map_err(|e| ExportError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse a batch configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

/// Result of one batch record.
#[derive(Debug)]
pub struct RecordOutcome {
    pub record: ExportRecord,
    pub result: ExportResult<ExportSummary>,
}

/// Results of a batch run, in record order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// Whether every record exported.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}
