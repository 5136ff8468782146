//! Serialized scoring pipeline.
//!
//! The artifact is the JSON export of the trained classifier together with
//! its preprocessing: the encoded input columns in trained order, the
//! per-column standardization parameters, and the logistic-regression
//! coefficients. The service never trains or mutates it.

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// One encoded input column of the pipeline, in trained order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncodedColumn {
    /// Continuous column, z-scored with the training-set mean and std.
    Numeric {
        /// Source column name in the model's input vocabulary.
        source: String,
        mean: f64,
        std: f64,
    },
    /// One-hot indicator against a single categorical level.
    Indicator {
        /// Source column name in the model's input vocabulary.
        source: String,
        /// Category string the indicator fires on.
        level: String,
    },
}

impl EncodedColumn {
    pub fn source(&self) -> &str {
        match self {
            EncodedColumn::Numeric { source, .. } => source,
            EncodedColumn::Indicator { source, .. } => source,
        }
    }
}

/// The deserialized classifier-with-preprocessing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringArtifact {
    pub name: String,
    pub version: String,
    pub trained_at: DateTime<Utc>,
    /// Encoded input columns, in the model's trained order.
    pub columns: Vec<EncodedColumn>,
    /// One coefficient per encoded column.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Decision threshold for the positive class.
    pub threshold: f64,
}

impl ScoringArtifact {
    /// Structural consistency checks. A failure here means the export step
    /// produced a broken file; the artifact must not be used.
    fn validate(&self) -> Result<(), AppError> {
        if self.columns.is_empty() {
            return Err(AppError::ModelLoadError(
                "artifact has no input columns".to_string(),
            ));
        }
        if self.coefficients.len() != self.columns.len() {
            return Err(AppError::ModelLoadError(format!(
                "artifact has {} coefficients for {} columns",
                self.coefficients.len(),
                self.columns.len()
            )));
        }
        if !self.intercept.is_finite() {
            return Err(AppError::ModelLoadError(
                "artifact intercept is not finite".to_string(),
            ));
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(AppError::ModelLoadError(format!(
                "coefficient for column '{}' is not finite",
                self.columns[i].source()
            )));
        }
        for column in &self.columns {
            if let EncodedColumn::Numeric { source, mean, std } = column {
                if !mean.is_finite() || !std.is_finite() || *std <= 0.0 {
                    return Err(AppError::ModelLoadError(format!(
                        "invalid standardization parameters for column '{}'",
                        source
                    )));
                }
            }
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(AppError::ModelLoadError(format!(
                "decision threshold {} is outside (0, 1)",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Loads and validates the scoring artifact from `path`.
///
/// * Missing file -> [`AppError::ModelNotFound`] with the path.
/// * Unreadable, unparsable, or inconsistent file -> [`AppError::ModelLoadError`].
///
/// On any failure no partially constructed artifact escapes. The caller is
/// expected to invoke this exactly once, at startup, and hold the result for
/// the process lifetime.
pub fn load(path: impl AsRef<Path>) -> Result<ScoringArtifact, AppError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AppError::ModelNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| AppError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

    let artifact: ScoringArtifact = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

    artifact.validate()?;

    // Provenance: tie the log line to the exact bytes that were scored with.
    let digest = hex::encode(Sha256::digest(&bytes));
    tracing::info!(
        "Loaded scoring artifact '{}' v{} ({} columns, sha256={})",
        artifact.name,
        artifact.version,
        artifact.columns.len(),
        &digest[..16]
    );

    Ok(artifact)
}
