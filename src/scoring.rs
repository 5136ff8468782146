//! Prediction over a loaded artifact.

use crate::artifact::{EncodedColumn, ScoringArtifact};
use crate::errors::AppError;
use crate::models::{ClientRecord, ModelInfoResponse};

/// Result of scoring one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class: 1 = subscribes, 0 = does not.
    pub label: u8,
    /// Probability assigned to the subscription class.
    pub probability: f64,
}

/// A loaded, immutable scoring pipeline.
///
/// Owned by the composition root and shared read-only across requests; it is
/// never mutated after construction, so no locking is involved.
#[derive(Debug)]
pub struct ScoringModel {
    artifact: ScoringArtifact,
}

impl ScoringModel {
    pub fn new(artifact: ScoringArtifact) -> Self {
        Self { artifact }
    }

    pub fn version(&self) -> &str {
        &self.artifact.version
    }

    /// Probability of the subscription class for one record.
    ///
    /// Walks the artifact's encoded columns in trained order, resolving each
    /// against the typed record: z-score for numerics, 0/1 for indicators.
    /// A column whose source is not in the record's vocabulary means the
    /// artifact and this service disagree on the input schema; that is a
    /// [`AppError::PredictionError`], not a panic.
    pub fn predict_proba(&self, record: &ClientRecord) -> Result<f64, AppError> {
        let mut logit = self.artifact.intercept;

        for (column, coefficient) in self.artifact.columns.iter().zip(&self.artifact.coefficients)
        {
            let value = match column {
                EncodedColumn::Numeric { source, mean, std } => {
                    let raw = record.numeric(source).ok_or_else(|| {
                        AppError::PredictionError(format!(
                            "artifact expects unknown numeric column '{}'",
                            source
                        ))
                    })?;
                    (raw - mean) / std
                }
                EncodedColumn::Indicator { source, level } => {
                    let category = record.categorical(source).ok_or_else(|| {
                        AppError::PredictionError(format!(
                            "artifact expects unknown categorical column '{}'",
                            source
                        ))
                    })?;
                    if category == level.as_str() {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
            logit += coefficient * value;
        }

        Ok(sigmoid(logit))
    }

    /// Discrete class plus subscription probability for one record.
    pub fn predict(&self, record: &ClientRecord) -> Result<Prediction, AppError> {
        let probability = self.predict_proba(record)?;
        let label = u8::from(probability >= self.artifact.threshold);
        Ok(Prediction { label, probability })
    }

    pub fn info(&self) -> ModelInfoResponse {
        ModelInfoResponse {
            name: self.artifact.name.clone(),
            version: self.artifact.version.clone(),
            trained_at: self.artifact.trained_at,
            columns: self.artifact.columns.len(),
            threshold: self.artifact.threshold,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
