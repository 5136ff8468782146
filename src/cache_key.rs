use crate::errors::AppError;
use crate::models::ClientRecord;
use sha2::{Digest, Sha256};

/// Computes the score-cache key for a record: the SHA-256 digest of its
/// canonical JSON form, hex encoded.
///
/// Two submissions of the same form state hash to the same key, so repeat
/// requests within the cache TTL are served without re-scoring.
pub fn request_digest(record: &ClientRecord) -> Result<String, AppError> {
    let canonical = serde_json::to_string(record)
        .map_err(|e| AppError::InternalError(format!("failed to serialize record: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
