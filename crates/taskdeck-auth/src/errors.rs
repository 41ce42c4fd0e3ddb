//! Auth error types.

/// Errors from local credential handling.
///
/// Remote failures are [`taskdeck_core::ApiError`]; this type only covers
/// the durable storage side.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let auth_err = AuthError::from(io_err);
        assert!(auth_err.to_string().contains("not found"));
    }

    #[test]
    fn json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        assert!(AuthError::from(json_err).to_string().starts_with("JSON error"));
    }
}
