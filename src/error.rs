//! Error types for tempo analysis
//!
//! Stream and detector errors are scoped to a single analysis pass: the
//! orchestrator logs them and moves on to the next configuration. Only
//! `NoEstimate` ever reaches the caller of a full estimate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while estimating tempo
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to open audio stream '{path}': {reason}")]
    StreamOpen { path: PathBuf, reason: String },

    #[error(
        "Cannot build tempo detector (window {window_size}, hop {hop_size}, {sample_rate} Hz): {reason}"
    )]
    DetectorConstruction {
        window_size: usize,
        hop_size: usize,
        sample_rate: u32,
        reason: String,
    },

    #[error("Tempo detector failed: {0}")]
    Detection(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not estimate BPM.")]
    NoEstimate,
}

impl AnalysisError {
    /// Whether this error only invalidates one analysis pass
    pub fn is_pass_scoped(&self) -> bool {
        matches!(
            self,
            AnalysisError::StreamOpen { .. }
                | AnalysisError::DetectorConstruction { .. }
                | AnalysisError::Detection(_)
        )
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_estimate_message_matches_cli_output() {
        assert_eq!(AnalysisError::NoEstimate.to_string(), "Could not estimate BPM.");
    }

    #[test]
    fn test_pass_scoped_errors() {
        let open = AnalysisError::StreamOpen {
            path: PathBuf::from("/missing.wav"),
            reason: "not found".to_string(),
        };
        assert!(open.is_pass_scoped());
        assert!(!AnalysisError::NoEstimate.is_pass_scoped());
        assert!(!AnalysisError::InvalidConfig("empty".to_string()).is_pass_scoped());
    }
}
