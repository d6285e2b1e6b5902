//! Error types for meterstat-context.

/// Error type for all fallible operations in the meterstat-context crate.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// Returned when a contextual table cannot be read.
    #[error("cannot read {table} table: {reason}")]
    Io {
        /// Which contextual table failed.
        table: String,
        /// Description of the underlying I/O failure.
        reason: String,
    },

    /// Returned when a segmentation variable name is not recognised.
    #[error("unknown segmentation variable '{name}'")]
    UnknownVariable {
        /// The unrecognised name.
        name: String,
    },
}

impl ContextError {
    pub(crate) fn io(table: &str, e: meterstat_io::IoError) -> Self {
        ContextError::Io {
            table: table.to_string(),
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn display_io() {
        let err = ContextError::io(
            "survey",
            meterstat_io::IoError::FileNotFound {
                path: PathBuf::from("/data/survey.csv"),
            },
        );
        assert_eq!(
            err.to_string(),
            "cannot read survey table: file not found: /data/survey.csv"
        );
    }

    #[test]
    fn display_unknown_variable() {
        let err = ContextError::UnknownVariable {
            name: "pets".to_string(),
        };
        assert_eq!(err.to_string(), "unknown segmentation variable 'pets'");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ContextError>();
    }
}
