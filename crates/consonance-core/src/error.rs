use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No usable catalog rows survived cleaning; nothing can be ranked.
    #[error("empty corpus: no usable catalog entries out of {rows_read} rows")]
    EmptyCorpus { rows_read: usize },

    /// A transform was requested before the vectorizer was fitted.
    #[error("vectorizer has not been fitted")]
    NotFitted,

    #[error("invalid input during {stage}: {message}")]
    InvalidInput {
        stage: &'static str,
        message: String,
    },

    #[error("artist already picked: {name}")]
    DuplicateSeed { name: String },

    #[error("seed slot {index} out of range (have {slots} slots)")]
    SlotOutOfRange { index: usize, slots: usize },
}

impl Error {
    pub fn invalid_input(stage: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            stage,
            message: message.into(),
        }
    }

    /// Returns `true` when the caller can recover by asking the user to
    /// try again, rather than treating the failure as a setup bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::DuplicateSeed { .. } | Self::SlotOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
