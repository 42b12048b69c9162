// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CriterionError {
    #[error("Criterion '{criterion}' failed: {message}")]
    Failed { criterion: String, message: String },
    #[error("Criterion '{criterion}' panicked: {message}")]
    Panicked { criterion: String, message: String },
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

impl CriterionError {
    pub fn failed(criterion: &str, message: impl Into<String>) -> Self {
        CriterionError::Failed {
            criterion: criterion.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn from_panic(criterion: &str, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };

        CriterionError::Panicked {
            criterion: criterion.to_string(),
            message,
        }
    }
}
