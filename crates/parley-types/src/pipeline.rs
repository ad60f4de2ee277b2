//! Result shape returned by the external agent pipeline.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Output of one pipeline invocation.
///
/// A pipeline may complete the call yet report a failure of its own; that is
/// carried in `error` rather than inferred from the shape of the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            error: Some(error.into()),
        }
    }

    /// Collapse into the reply text, treating a reported error as a failure.
    pub fn into_result(self) -> Result<String, PipelineError> {
        match self.error {
            Some(error) => Err(PipelineError::Reported(error)),
            None => Ok(self.text),
        }
    }
}
