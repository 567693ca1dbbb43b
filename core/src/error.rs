// parish-flow/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Framework-level failures raised by the engine itself.
///
/// Application flows pick their own error type `E`; the only requirement is
/// `E: From<FlowError>` so that these failures can be surfaced through it.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Extractor failed for branch '{arm}' of step '{step_name}': {source}")]
  ExtractorFailure {
    step_name: String,
    arm: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Sub-flow provider failed for branch '{arm}' of step '{step_name}': {source}")]
  ProviderFailure {
    step_name: String,
    arm: String,
    #[source]
    source: AnyhowError,
  },

  #[error("No branch matched for step '{step_name}'")]
  NoBranchMatched { step_name: String },

  #[error("Context type mismatch (expected {expected_type}) in '{step_name}'")]
  TypeMismatch { step_name: String, expected_type: String },

  #[error("Handler failed: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error for '{step_name}': {message}")]
  Configuration { step_name: String, message: String },

  #[error("Internal flow error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<FlowError>() {
      Ok(flow_err) => flow_err,
      Err(other) => FlowError::Handler { source: other },
    }
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
