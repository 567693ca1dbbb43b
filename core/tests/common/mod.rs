// parish-flow/tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use parish_flow::{FlowCtx, FlowError, Handler, StepControl};
use tracing::Level;

#[derive(Clone, Debug, Default)]
pub struct TestCtx {
  pub counter: i32,
  pub trail: Vec<String>,
  pub halt_at: Option<String>,
  pub route: Option<String>,
  pub sub_result: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct SubCtx {
  pub input: String,
  pub output: String,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  /// Engine errors are kept as their debug text so assertions can compare them.
  #[error("flow error: {0}")]
  Flow(String),

  #[error("handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

/// Records the step, bumps the counter and halts when `halt_at` names this step.
pub fn recording_handler(step: &'static str) -> Handler<TestCtx, TestError> {
  Box::new(move |ctx: FlowCtx<TestCtx>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.trail.push(step.to_string());
      if guard.halt_at.as_deref() == Some(step) {
        return Ok(StepControl::Halt);
      }
      Ok(StepControl::Continue)
    })
  })
}

pub fn failing_handler(step: &'static str, message: &'static str) -> Handler<TestCtx, TestError> {
  Box::new(move |ctx: FlowCtx<TestCtx>| {
    Box::pin(async move {
      ctx.write().trail.push(step.to_string());
      Err(TestError::Handler(message.to_string()))
    })
  })
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
