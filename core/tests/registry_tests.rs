// parish-flow/tests/registry_tests.rs
mod common;

use common::*;
use parish_flow::{Flow, FlowCtx, FlowError, FlowOutcome, FlowRegistry, StepDef};
use serial_test::serial;

/// Application-level error a registry might surface, wrapping the flow's own error.
#[derive(Debug, thiserror::Error)]
enum AppError {
  #[error(transparent)]
  Flow(#[from] FlowError),
  #[error("{0}")]
  Test(#[from] TestError),
}

fn counting_flow(name: &str) -> Flow<TestCtx, TestError> {
  let mut flow = Flow::new(name, vec![StepDef::required("count")]);
  flow.on("count", recording_handler("count"));
  flow
}

#[tokio::test]
#[serial]
async fn runs_flow_registered_for_context_type() {
  setup_tracing();
  let registry: FlowRegistry<AppError> = FlowRegistry::new();
  registry.register(counting_flow("counting"));

  assert!(registry.is_registered::<TestCtx>());
  assert!(!registry.is_registered::<SubCtx>());

  let ctx = FlowCtx::new(TestCtx::default());
  let outcome = registry.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Completed);
  assert_eq!(ctx.read().counter, 1);
}

#[tokio::test]
#[serial]
async fn unregistered_context_is_a_configuration_error() {
  setup_tracing();
  let registry: FlowRegistry<AppError> = FlowRegistry::new();

  let err = registry.run(FlowCtx::new(SubCtx::default())).await.unwrap_err();

  assert!(matches!(err, AppError::Flow(FlowError::Configuration { .. })));
}

#[tokio::test]
#[serial]
async fn later_registration_replaces_earlier_one() {
  setup_tracing();
  let registry: FlowRegistry<AppError> = FlowRegistry::default();
  registry.register(counting_flow("first"));

  let mut replacement = counting_flow("second");
  replacement.insert_after("count", StepDef::required("count_again"));
  replacement.on("count_again", recording_handler("count_again"));
  registry.register(replacement);

  assert_eq!(registry.flow_names(), vec!["second".to_string()]);

  let ctx = FlowCtx::new(TestCtx::default());
  registry.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().trail, vec!["count", "count_again"]);
}

#[tokio::test]
#[serial]
async fn handler_errors_surface_through_registry_error() {
  setup_tracing();
  let registry: FlowRegistry<AppError> = FlowRegistry::new();
  let mut flow = Flow::<TestCtx, TestError>::new("failing", vec![StepDef::required("fail")]);
  flow.on("fail", failing_handler("fail", "no pew"));
  registry.register(flow);

  let err = registry.run(FlowCtx::new(TestCtx::default())).await.unwrap_err();

  assert!(matches!(err, AppError::Test(TestError::Handler(ref msg)) if msg == "no pew"));
}
