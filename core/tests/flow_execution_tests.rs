// parish-flow/tests/flow_execution_tests.rs
mod common;

use common::*;
use parish_flow::{Flow, FlowCtx, FlowError, FlowOutcome, StepControl, StepDef};
use serial_test::serial;
use std::sync::Arc;

fn three_step_flow() -> Flow<TestCtx, TestError> {
  let mut flow = Flow::new(
    "three_steps",
    vec![StepDef::required("one"), StepDef::required("two"), StepDef::required("three")],
  );
  flow.on("one", recording_handler("one"));
  flow.on("two", recording_handler("two"));
  flow.on("three", recording_handler("three"));
  flow
}

#[tokio::test]
#[serial]
async fn steps_run_in_declared_order() {
  setup_tracing();
  let flow = three_step_flow();
  let ctx = FlowCtx::new(TestCtx::default());

  let outcome = flow.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.trail, vec!["one", "two", "three"]);
}

#[tokio::test]
#[serial]
async fn halt_stops_remaining_steps() {
  setup_tracing();
  let flow = three_step_flow();
  let ctx = FlowCtx::new(TestCtx {
    halt_at: Some("two".to_string()),
    ..Default::default()
  });

  let outcome = flow.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Halted);
  assert!(!outcome.is_completed());
  assert_eq!(ctx.read().trail, vec!["one", "two"]);
}

#[tokio::test]
#[serial]
async fn before_on_after_phases_run_in_order() {
  setup_tracing();
  let mut flow = Flow::<TestCtx, TestError>::new("phases", vec![StepDef::required("work")]);
  flow.after("work", |ctx: FlowCtx<TestCtx>| async move {
    ctx.write().trail.push("after".into());
    Ok::<_, TestError>(StepControl::Continue)
  });
  flow.before("work", |ctx: FlowCtx<TestCtx>| async move {
    ctx.write().trail.push("before".into());
    Ok::<_, TestError>(StepControl::Continue)
  });
  flow.on("work", |ctx: FlowCtx<TestCtx>| async move {
    ctx.write().trail.push("on".into());
    Ok::<_, TestError>(StepControl::Continue)
  });

  let ctx = FlowCtx::new(TestCtx::default());
  flow.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().trail, vec!["before", "on", "after"]);
}

#[tokio::test]
#[serial]
async fn handler_error_type_converts_into_flow_error_type() {
  setup_tracing();
  let mut flow = Flow::<TestCtx, TestError>::new("converts", vec![StepDef::required("engine_error")]);
  flow.on("engine_error", |_ctx: FlowCtx<TestCtx>| async move {
    Err::<StepControl, FlowError>(FlowError::Internal("boom".into()))
  });

  let err = flow.run(FlowCtx::new(TestCtx::default())).await.unwrap_err();

  match err {
    TestError::Flow(text) => assert!(text.contains("boom")),
    other => panic!("unexpected error: {other:?}"),
  }
}

#[tokio::test]
#[serial]
async fn skip_condition_bypasses_step() {
  setup_tracing();
  let mut flow = Flow::<TestCtx, TestError>::new(
    "skipping",
    vec![
      StepDef::required("one"),
      StepDef::required("maybe").skip_when(|ctx: FlowCtx<TestCtx>| ctx.snapshot(|c| c.counter >= 1)),
      StepDef::required("three"),
    ],
  );
  flow.on("one", recording_handler("one"));
  flow.on("maybe", recording_handler("maybe"));
  flow.on("three", recording_handler("three"));

  let ctx = FlowCtx::new(TestCtx::default());
  flow.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().trail, vec!["one", "three"]);
}

#[tokio::test]
#[serial]
async fn optional_step_without_handlers_is_skipped() {
  setup_tracing();
  let mut flow = Flow::<TestCtx, TestError>::new("optional", vec![StepDef::required("one"), StepDef::optional("later")]);
  flow.on("one", recording_handler("one"));

  let outcome = flow.run(FlowCtx::new(TestCtx::default())).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Completed);
}

#[tokio::test]
#[serial]
async fn structural_edits_change_step_order() {
  setup_tracing();
  let mut flow = three_step_flow();
  flow.insert_before("two", StepDef::required("one_and_a_half"));
  flow.insert_after("three", StepDef::optional("tail"));
  flow.remove_step("one");
  flow.on("one_and_a_half", recording_handler("one_and_a_half"));

  assert_eq!(flow.step_names(), vec!["one_and_a_half", "two", "three", "tail"]);

  let ctx = FlowCtx::new(TestCtx::default());
  flow.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().trail, vec!["one_and_a_half", "two", "three"]);
}

#[tokio::test]
#[serial]
async fn skip_condition_can_be_replaced_and_cleared() {
  setup_tracing();
  let mut flow = three_step_flow();
  flow.set_skip_condition("two", Some(Arc::new(|_ctx: FlowCtx<TestCtx>| true)));

  let ctx = FlowCtx::new(TestCtx::default());
  flow.run(ctx.clone()).await.unwrap();
  let trail = ctx.map_read(|c| c.trail.as_slice());
  assert_eq!(&*trail, ["one", "three"]);
  drop(trail);

  flow.set_skip_condition("two", None);
  let ctx = FlowCtx::new(TestCtx::default());
  flow.run(ctx.clone()).await.unwrap();
  assert_eq!(*ctx.map_read(|c| &c.counter), 3);
}

#[tokio::test]
#[serial]
#[should_panic(expected = "is not declared")]
async fn registering_handler_for_unknown_step_panics() {
  let mut flow = three_step_flow();
  flow.on("missing", recording_handler("missing"));
}
