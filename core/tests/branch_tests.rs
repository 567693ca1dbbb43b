// parish-flow/tests/branch_tests.rs
mod common;

use common::*;
use parish_flow::{Flow, FlowCtx, FlowError, FlowOutcome, NoMatch, StepControl, StepDef};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn upper_flow() -> Arc<Flow<SubCtx, TestError>> {
  let mut flow = Flow::new("upper", vec![StepDef::required("transform")]);
  flow.on("transform", |ctx: FlowCtx<SubCtx>| async move {
    let mut guard = ctx.write();
    guard.output = guard.input.to_uppercase();
    Ok::<_, TestError>(StepControl::Continue)
  });
  Arc::new(flow)
}

fn reverse_flow() -> Arc<Flow<SubCtx, TestError>> {
  let mut flow = Flow::new("reverse", vec![StepDef::required("transform")]);
  flow.on("transform", |ctx: FlowCtx<SubCtx>| async move {
    let mut guard = ctx.write();
    guard.output = guard.input.chars().rev().collect();
    Ok::<_, TestError>(StepControl::Continue)
  });
  Arc::new(flow)
}

fn extract_sub(_parent: FlowCtx<TestCtx>) -> Result<FlowCtx<SubCtx>, FlowError> {
  Ok(FlowCtx::new(SubCtx {
    input: "amen".to_string(),
    output: String::new(),
  }))
}

fn routed_to(expected: &'static str) -> impl Fn(FlowCtx<TestCtx>) -> bool + Send + Sync + 'static {
  move |ctx: FlowCtx<TestCtx>| ctx.snapshot(|c| c.route.as_deref() == Some(expected))
}

/// A flow whose `route` step picks between two sub-flows and whose `record`
/// step copies the sub-flow result back through a shared slot.
fn routed_parent(no_match: NoMatch, optional: bool) -> (Flow<TestCtx, TestError>, Arc<sub_slot::Slot>) {
  let slot = Arc::new(sub_slot::Slot::default());
  let mut parent = Flow::new("parent", vec![StepDef::required("route"), StepDef::required("record")]);

  let upper_slot = slot.clone();
  let reverse_slot = slot.clone();
  parent
    .branch("route")
    .arm_static("upper", upper_flow(), move |ctx| {
      let sub = extract_sub(ctx)?;
      upper_slot.set(sub.clone());
      Ok(sub)
    })
    .when(routed_to("upper"))
    .arm_static("reverse", reverse_flow(), move |ctx| {
      let sub = extract_sub(ctx)?;
      reverse_slot.set(sub.clone());
      Ok(sub)
    })
    .when(routed_to("reverse"))
    .otherwise(no_match)
    .finish(optional);

  let record_slot = slot.clone();
  parent.on("record", move |ctx: FlowCtx<TestCtx>| {
    let produced = record_slot.output();
    async move {
      let mut guard = ctx.write();
      guard.sub_result = produced;
      guard.trail.push("record".into());
      Ok::<_, TestError>(StepControl::Continue)
    }
  });

  (parent, slot)
}

/// Keeps the last sub-context handed to a sub-flow so the parent can read it.
mod sub_slot {
  use parish_flow::FlowCtx;
  use parking_lot::Mutex;

  use super::SubCtx;

  #[derive(Default)]
  pub struct Slot(Mutex<Option<FlowCtx<SubCtx>>>);

  impl Slot {
    pub fn set(&self, ctx: FlowCtx<SubCtx>) {
      *self.0.lock() = Some(ctx);
    }

    pub fn output(&self) -> Option<String> {
      self.0.lock().as_ref().map(|ctx| ctx.snapshot(|c| c.output.clone()))
    }
  }
}

#[tokio::test]
#[serial]
async fn first_matching_arm_runs() {
  setup_tracing();
  let (parent, _slot) = routed_parent(NoMatch::Fail, false);

  let ctx = FlowCtx::new(TestCtx {
    route: Some("reverse".into()),
    ..Default::default()
  });
  let outcome = parent.run(ctx.clone()).await.unwrap();

  assert_eq!(outcome, FlowOutcome::Completed);
  assert_eq!(ctx.read().sub_result.as_deref(), Some("nema"));
}

#[tokio::test]
#[serial]
async fn other_arm_selected_by_condition() {
  setup_tracing();
  let (parent, _slot) = routed_parent(NoMatch::Fail, false);

  let ctx = FlowCtx::new(TestCtx {
    route: Some("upper".into()),
    ..Default::default()
  });
  parent.run(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().sub_result.as_deref(), Some("AMEN"));
}

#[tokio::test]
#[serial]
async fn no_match_fail_reports_step() {
  setup_tracing();
  let (parent, _slot) = routed_parent(NoMatch::Fail, false);

  let err = parent.run(FlowCtx::new(TestCtx::default())).await.unwrap_err();

  match err {
    TestError::Flow(text) => assert!(text.contains("NoBranchMatched")),
    other => panic!("unexpected error: {other:?}"),
  }
}

#[tokio::test]
#[serial]
async fn no_match_continue_and_halt() {
  setup_tracing();
  let (continuing, _slot) = routed_parent(NoMatch::Continue, false);
  let ctx = FlowCtx::new(TestCtx::default());
  assert_eq!(continuing.run(ctx.clone()).await.unwrap(), FlowOutcome::Completed);
  assert_eq!(ctx.read().trail, vec!["record"]);
  assert_eq!(ctx.read().sub_result, None);

  let (halting, _slot) = routed_parent(NoMatch::Halt, false);
  let ctx = FlowCtx::new(TestCtx::default());
  assert_eq!(halting.run(ctx.clone()).await.unwrap(), FlowOutcome::Halted);
  assert!(ctx.read().trail.is_empty());
}

#[tokio::test]
#[serial]
async fn failing_arm_propagates_unless_optional() {
  setup_tracing();
  let build = |optional: bool| {
    let mut failing_sub = Flow::<SubCtx, TestError>::new("failing_sub", vec![StepDef::required("explode")]);
    failing_sub.on("explode", |_ctx: FlowCtx<SubCtx>| async move {
      Err::<StepControl, TestError>(TestError::Handler("gateway down".into()))
    });
    let mut parent = Flow::<TestCtx, TestError>::new("parent", vec![StepDef::required("route"), StepDef::required("after")]);
    parent
      .branch("route")
      .arm_static("always", Arc::new(failing_sub), extract_sub)
      .when(|_| true)
      .finish(optional);
    parent.on("after", recording_handler("after"));
    parent
  };

  let err = build(false).run(FlowCtx::new(TestCtx::default())).await.unwrap_err();
  assert_eq!(err, TestError::Handler("gateway down".into()));

  let ctx = FlowCtx::new(TestCtx::default());
  let outcome = build(true).run(ctx.clone()).await.unwrap();
  assert_eq!(outcome, FlowOutcome::Completed);
  assert_eq!(ctx.read().trail, vec!["after"]);
}

#[tokio::test]
#[serial]
async fn factory_arm_is_invoked_per_run_and_extractor_errors_surface() {
  setup_tracing();
  let calls = Arc::new(AtomicUsize::new(0));
  let factory_calls = calls.clone();

  let mut parent = Flow::<TestCtx, TestError>::new("factory_parent", vec![StepDef::required("route")]);
  parent
    .branch("route")
    .arm_with(
      "factory",
      move |_ctx: FlowCtx<TestCtx>| {
        let calls = factory_calls.clone();
        async move {
          calls.fetch_add(1, Ordering::SeqCst);
          Ok::<_, FlowError>(upper_flow())
        }
      },
      |ctx: FlowCtx<TestCtx>| {
        if ctx.snapshot(|c| c.counter) < 0 {
          return Err(FlowError::Internal("negative counter".into()));
        }
        extract_sub(ctx)
      },
    )
    .when(|_| true)
    .finish(false);

  parent.run(FlowCtx::new(TestCtx::default())).await.unwrap();
  parent.run(FlowCtx::new(TestCtx::default())).await.unwrap();
  assert_eq!(calls.load(Ordering::SeqCst), 2);

  let err = parent
    .run(FlowCtx::new(TestCtx {
      counter: -1,
      ..Default::default()
    }))
    .await
    .unwrap_err();
  match err {
    TestError::Flow(text) => {
      assert!(text.contains("ExtractorFailure"));
      assert!(text.contains("factory"));
    }
    other => panic!("unexpected error: {other:?}"),
  }
}
