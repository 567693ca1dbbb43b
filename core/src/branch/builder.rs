// parish-flow/src/branch/builder.rs

//! Fluent API for turning a step into a branch over several sub-flows.
//!
//! ```ignore
//! flow
//!   .branch("process_payment")
//!   .arm_static("ussd", ussd_flow, extract_payment)
//!   .when(|ctx| ctx.snapshot(|c| c.method == Method::Ussd))
//!   .otherwise(NoMatch::Fail)
//!   .finish(false);
//! ```

use crate::branch::arm::{AnyArm, BranchArm, Condition, Extractor};
use crate::branch::provider::{FactorySubFlow, StaticSubFlow, SubFlowProvider};
use crate::core::context::FlowCtx;
use crate::core::control::StepControl;
use crate::core::step::{Handler, StepFuture};
use crate::error::FlowError;
use crate::flow::Flow;
use std::future::Future;
use std::sync::Arc;
use tracing::{event, Level};

/// What a branch step does when no arm's condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatch {
  /// Move on to the next step.
  Continue,
  /// Halt the parent flow.
  Halt,
  /// Fail with `FlowError::NoBranchMatched`.
  Fail,
}

pub struct BranchBuilder<'f, T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flow: &'f mut Flow<T, E>,
  step_name: String,
  arms: Vec<Arc<dyn AnyArm<T, E>>>,
  no_match: NoMatch,
}

impl<'f, T, E> BranchBuilder<'f, T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) fn new(flow: &'f mut Flow<T, E>, step_name: String) -> Self {
    Self {
      flow,
      step_name,
      arms: Vec::new(),
      no_match: NoMatch::Continue,
    }
  }

  /// Adds an arm backed by a pre-built sub-flow.
  pub fn arm_static<S>(
    self,
    label: impl Into<String>,
    sub_flow: Arc<Flow<S, E>>,
    extractor: impl Fn(FlowCtx<T>) -> Result<FlowCtx<S>, FlowError> + Send + Sync + 'static,
  ) -> ArmBuilder<'f, T, S, E>
  where
    S: 'static + Send + Sync,
  {
    ArmBuilder {
      parent: self,
      label: label.into(),
      provider: Arc::new(StaticSubFlow::new(sub_flow)),
      extractor: Arc::new(extractor),
    }
  }

  /// Adds an arm whose sub-flow comes from an async factory on each run.
  pub fn arm_with<S, F, Fut>(
    self,
    label: impl Into<String>,
    factory: F,
    extractor: impl Fn(FlowCtx<T>) -> Result<FlowCtx<S>, FlowError> + Send + Sync + 'static,
  ) -> ArmBuilder<'f, T, S, E>
  where
    S: 'static + Send + Sync,
    F: Fn(FlowCtx<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Arc<Flow<S, E>>, FlowError>> + Send + 'static,
  {
    ArmBuilder {
      parent: self,
      label: label.into(),
      provider: Arc::new(FactorySubFlow::new(factory)),
      extractor: Arc::new(extractor),
    }
  }

  pub fn otherwise(mut self, behaviour: NoMatch) -> Self {
    self.no_match = behaviour;
    self
  }

  /// Installs the branch as the step's only `on` handler.
  ///
  /// With `optional = true`, a failing arm is logged and the parent flow
  /// continues.
  pub fn finish(self, optional: bool) {
    let BranchBuilder {
      flow,
      step_name,
      arms,
      no_match,
    } = self;

    if arms.is_empty() {
      panic!("flow '{}': branch step '{}' has no arms", flow.name(), step_name);
    }
    event!(Level::DEBUG, step = %step_name, arms = arms.len(), ?no_match, "Branch step configured.");

    let arms = Arc::new(arms);
    let handler_step = step_name.clone();
    let handler: Handler<T, E> = Box::new(move |ctx: FlowCtx<T>| {
      let arms = arms.clone();
      let step_name = handler_step.clone();
      let fut: StepFuture<E> = Box::pin(async move {
        let Some(arm) = arms.iter().find(|arm| arm.matches(ctx.clone())) else {
          event!(Level::DEBUG, step = %step_name, ?no_match, "No branch arm matched.");
          return match no_match {
            NoMatch::Continue => Ok(StepControl::Continue),
            NoMatch::Halt => Ok(StepControl::Halt),
            NoMatch::Fail => Err(E::from(FlowError::NoBranchMatched { step_name })),
          };
        };

        event!(Level::DEBUG, step = %step_name, arm = arm.label(), "Branch arm selected.");
        match arm.run(&step_name, ctx).await {
          Ok(control) => Ok(control),
          Err(e) if optional => {
            event!(Level::WARN, step = %step_name, arm = arm.label(), error = %e, "Optional branch step failed, continuing.");
            Ok(StepControl::Continue)
          }
          Err(e) => Err(e),
        }
      });
      fut
    });

    flow.on.insert(step_name.clone(), vec![handler]);
    flow.set_optional(&step_name, optional);
  }
}

/// An arm waiting for its condition.
pub struct ArmBuilder<'f, T, S, E>
where
  T: 'static + Send + Sync,
  S: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  parent: BranchBuilder<'f, T, E>,
  label: String,
  provider: Arc<dyn SubFlowProvider<T, S, E>>,
  extractor: Extractor<T, S>,
}

impl<'f, T, S, E> ArmBuilder<'f, T, S, E>
where
  T: 'static + Send + Sync,
  S: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Arms are tried in the order they were added; the first match wins.
  pub fn when(mut self, condition: impl Fn(FlowCtx<T>) -> bool + Send + Sync + 'static) -> BranchBuilder<'f, T, E> {
    let condition: Condition<T> = Arc::new(condition);
    self.parent.arms.push(Arc::new(BranchArm {
      label: self.label,
      provider: self.provider,
      extractor: self.extractor,
      condition,
    }));
    self.parent
  }
}
