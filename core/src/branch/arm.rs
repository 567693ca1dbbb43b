// parish-flow/src/branch/arm.rs

use crate::branch::provider::SubFlowProvider;
use crate::core::context::FlowCtx;
use crate::core::control::{FlowOutcome, StepControl};
use crate::error::FlowError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{event, Level};

pub(crate) type Extractor<T, S> = Arc<dyn Fn(FlowCtx<T>) -> Result<FlowCtx<S>, FlowError> + Send + Sync + 'static>;
pub(crate) type Condition<T> = Arc<dyn Fn(FlowCtx<T>) -> bool + Send + Sync + 'static>;

/// A branch arm with its sub-flow context type erased, so arms over
/// different sub-contexts can share one list.
#[async_trait]
pub(crate) trait AnyArm<T, E>: Send + Sync
where
  T: 'static + Send + Sync,
  E: 'static,
{
  fn label(&self) -> &str;
  fn matches(&self, parent: FlowCtx<T>) -> bool;
  async fn run(&self, step_name: &str, parent: FlowCtx<T>) -> Result<StepControl, E>;
}

pub(crate) struct BranchArm<T, S, E>
where
  T: 'static + Send + Sync,
  S: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) label: String,
  pub(crate) provider: Arc<dyn SubFlowProvider<T, S, E>>,
  pub(crate) extractor: Extractor<T, S>,
  pub(crate) condition: Condition<T>,
}

#[async_trait]
impl<T, S, E> AnyArm<T, E> for BranchArm<T, S, E>
where
  T: 'static + Send + Sync,
  S: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn label(&self) -> &str {
    &self.label
  }

  fn matches(&self, parent: FlowCtx<T>) -> bool {
    (self.condition)(parent)
  }

  async fn run(&self, step_name: &str, parent: FlowCtx<T>) -> Result<StepControl, E> {
    let sub_flow = self.provider.provide(parent.clone()).await.map_err(|e| {
      E::from(FlowError::ProviderFailure {
        step_name: step_name.to_string(),
        arm: self.label.clone(),
        source: e.into(),
      })
    })?;

    let sub_ctx = (self.extractor)(parent).map_err(|e| {
      E::from(FlowError::ExtractorFailure {
        step_name: step_name.to_string(),
        arm: self.label.clone(),
        source: e.into(),
      })
    })?;

    event!(Level::DEBUG, step = step_name, arm = %self.label, sub_flow = sub_flow.name(), "Running branch sub-flow.");
    match sub_flow.run(sub_ctx).await? {
      FlowOutcome::Completed => Ok(StepControl::Continue),
      FlowOutcome::Halted => Ok(StepControl::Halt),
    }
  }
}
