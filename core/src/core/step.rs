// parish-flow/src/core/step.rs

use super::context::FlowCtx;
use super::control::StepControl;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Evaluated before a step runs; `true` skips the step.
pub type SkipCondition<T> = Arc<dyn Fn(FlowCtx<T>) -> bool + Send + Sync + 'static>;

/// Boxed future every handler resolves to.
pub type StepFuture<E> = Pin<Box<dyn Future<Output = Result<StepControl, E>> + Send>>;

/// A type-erased step handler.
///
/// Handlers receive a clone of the flow context. Lock guards taken on it
/// must be released before the handler awaits anything.
pub type Handler<T, E> = Box<dyn Fn(FlowCtx<T>) -> StepFuture<E> + Send + Sync>;

/// Declaration of a single step: its name, whether it may run without
/// handlers (and swallow branch failures), and an optional skip condition.
#[derive(Clone)]
pub struct StepDef<T: 'static + Send + Sync> {
  pub name: String,
  pub optional: bool,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> StepDef<T> {
  pub fn required(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: false,
      skip_if: None,
    }
  }

  pub fn optional(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: true,
      skip_if: None,
    }
  }

  pub fn skip_when(mut self, condition: impl Fn(FlowCtx<T>) -> bool + Send + Sync + 'static) -> Self {
    self.skip_if = Some(Arc::new(condition));
    self
  }
}

impl<T: 'static + Send + Sync> std::fmt::Debug for StepDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("has_skip_condition", &self.skip_if.is_some())
      .finish()
  }
}
