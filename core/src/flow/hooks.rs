// parish-flow/src/flow/hooks.rs

//! Registration of `before`, `on` and `after` handlers.

use crate::core::context::FlowCtx;
use crate::core::control::StepControl;
use crate::core::step::{Handler, StepFuture};
use crate::error::FlowError;
use crate::flow::definition::Flow;
use std::future::Future;

fn boxed<T, E, F, UserErr>(handler_fn: impl Fn(FlowCtx<T>) -> F + Send + Sync + 'static) -> Handler<T, E>
where
  T: 'static + Send + Sync,
  E: 'static,
  F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
  UserErr: Into<E> + Send + Sync + 'static,
{
  Box::new(move |ctx| {
    let fut = handler_fn(ctx);
    let boxed: StepFuture<E> = Box::pin(async move { fut.await.map_err(Into::into) });
    boxed
  })
}

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Adds a handler to the `before` phase of a step.
  ///
  /// The handler's own error type only has to convert into the flow's `E`.
  pub fn before<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(FlowCtx<T>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .before
      .entry(step_name.to_string())
      .or_default()
      .push(boxed(handler_fn));
  }

  /// Adds a handler to the `on` phase of a step.
  pub fn on<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(FlowCtx<T>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self.on.entry(step_name.to_string()).or_default().push(boxed(handler_fn));
  }

  /// Adds a handler to the `after` phase of a step.
  pub fn after<F, UserErr>(&mut self, step_name: &str, handler_fn: impl Fn(FlowCtx<T>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<E> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    self
      .after
      .entry(step_name.to_string())
      .or_default()
      .push(boxed(handler_fn));
  }
}
