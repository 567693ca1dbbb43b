// parish-flow/src/branch/provider.rs

//! Sources of the sub-flow a branch arm runs.

use crate::core::context::FlowCtx;
use crate::error::FlowError;
use crate::flow::Flow;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Yields the sub-flow for one branch arm.
///
/// Failures of the provider itself are engine failures (`FlowError`); the
/// sub-flow it hands back reports its own errors through `E`.
#[async_trait]
pub trait SubFlowProvider<T, S, E>: Send + Sync + 'static
where
  T: 'static + Send + Sync,
  S: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  async fn provide(&self, parent: FlowCtx<T>) -> Result<Arc<Flow<S, E>>, FlowError>;
}

/// Always returns the same pre-built sub-flow.
pub struct StaticSubFlow<S, E>
where
  S: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flow: Arc<Flow<S, E>>,
}

impl<S, E> StaticSubFlow<S, E>
where
  S: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new(flow: Arc<Flow<S, E>>) -> Self {
    Self { flow }
  }
}

#[async_trait]
impl<T, S, E> SubFlowProvider<T, S, E> for StaticSubFlow<S, E>
where
  T: 'static + Send + Sync,
  S: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  async fn provide(&self, _parent: FlowCtx<T>) -> Result<Arc<Flow<S, E>>, FlowError> {
    Ok(self.flow.clone())
  }
}

/// Builds (or looks up) the sub-flow on every run through an async factory.
pub struct FactorySubFlow<T, S, E, F, Fut> {
  factory: F,
  _marker: PhantomData<fn(T) -> (S, E, Fut)>,
}

impl<T, S, E, F, Fut> FactorySubFlow<T, S, E, F, Fut> {
  pub fn new(factory: F) -> Self {
    Self {
      factory,
      _marker: PhantomData,
    }
  }
}

#[async_trait]
impl<T, S, E, F, Fut> SubFlowProvider<T, S, E> for FactorySubFlow<T, S, E, F, Fut>
where
  T: 'static + Send + Sync,
  S: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
  F: Fn(FlowCtx<T>) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Arc<Flow<S, E>>, FlowError>> + Send + 'static,
{
  async fn provide(&self, parent: FlowCtx<T>) -> Result<Arc<Flow<S, E>>, FlowError> {
    (self.factory)(parent).await
  }
}
