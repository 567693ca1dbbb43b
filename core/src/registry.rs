// parish-flow/src/registry.rs

//! `FlowRegistry<E>`: flows keyed by the type of context they run on.

use crate::core::context::FlowCtx;
use crate::core::control::FlowOutcome;
use crate::error::FlowError;
use crate::flow::Flow;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[async_trait]
trait ErasedFlow<E>: Send + Sync
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn name(&self) -> &str;
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, E>;
}

struct RegisteredFlow<T, FE, E>
where
  T: 'static + Send + Sync,
  FE: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flow: Arc<Flow<T, FE>>,
  _app_err: PhantomData<fn() -> E>,
}

#[async_trait]
impl<T, FE, E> ErasedFlow<E> for RegisteredFlow<T, FE, E>
where
  T: 'static + Send + Sync,
  FE: std::error::Error + From<FlowError> + Send + Sync + 'static,
  E: std::error::Error + From<FE> + From<FlowError> + Send + Sync + 'static,
{
  fn name(&self) -> &str {
    self.flow.name()
  }

  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, E> {
    let ctx = match ctx.downcast::<FlowCtx<T>>() {
      Ok(ctx) => *ctx,
      Err(_) => {
        let expected_type = std::any::type_name::<FlowCtx<T>>().to_string();
        event!(Level::ERROR, %expected_type, "Registry handed a context of the wrong type.");
        return Err(E::from(FlowError::TypeMismatch {
          step_name: "registry_dispatch".to_string(),
          expected_type,
        }));
      }
    };
    self.flow.run(ctx).await.map_err(E::from)
  }
}

/// Holds at most one flow per context type and dispatches runs to it.
///
/// Flows registered here may use their own handler error type `FE` as long
/// as the registry's `E` converts from it.
pub struct FlowRegistry<E = FlowError>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flows: RwLock<HashMap<TypeId, Arc<dyn ErasedFlow<E>>>>,
}

impl<E> FlowRegistry<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      flows: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `flow` for context type `T`, replacing any earlier flow for `T`.
  pub fn register<T, FE>(&self, flow: Flow<T, FE>)
  where
    T: 'static + Send + Sync,
    FE: std::error::Error + From<FlowError> + Send + Sync + 'static,
    E: From<FE>,
  {
    let name = flow.name().to_string();
    let entry: Arc<dyn ErasedFlow<E>> = Arc::new(RegisteredFlow::<T, FE, E> {
      flow: Arc::new(flow),
      _app_err: PhantomData,
    });
    let replaced = self.flows.write().insert(TypeId::of::<FlowCtx<T>>(), entry);
    if let Some(old) = replaced {
      event!(Level::WARN, flow = %name, replaced = old.name(), "Flow registration replaced an existing flow.");
    } else {
      event!(Level::DEBUG, flow = %name, context = std::any::type_name::<T>(), "Flow registered.");
    }
  }

  pub fn is_registered<T: 'static + Send + Sync>(&self) -> bool {
    self.flows.read().contains_key(&TypeId::of::<FlowCtx<T>>())
  }

  /// Names of every registered flow, sorted.
  pub fn flow_names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.flows.read().values().map(|f| f.name().to_string()).collect();
    names.sort();
    names
  }

  /// Runs the flow registered for `T`.
  ///
  /// An unregistered context type yields `FlowError::Configuration`.
  #[instrument(name = "FlowRegistry::run", skip_all, fields(context = %std::any::type_name::<T>()))]
  pub async fn run<T: 'static + Send + Sync>(&self, ctx: FlowCtx<T>) -> Result<FlowOutcome, E> {
    let entry = self.flows.read().get(&TypeId::of::<FlowCtx<T>>()).cloned();
    let Some(entry) = entry else {
      event!(Level::ERROR, "No flow registered for this context type.");
      return Err(E::from(FlowError::Configuration {
        step_name: "registry_dispatch".to_string(),
        message: format!("no flow registered for context type {}", std::any::type_name::<T>()),
      }));
    };
    entry.run_erased(Box::new(ctx)).await
  }
}

impl<E> Default for FlowRegistry<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
