// parish-flow/src/core/context.rs

//! Shared, lockable context handed to every step handler of a flow run.

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared ownership of a flow's context data behind a `parking_lot::RwLock`.
///
/// Cloning is cheap and every clone points at the same data. Guards are
/// blocking and MUST be dropped before any `.await` point.
#[derive(Debug)]
pub struct FlowCtx<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> FlowCtx<T> {
  pub fn new(data: T) -> Self {
    FlowCtx(Arc::new(RwLock::new(data)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
    self.0.try_read()
  }

  /// Read guard narrowed to one part of the context.
  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&T) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }

  /// Clones a value out of the context without keeping the lock.
  pub fn snapshot<U, F>(&self, f: F) -> U
  where
    F: FnOnce(&T) -> U,
  {
    let guard = self.read();
    f(&guard)
  }

  /// Unwraps the context if this is the last handle, otherwise clones the data.
  pub fn into_inner(self) -> T
  where
    T: Clone,
  {
    match Arc::try_unwrap(self.0) {
      Ok(lock) => lock.into_inner(),
      Err(shared) => shared.read().clone(),
    }
  }
}

impl<T: Send + Sync + 'static> Clone for FlowCtx<T> {
  fn clone(&self) -> Self {
    FlowCtx(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for FlowCtx<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
