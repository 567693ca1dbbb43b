// parish-flow/src/flow/definition.rs

//! The `Flow<T, E>` type and its structural editing methods.

use crate::branch::BranchBuilder;
use crate::core::step::{Handler, SkipCondition, StepDef};
use crate::error::FlowError;
use std::collections::HashMap;

/// An ordered list of named steps run against a shared `FlowCtx<T>`.
///
/// Each step may carry `before`, `on` and `after` handlers. Handlers return
/// `Result<StepControl, E>`; `E` must absorb engine failures through
/// `From<FlowError>`.
pub struct Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef<T>>,
  pub(crate) before: HashMap<String, Vec<Handler<T, E>>>,
  pub(crate) on: HashMap<String, Vec<Handler<T, E>>>,
  pub(crate) after: HashMap<String, Vec<Handler<T, E>>>,
}

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new(name: impl Into<String>, steps: Vec<StepDef<T>>) -> Self {
    Self {
      name: name.into(),
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn has_step(&self, step_name: &str) -> bool {
    self.steps.iter().any(|s| s.name == step_name)
  }

  /// Panics when the step is unknown. Flows are assembled once at start-up,
  /// so a misspelt step name is a programming error rather than a runtime one.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.has_step(step_name) {
      panic!("flow '{}': step '{}' is not declared", self.name, step_name);
    }
  }

  fn position_of(&self, step_name: &str) -> usize {
    self.ensure_step_exists(step_name);
    self.steps.iter().position(|s| s.name == step_name).unwrap_or_default()
  }

  fn ensure_step_absent(&self, step_name: &str) {
    if self.has_step(step_name) {
      panic!("flow '{}': step '{}' is already declared", self.name, step_name);
    }
  }

  pub fn insert_before(&mut self, existing_step: &str, step: StepDef<T>) {
    let idx = self.position_of(existing_step);
    self.ensure_step_absent(&step.name);
    self.steps.insert(idx, step);
  }

  pub fn insert_after(&mut self, existing_step: &str, step: StepDef<T>) {
    let idx = self.position_of(existing_step);
    self.ensure_step_absent(&step.name);
    self.steps.insert(idx + 1, step);
  }

  /// Removes a step and every handler attached to it. Unknown names are ignored.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.steps.iter().position(|s| s.name == step_name) {
      self.steps.remove(idx);
      self.before.remove(step_name);
      self.on.remove(step_name);
      self.after.remove(step_name);
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    let idx = self.position_of(step_name);
    self.steps[idx].optional = optional;
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<T>>) {
    let idx = self.position_of(step_name);
    self.steps[idx].skip_if = skip_if;
  }

  /// Turns `step_name` into a branch step: exactly one sub-flow whose
  /// condition matches runs in its `on` phase. The step is appended if it
  /// was not declared.
  pub fn branch(&mut self, step_name: &str) -> BranchBuilder<'_, T, E> {
    if !self.has_step(step_name) {
      self.steps.push(StepDef::required(step_name));
    }
    BranchBuilder::new(self, step_name.to_string())
  }
}
