// parish-flow/src/core/control.rs

//! Signals for steering a flow and the outcome of a whole run.

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Carry on with the remaining handlers and steps.
  Continue,
  /// Halt the flow here. Nothing after this handler runs.
  Halt,
}

/// Outcome of a flow run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every step ran (or was skipped).
  Completed,
  /// A handler returned `StepControl::Halt`.
  Halted,
}

impl FlowOutcome {
  pub fn is_completed(self) -> bool {
    matches!(self, FlowOutcome::Completed)
  }
}
