// parish-flow/src/flow/execution.rs

//! `Flow::run()`: walks the steps and their before/on/after phases.

use crate::core::context::FlowCtx;
use crate::core::control::{FlowOutcome, StepControl};
use crate::core::step::Handler;
use crate::error::FlowError;
use crate::flow::definition::Flow;
use tracing::{event, info_span, Instrument, Level};

#[derive(Debug, Clone, Copy)]
enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  fn as_str(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

impl<T, E> Flow<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx`.
  ///
  /// Returns `Halted` as soon as a handler asks to halt and propagates the
  /// first handler error unchanged. A required step without any handler is
  /// reported as `FlowError::HandlerMissing` converted into `E`.
  pub async fn run(&self, ctx: FlowCtx<T>) -> Result<FlowOutcome, E> {
    let span = info_span!("flow_run", flow = %self.name, steps = self.steps.len());
    self.run_steps(ctx).instrument(span).await
  }

  async fn run_steps(&self, ctx: FlowCtx<T>) -> Result<FlowOutcome, E> {
    event!(Level::DEBUG, "Flow run starting.");

    for (step_idx, step) in self.steps.iter().enumerate() {
      let step_name = step.name.as_str();

      if let Some(skip_if) = &step.skip_if {
        if skip_if(ctx.clone()) {
          event!(Level::DEBUG, step = step_name, "Step skipped by its skip condition.");
          continue;
        }
      }

      let phases = [
        (Phase::Before, self.before.get(step_name)),
        (Phase::On, self.on.get(step_name)),
        (Phase::After, self.after.get(step_name)),
      ];

      let has_handlers = phases.iter().any(|(_, hs)| hs.is_some_and(|v| !v.is_empty()));
      if !has_handlers {
        if step.optional {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step = step_name, "Required step has no handlers.");
        return Err(E::from(FlowError::HandlerMissing {
          step_name: step.name.clone(),
        }));
      }

      let step_span = info_span!("flow_step", step = step_name, index = step_idx, optional = step.optional);
      let halted = async {
        for (phase, handlers) in phases {
          if let Some(handlers) = handlers {
            if Self::run_phase(phase, handlers, &ctx).await? == StepControl::Halt {
              return Ok::<bool, E>(true);
            }
          }
        }
        Ok(false)
      }
      .instrument(step_span)
      .await?;

      if halted {
        event!(Level::INFO, step = step_name, "Flow halted.");
        return Ok(FlowOutcome::Halted);
      }
    }

    event!(Level::DEBUG, "Flow run completed.");
    Ok(FlowOutcome::Completed)
  }

  async fn run_phase(phase: Phase, handlers: &[Handler<T, E>], ctx: &FlowCtx<T>) -> Result<StepControl, E> {
    for (handler_idx, handler) in handlers.iter().enumerate() {
      match handler(ctx.clone()).await {
        Ok(StepControl::Continue) => {}
        Ok(StepControl::Halt) => {
          event!(Level::DEBUG, phase = phase.as_str(), handler_idx, "Handler requested halt.");
          return Ok(StepControl::Halt);
        }
        Err(e) => {
          event!(Level::WARN, phase = phase.as_str(), handler_idx, error = %e, "Handler failed.");
          return Err(e);
        }
      }
    }
    Ok(StepControl::Continue)
  }
}
