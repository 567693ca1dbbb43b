// parish-flow/src/core/mod.rs

pub mod context;
pub mod control;
pub mod step;

pub use context::FlowCtx;
pub use control::{FlowOutcome, StepControl};
pub use step::{Handler, SkipCondition, StepDef, StepFuture};
