// parish-flow/src/lib.rs

//! parish-flow: a small async step engine used by the parish portal.
//!
//!  - Named steps with before/on/after handlers.
//!  - Halting a run early from any handler.
//!  - Optional steps and per-step skip conditions.
//!  - Branch steps that pick one sub-flow, each with its own context type.
//!  - A registry that runs the flow registered for a context type.

pub mod branch;
pub mod core;
pub mod error;
pub mod flow;
pub mod registry;

pub use crate::branch::{ArmBuilder, BranchBuilder, FactorySubFlow, NoMatch, StaticSubFlow, SubFlowProvider};
pub use crate::core::context::FlowCtx;
pub use crate::core::control::{FlowOutcome, StepControl};
pub use crate::core::step::{Handler, SkipCondition, StepDef, StepFuture};
pub use crate::error::{FlowError, FlowResult};
pub use crate::flow::Flow;
pub use crate::registry::FlowRegistry;
