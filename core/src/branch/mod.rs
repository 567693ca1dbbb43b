// parish-flow/src/branch/mod.rs

//! Branch steps: a step that runs exactly one of several sub-flows, each
//! over its own context type extracted from the parent context.

pub(crate) mod arm;
pub mod builder;
pub mod provider;

pub use builder::{ArmBuilder, BranchBuilder, NoMatch};
pub use provider::{FactorySubFlow, StaticSubFlow, SubFlowProvider};
