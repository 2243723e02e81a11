//! # Execution Capability
//!
//! The executor seam: the engine is agnostic to what a task semantically does
//! and only consumes an opaque callable keyed by responsible party.

pub mod executor;

pub use executor::{
    ExecutionContext, ExecutorOutcome, ExecutorRegistry, SimulatedExecutor, TaskExecutor,
};
