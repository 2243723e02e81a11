//! # Orchestration
//!
//! The engine's scheduling core: ready-set selection, the sequential
//! execution coordinator, delegation spawning, and workflow completion
//! tracking.
//!
//! ## Core Components
//!
//! - [`ExecutionCoordinator`]: drives one scheduling pass per invocation —
//!   graph validation gate, ready set, sequential execution, aggregate
//!   updates. Invoked on demand; no background loop is assumed.
//! - [`ReadySetSelector`]: pure query for the tasks eligible to run now.
//! - [`DelegationSpawner`]: hands continued work to a different responsible
//!   party via a fractional-position child task.
//! - [`CompletionTracker`]: promotes a workflow to `completed` once every
//!   task is terminal.

pub mod completion;
pub mod coordinator;
pub mod delegation;
pub mod ready_set;
pub mod types;

pub use completion::CompletionTracker;
pub use coordinator::ExecutionCoordinator;
pub use delegation::{DelegationRequest, DelegationSpawner};
pub use ready_set::ReadySetSelector;
pub use types::{ExecutionMode, SchedulingPassResult, TaskOutcome};
