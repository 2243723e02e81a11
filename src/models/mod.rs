//! # Data Models
//!
//! Core record types for the engine: tasks, workflows, their status state
//! machines, and the creation/partial-update records consumed by the store
//! seam.

pub mod task;
pub mod workflow;

pub use task::{DelegationHandoff, DelegationLink, NewTask, Task, TaskId, TaskStatus, TaskUpdate};
pub use workflow::{NewWorkflow, Workflow, WorkflowId, WorkflowStatus};
