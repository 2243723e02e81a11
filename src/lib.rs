#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Taskflow Core
//!
//! Workflow task graph and execution engine: turns a flat collection of
//! persisted tasks into a partially-ordered execution plan, decides which
//! tasks are runnable, executes them through pluggable executors, and keeps
//! aggregate workflow state consistent as tasks complete, fail, or are
//! skipped.
//!
//! ## Architecture
//!
//! The engine protects four invariants and treats everything else as an
//! external collaborator behind a trait seam:
//!
//! - an **acyclic dependency relation** per workflow, proven before any
//!   scheduling decision is trusted
//! - **monotonic status transitions** (`pending -> in_progress ->
//!   {completed | failed}`, or `pending -> skipped`; terminal states are
//!   unreachable-from)
//! - **exactly-once completion counting** via an atomic store increment,
//!   retried on conflict with jittered backoff
//! - **safe concurrent progress** across independently-scheduled workflows
//!   (within a workflow, execution is deliberately sequential)
//!
//! ## Module Organization
//!
//! - [`models`] - Task and workflow records with their status state machines
//! - [`store`] - The `TaskStore` persistence seam and an in-memory reference
//!   implementation
//! - [`graph`] - Dependency graph derivation and cycle validation
//! - [`execution`] - The executor capability seam and party-keyed registry
//! - [`orchestration`] - Ready-set selection, the execution coordinator,
//!   delegation, and completion tracking
//! - [`config`] - Engine configuration with environment overrides
//! - [`error`] - Structured error handling
//! - [`logging`] - `tracing` initialization
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskflow_core::execution::ExecutorRegistry;
//! use taskflow_core::models::{NewTask, NewWorkflow};
//! use taskflow_core::orchestration::{ExecutionCoordinator, ExecutionMode};
//! use taskflow_core::store::{InMemoryTaskStore, TaskStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryTaskStore::new());
//! let workflow = store.create_workflow(NewWorkflow::new("deploy", 2)).await?;
//!
//! let build = store
//!     .create_task(NewTask::new(workflow.id, "build", "ci-agent", 1.0))
//!     .await?;
//! store
//!     .create_task(
//!         NewTask::new(workflow.id, "release", "ci-agent", 2.0)
//!             .with_dependencies([build.id]),
//!     )
//!     .await?;
//!
//! let coordinator = ExecutionCoordinator::new(store, Arc::new(ExecutorRegistry::new()));
//! let pass = coordinator
//!     .run_ready_tasks(workflow.id, ExecutionMode::Simulate)
//!     .await?;
//! println!("executed {} task(s)", pass.executed_count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod graph;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod store;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use execution::{
    ExecutionContext, ExecutorOutcome, ExecutorRegistry, SimulatedExecutor, TaskExecutor,
};
pub use graph::{validate_acyclic, CycleValidation, DependencyGraph};
pub use models::{
    DelegationHandoff, DelegationLink, NewTask, NewWorkflow, Task, TaskId, TaskStatus, TaskUpdate,
    Workflow, WorkflowId, WorkflowStatus,
};
pub use orchestration::{
    CompletionTracker, DelegationRequest, DelegationSpawner, ExecutionCoordinator, ExecutionMode,
    ReadySetSelector, SchedulingPassResult, TaskOutcome,
};
pub use store::{InMemoryTaskStore, StoreError, TaskStore};
