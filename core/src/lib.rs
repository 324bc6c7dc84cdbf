//! Trellis: an async, type-safe workflow engine for multi-step business flows.
//!
//! A flow is an ordered list of named stages over a shared context. Features:
//!  - Named stages with before/on/after hooks.
//!  - Asynchronous handlers for I/O-bound operations.
//!  - Early halting of flow execution from any handler.
//!  - Per-stage skip conditions evaluated against the live context.
//!  - Per-stage compensation handlers, invoked when that stage fails, so a
//!    multi-write sequence can repair partial state instead of leaving it
//!    silently inconsistent. The stage's original error still propagates.
//!  - A type-keyed registry for managing and running different flows.

pub mod core;
pub mod error;
pub mod flow;
pub mod registry;

// --- Re-exports for the public API ---

pub use crate::core::context::{Compensation, FlowContext, Handler};
pub use crate::core::control::{FlowOutcome, StageControl};
pub use crate::core::stage::{SkipCondition, StageDef};

pub use crate::error::{FlowError, FlowResult};
pub use crate::flow::definition::Flow;
pub use crate::registry::FlowRegistry;

/*
    Core workflow:
    1. Define a context struct `MyCtx` for your process.
    2. Create a `Flow<MyCtx, MyErr>`, naming its stages in order.
    3. Register asynchronous handlers with `.on_stage()`, `.before_stage()`,
       `.after_stage()`, and repair actions with `.compensate()`.
    4. Create a `FlowRegistry` and register the flow.
    5. To execute, wrap an instance of `MyCtx` in `FlowContext::new` and call
       `registry.run(ctx).await` (or `flow.run(ctx).await` directly).
*/
