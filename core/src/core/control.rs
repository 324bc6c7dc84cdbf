//! Signals for controlling flow execution and the outcome of a flow run.

/// Signal from a handler indicating whether the flow should continue or halt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageControl {
    /// Continue processing the current stage and subsequent stages.
    Continue,
    /// Halt the flow immediately. No further handlers in the current stage
    /// or subsequent stages will execute. A halt is a graceful outcome, not
    /// an error; compensation does not run.
    Halt,
}

/// Outcome of a full flow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Every non-skipped stage ran to completion.
    Completed,
    /// A handler returned `StageControl::Halt`.
    Halted,
}
