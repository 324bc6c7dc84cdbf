// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use trellis::{FlowContext, FlowError, StageControl};
use tracing::Level;

// --- Common context structs ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
    pub counter: i32,
    pub message: String,
    pub stages_executed: Vec<String>,
    pub compensations_run: Vec<String>,
    pub should_halt_at: Option<String>,
}

// --- Common error type for tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
    #[error("Engine error: {0:?}")]
    Engine(String), // Stored as String so assertions can use Eq

    #[error("Test handler failed: {0}")]
    Handler(String),

    #[error("Test compensation failed: {0}")]
    Compensation(String),
}

impl From<FlowError> for TestError {
    fn from(fe: FlowError) -> Self {
        TestError::Engine(format!("{:?}", fe))
    }
}

// --- Common handler creators ---
pub fn create_simple_handler(
    stage_name: &'static str,
    message_to_append: &'static str,
) -> trellis::Handler<TestContext, TestError> {
    Box::new(move |ctx: FlowContext<TestContext>| {
        let stage_name_owned = stage_name.to_string();
        Box::pin(async move {
            let mut guard = ctx.write();
            guard.counter += 1;
            guard.message.push_str(message_to_append);
            guard.stages_executed.push(stage_name_owned.clone());
            tracing::debug!(target: "test_handlers", stage = %stage_name_owned, "executed, counter: {}, message: '{}'", guard.counter, guard.message);
            if let Some(halt_stage) = &guard.should_halt_at {
                if halt_stage == stage_name_owned.as_str() {
                    return Ok(StageControl::Halt);
                }
            }
            Ok(StageControl::Continue)
        })
    })
}

pub fn create_failing_handler(
    stage_name: &'static str,
    error_message: &'static str,
) -> trellis::Handler<TestContext, TestError> {
    Box::new(move |ctx: FlowContext<TestContext>| {
        let stage_name_owned = stage_name.to_string();
        let error_message_owned = error_message.to_string();
        Box::pin(async move {
            ctx.write().stages_executed.push(stage_name_owned.clone());
            tracing::warn!(target: "test_handlers", stage = %stage_name_owned, "failing with: '{}'", error_message_owned);
            Err(TestError::Handler(error_message_owned))
        })
    })
}

// --- Tracing setup (call once per test) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
});

pub fn setup_tracing() {
    Lazy::force(&TRACING_INIT);
}
