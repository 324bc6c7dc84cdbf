// tests/flow_execution_tests.rs
mod common;

use common::*;
use serial_test::serial;
use std::sync::Arc;
use trellis::{Flow, FlowContext, FlowError, FlowOutcome, StageControl};

#[tokio::test]
#[serial]
async fn test_flow_runs_stages_in_order() {
    setup_tracing();
    let mut flow = Flow::<TestContext, TestError>::new(&[
        ("stage1", false, None),
        ("stage2", false, None),
        ("stage3", false, None),
    ]);

    flow.on_stage("stage1", create_simple_handler("stage1", " S1"));
    flow.on_stage("stage2", create_simple_handler("stage2", " S2"));
    flow.on_stage("stage3", create_simple_handler("stage3", " S3"));

    let ctx = FlowContext::new(TestContext::default());
    let result = flow.run(ctx.clone()).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap(), FlowOutcome::Completed);

    let guard = ctx.read();
    assert_eq!(guard.counter, 3);
    assert_eq!(guard.message, " S1 S2 S3");
    assert_eq!(guard.stages_executed, vec!["stage1", "stage2", "stage3"]);
}

#[tokio::test]
#[serial]
async fn test_flow_halts_on_stage_control_halt() {
    setup_tracing();
    let mut flow = Flow::<TestContext, TestError>::new(&[
        ("stageA", false, None),
        ("haltStage", false, None),
        ("stageC", false, None),
    ]);

    flow.on_stage("stageA", create_simple_handler("stageA", "A"));
    flow.on_stage("haltStage", |ctx: FlowContext<TestContext>| {
        Box::pin(async move {
            ctx.write().stages_executed.push("haltStage".to_string());
            Ok::<StageControl, TestError>(StageControl::Halt)
        })
    });
    flow.on_stage("stageC", create_simple_handler("stageC", "C")); // Must not run

    let ctx = FlowContext::new(TestContext::default());
    let result = flow.run(ctx.clone()).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap(), FlowOutcome::Halted);

    let guard = ctx.read();
    assert_eq!(guard.counter, 1); // Only stageA incremented
    assert_eq!(guard.message, "A");
    assert_eq!(guard.stages_executed, vec!["stageA", "haltStage"]);
}

#[tokio::test]
#[serial]
async fn test_flow_propagates_handler_error() {
    setup_tracing();
    let mut flow = Flow::<TestContext, TestError>::new(&[
        ("good_stage", false, None),
        ("bad_stage", false, None),
        ("another_stage", false, None),
    ]);

    flow.on_stage("good_stage", create_simple_handler("good_stage", "Good"));
    flow.on_stage("bad_stage", create_failing_handler("bad_stage", "I am a bad stage!"));
    flow.on_stage("another_stage", create_simple_handler("another_stage", "NeverRun"));

    let ctx = FlowContext::new(TestContext::default());
    let result = flow.run(ctx.clone()).await;

    assert!(result.is_err());
    match result.err().unwrap() {
        TestError::Handler(msg) => assert_eq!(msg, "I am a bad stage!"),
        other => panic!("Expected TestError::Handler, got {:?}", other),
    }

    let guard = ctx.read();
    assert_eq!(guard.counter, 1); // Only good_stage incremented
    assert_eq!(guard.message, "Good");
    assert_eq!(guard.stages_executed, vec!["good_stage", "bad_stage"]);
}

#[tokio::test]
async fn test_flow_skips_stage_if_condition_met() {
    setup_tracing();
    let mut flow = Flow::<TestContext, TestError>::new(&[
        ("stage1", false, None),
        (
            "stage_to_skip",
            false,
            Some(Arc::new(|ctx: FlowContext<TestContext>| {
                ctx.read().counter > 0
            })),
        ),
        ("stage3", false, None),
    ]);

    flow.on_stage("stage1", create_simple_handler("stage1", " S1"));
    flow.on_stage("stage_to_skip", create_simple_handler("stage_to_skip", " SKIPPED_THIS"));
    flow.on_stage("stage3", create_simple_handler("stage3", " S3"));

    let ctx = FlowContext::new(TestContext::default());
    let result = flow.run(ctx.clone()).await;

    assert_eq!(result.unwrap(), FlowOutcome::Completed);
    let guard = ctx.read();
    assert_eq!(guard.counter, 2); // stage1 and stage3 ran
    assert_eq!(guard.message, " S1 S3");
    assert_eq!(guard.stages_executed, vec!["stage1", "stage3"]);
}

#[tokio::test]
async fn test_non_optional_stage_missing_handler_fails() {
    setup_tracing();
    let flow = Flow::<TestContext, TestError>::new(&[
        ("stage_with_no_handler", false, None), // Non-optional
    ]);

    let ctx = FlowContext::new(TestContext::default());
    let result = flow.run(ctx.clone()).await;

    assert!(result.is_err());
    if let Err(TestError::Engine(s)) = result {
        assert!(s.contains("HandlerMissing"));
        assert!(s.contains("stage_with_no_handler"));
    } else {
        panic!("Expected FlowError::HandlerMissing, got {:?}", result);
    }
}

#[tokio::test]
async fn test_optional_stage_missing_handler_succeeds() {
    setup_tracing();
    let flow = Flow::<TestContext, TestError>::new(&[
        ("optional_stage_no_handler", true, None), // Optional
    ]);

    let ctx = FlowContext::new(TestContext::default());
    let result = flow.run(ctx.clone()).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap(), FlowOutcome::Completed);
}

#[tokio::test]
async fn test_before_on_after_execution_order() {
    setup_tracing();
    let mut flow = Flow::<TestContext, TestError>::new(&[("main_stage", false, None)]);

    flow.before_stage("main_stage", create_simple_handler("before_main", "Before;"));
    flow.on_stage("main_stage", create_simple_handler("on_main", "On;"));
    flow.after_stage("main_stage", create_simple_handler("after_main", "After;"));

    let ctx = FlowContext::new(TestContext::default());
    flow.run(ctx.clone()).await.unwrap();

    let guard = ctx.read();
    assert_eq!(guard.counter, 3);
    assert_eq!(guard.message, "Before;On;After;");
    assert_eq!(guard.stages_executed, vec!["before_main", "on_main", "after_main"]);
}

#[tokio::test]
async fn test_anyhow_error_converts_through_flow_error() {
    setup_tracing();
    let err = FlowError::from(anyhow::anyhow!("opaque failure"));
    match err {
        FlowError::HandlerError { source } => {
            assert_eq!(source.to_string(), "opaque failure");
        }
        other => panic!("Expected FlowError::HandlerError, got {:?}", other),
    }
}
