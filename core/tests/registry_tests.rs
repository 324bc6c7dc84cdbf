// tests/registry_tests.rs
mod common;

use common::*;
use trellis::{Flow, FlowContext, FlowOutcome, FlowRegistry};

#[derive(Clone, Debug, Default)]
struct OtherContext {
    pub ran: bool,
}

#[tokio::test]
async fn test_registry_dispatches_by_context_type() {
    setup_tracing();
    let registry = FlowRegistry::<TestError>::new();

    let mut flow = Flow::<TestContext, TestError>::new(&[("only", false, None)]);
    flow.on_stage("only", create_simple_handler("only", "ran"));
    registry.register_flow(flow);

    let mut other_flow = Flow::<OtherContext, TestError>::new(&[("mark", false, None)]);
    other_flow.on_stage("mark", |ctx: FlowContext<OtherContext>| {
        Box::pin(async move {
            ctx.write().ran = true;
            Ok::<_, TestError>(trellis::StageControl::Continue)
        })
    });
    registry.register_flow(other_flow);

    let ctx = FlowContext::new(TestContext::default());
    let result = registry.run(ctx.clone()).await;
    assert_eq!(result.unwrap(), FlowOutcome::Completed);
    assert_eq!(ctx.read().message, "ran");

    let other_ctx = FlowContext::new(OtherContext::default());
    let other_result = registry.run(other_ctx.clone()).await;
    assert_eq!(other_result.unwrap(), FlowOutcome::Completed);
    assert!(other_ctx.read().ran);
}

#[tokio::test]
async fn test_registry_unknown_context_type_is_configuration_error() {
    setup_tracing();
    let registry = FlowRegistry::<TestError>::new();

    let ctx = FlowContext::new(TestContext::default());
    let result = registry.run(ctx).await;

    assert!(result.is_err());
    if let Err(TestError::Engine(s)) = result {
        assert!(s.contains("Configuration"));
        assert!(s.contains("TestContext"));
    } else {
        panic!("Expected FlowError::Configuration, got {:?}", result);
    }
}

#[tokio::test]
async fn test_registry_propagates_flow_errors() {
    setup_tracing();
    let registry = FlowRegistry::<TestError>::new();

    let mut flow = Flow::<TestContext, TestError>::new(&[("bad", false, None)]);
    flow.on_stage("bad", create_failing_handler("bad", "boom"));
    registry.register_flow(flow);

    let ctx = FlowContext::new(TestContext::default());
    let result = registry.run(ctx).await;
    assert_eq!(result.err().unwrap(), TestError::Handler("boom".to_string()));
}

#[tokio::test]
async fn test_registry_reregistration_replaces_flow() {
    setup_tracing();
    let registry = FlowRegistry::<TestError>::new();

    let mut first = Flow::<TestContext, TestError>::new(&[("only", false, None)]);
    first.on_stage("only", create_simple_handler("only", "first"));
    registry.register_flow(first);

    let mut second = Flow::<TestContext, TestError>::new(&[("only", false, None)]);
    second.on_stage("only", create_simple_handler("only", "second"));
    registry.register_flow(second);

    let ctx = FlowContext::new(TestContext::default());
    registry.run(ctx.clone()).await.unwrap();
    assert_eq!(ctx.read().message, "second");
}
