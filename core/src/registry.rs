//! The `FlowRegistry<E>`: a type-keyed registry for managing and executing
//! flows. Flows are `Flow<TData, FlowHandlerError>`; the registry returns
//! results with an application-level error type `E`.

use crate::core::context::FlowContext;
use crate::core::control::FlowOutcome;
use crate::error::FlowError;
use crate::flow::definition::Flow;

use async_trait::async_trait;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tracing::{event, instrument, Level};

/// Type-erased trait for flow execution by the registry.
#[async_trait]
trait AnyFlowRunner<ApplicationError>: Send + Sync
where
    ApplicationError: std::error::Error + Send + Sync + 'static,
{
    /// Executes the flow with a type-erased, owned context. `ctx_obj` must
    /// contain a `FlowContext<TData>` for the flow's actual `TData`.
    async fn run_erased(
        &self,
        ctx_obj: Box<dyn Any + Send>,
    ) -> Result<FlowOutcome, ApplicationError>;
}

/// Wraps a `Flow<TData, FlowHandlerError>` so it can be dispatched by a
/// `FlowRegistry<ApplicationError>`.
struct FlowWrapper<TData, FlowHandlerError, ApplicationError>
where
    TData: 'static + Send + Sync,
    FlowHandlerError: std::error::Error + From<FlowError> + Send + Sync + 'static,
    ApplicationError:
        std::error::Error + From<FlowHandlerError> + From<FlowError> + Send + Sync + 'static,
{
    flow: Arc<Flow<TData, FlowHandlerError>>,
    _phantom_app_err: PhantomData<fn() -> ApplicationError>,
}

#[async_trait]
impl<TData, FlowHandlerError, ApplicationError> AnyFlowRunner<ApplicationError>
    for FlowWrapper<TData, FlowHandlerError, ApplicationError>
where
    TData: 'static + Send + Sync,
    FlowHandlerError: std::error::Error + From<FlowError> + Send + Sync + 'static,
    ApplicationError:
        std::error::Error + From<FlowHandlerError> + From<FlowError> + Send + Sync + 'static,
{
    #[instrument(
        name = "FlowWrapper::run_erased",
        skip_all,
        fields(
            target_context_type = %std::any::type_name::<TData>(),
            flow_handler_error_type = %std::any::type_name::<FlowHandlerError>(),
        ),
        err(Display)
    )]
    async fn run_erased(
        &self,
        ctx_obj: Box<dyn Any + Send>,
    ) -> Result<FlowOutcome, ApplicationError> {
        let typed_ctx = match ctx_obj.downcast::<FlowContext<TData>>() {
            Ok(boxed_ctx) => *boxed_ctx,
            Err(_) => {
                let expected = std::any::type_name::<FlowContext<TData>>();
                event!(Level::ERROR, "Context object type mismatch. Expected {}.", expected);
                return Err(ApplicationError::from(FlowError::Internal(format!(
                    "Registry dispatch context mismatch: expected {}",
                    expected
                ))));
            }
        };

        event!(Level::DEBUG, "Context downcast successful; executing wrapped flow.");
        self.flow.run(typed_ctx).await.map_err(ApplicationError::from)
    }
}

/// The flow registry. `ApplicationError` is the error type `run` returns; it
/// must be constructible from `FlowError` so internal framework errors
/// (flow not found, dispatch mismatches) surface through the same channel.
pub struct FlowRegistry<ApplicationError = FlowError>
where
    ApplicationError: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
    registry: Mutex<HashMap<TypeId, Arc<dyn AnyFlowRunner<ApplicationError>>>>,
}

impl<ApplicationError> FlowRegistry<ApplicationError>
where
    ApplicationError: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a `Flow<TData, FlowHandlerError>`, keyed by `TData`.
    /// Registering a second flow for the same context type replaces the
    /// first.
    pub fn register_flow<TData, FlowHandlerError>(&self, flow: Flow<TData, FlowHandlerError>)
    where
        TData: 'static + Send + Sync,
        FlowHandlerError: std::error::Error + From<FlowError> + Send + Sync + 'static,
        ApplicationError: From<FlowHandlerError>,
    {
        event!(
            Level::DEBUG,
            context_type = %std::any::type_name::<TData>(),
            handler_error = %std::any::type_name::<FlowHandlerError>(),
            "Registering flow."
        );
        let wrapper = FlowWrapper::<TData, FlowHandlerError, ApplicationError> {
            flow: Arc::new(flow),
            _phantom_app_err: PhantomData,
        };
        self.registry
            .lock()
            .expect("flow registry lock poisoned")
            .insert(TypeId::of::<TData>(), Arc::new(wrapper));
    }

    /// Runs the flow registered for the context data type `TData`.
    pub async fn run<TData>(
        &self,
        ctx: FlowContext<TData>,
    ) -> Result<FlowOutcome, ApplicationError>
    where
        TData: 'static + Send + Sync,
    {
        event!(
            Level::DEBUG,
            context_type = %std::any::type_name::<TData>(),
            "Dispatching flow."
        );
        let type_id = TypeId::of::<TData>();

        let runner_arc: Arc<dyn AnyFlowRunner<ApplicationError>> = {
            let reg_lock = self.registry.lock().expect("flow registry lock poisoned");
            reg_lock.get(&type_id).cloned().ok_or_else(|| {
                let type_name = std::any::type_name::<TData>();
                event!(Level::ERROR, "No flow registered for context type {}.", type_name);
                ApplicationError::from(FlowError::Configuration {
                    stage: "FlowRegistry::run".to_string(),
                    message: format!("No flow registered for context type {}", type_name),
                })
            })?
        };

        let owned_ctx_obj: Box<dyn Any + Send> = Box::new(ctx.clone());
        runner_arc.run_erased(owned_ctx_obj).await
    }
}

impl<ApplicationError> Default for FlowRegistry<ApplicationError>
where
    ApplicationError: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
