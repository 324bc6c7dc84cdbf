//! Methods for registering `before`, `on`, and `after` handlers and
//! per-stage compensation for flow stages. Handlers operate on
//! `FlowContext<TData>` and return `Result<_, Err>`.

use tracing::{event, Level};

use crate::core::context::{Compensation, FlowContext, Handler};
use crate::core::control::StageControl;
use crate::error::FlowError;
use crate::flow::definition::Flow;
use std::future::Future;

impl<TData, Err> Flow<TData, Err>
where
    TData: 'static + Send + Sync,
    Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
    /// Registers a `before` hook for a given stage.
    ///
    /// The `handler_fn` takes `FlowContext<TData>` and returns a `Future`
    /// resolving to `Result<StageControl, UserProvidedErr>`, where
    /// `UserProvidedErr` must be convertible into the flow's `Err` type.
    pub fn before_stage<F, UserProvidedErr>(
        &mut self,
        stage_name: &str,
        handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
    ) where
        F: Future<Output = Result<StageControl, UserProvidedErr>> + Send + 'static,
        UserProvidedErr: Into<Err> + Send + Sync + 'static,
    {
        self.ensure_stage_exists(stage_name);
        let final_handler: Handler<TData, Err> = Box::new(move |ctx| {
            let user_fut = handler_fn(ctx);
            Box::pin(async move { user_fut.await.map_err(Into::into) })
        });
        self.before
            .entry(stage_name.to_string())
            .or_default()
            .push(final_handler);
    }

    /// Registers an `on` hook for a given stage.
    pub fn on_stage<F, UserProvidedErr>(
        &mut self,
        stage_name: &str,
        handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
    ) where
        F: Future<Output = Result<StageControl, UserProvidedErr>> + Send + 'static,
        UserProvidedErr: Into<Err> + Send + Sync + 'static,
    {
        self.ensure_stage_exists(stage_name);
        let final_handler: Handler<TData, Err> = Box::new(move |ctx| {
            let user_fut = handler_fn(ctx);
            Box::pin(async move { user_fut.await.map_err(Into::into) })
        });
        self.on
            .entry(stage_name.to_string())
            .or_default()
            .push(final_handler);
    }

    /// Registers an `after` hook for a given stage.
    pub fn after_stage<F, UserProvidedErr>(
        &mut self,
        stage_name: &str,
        handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
    ) where
        F: Future<Output = Result<StageControl, UserProvidedErr>> + Send + 'static,
        UserProvidedErr: Into<Err> + Send + Sync + 'static,
    {
        self.ensure_stage_exists(stage_name);
        let final_handler: Handler<TData, Err> = Box::new(move |ctx| {
            let user_fut = handler_fn(ctx);
            Box::pin(async move { user_fut.await.map_err(Into::into) })
        });
        self.after
            .entry(stage_name.to_string())
            .or_default()
            .push(final_handler);
    }

    /// Registers the compensation handler for a given stage.
    ///
    /// The handler runs when any of the stage's hooks returns `Err`, giving
    /// the flow a chance to repair partial state produced by earlier stages
    /// (delete an orphaned row, mark a record failed, release a hold).
    /// Compensation is best-effort: its own error is logged and swallowed,
    /// and the stage's original error propagates to the caller unchanged.
    ///
    /// Registering a second compensation for the same stage replaces the
    /// first.
    pub fn compensate<F, UserProvidedErr>(
        &mut self,
        stage_name: &str,
        handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
    ) where
        F: Future<Output = Result<(), UserProvidedErr>> + Send + 'static,
        UserProvidedErr: Into<Err> + Send + Sync + 'static,
    {
        self.ensure_stage_exists(stage_name);
        let final_handler: Compensation<TData, Err> = Box::new(move |ctx| {
            let user_fut = handler_fn(ctx);
            Box::pin(async move { user_fut.await.map_err(Into::into) })
        });
        if self
            .compensations
            .insert(stage_name.to_string(), final_handler)
            .is_some()
        {
            event!(
                Level::WARN,
                stage = %stage_name,
                "Replacing previously registered compensation handler."
            );
        }
    }
}
