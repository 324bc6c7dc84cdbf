//! Contains `Flow::run()`, the engine's execution loop.

use crate::core::context::{FlowContext, Handler};
use crate::core::control::{FlowOutcome, StageControl};
use crate::core::stage::StageDef;
use crate::error::FlowError;
use crate::flow::definition::Flow;
use tracing::{event, instrument, span, Instrument, Level};

// What processing a stage produced; drives the outer loop.
enum StageVerdict {
    Continue,
    Skipped,
    Halt,
}

impl<TData, Err> Flow<TData, Err>
where
    TData: 'static + Send + Sync,
    Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
    /// Executes the flow against the given shared context.
    ///
    /// Stages run in definition order; within a stage, `before`, then `on`,
    /// then `after` handlers. A handler returning `StageControl::Halt` ends
    /// the run gracefully with `FlowOutcome::Halted`. A handler returning
    /// `Err` first triggers the failing stage's compensation (if one is
    /// registered), then propagates that original error.
    ///
    /// A non-optional stage with no handlers at all is a configuration
    /// fault, surfaced as `FlowError::HandlerMissing` converted into `Err`.
    #[instrument(
        name = "Flow::run",
        skip_all,
        fields(
            flow_context_type = %std::any::type_name::<TData>(),
            flow_error_type = %std::any::type_name::<Err>(),
            num_stages = self.stages.len(),
        ),
        err(Display)
    )]
    pub async fn run(&self, ctx: FlowContext<TData>) -> Result<FlowOutcome, Err> {
        event!(Level::DEBUG, "Flow execution starting.");

        for (stage_idx, stage_def) in self.stages.iter().enumerate() {
            let stage_span = span!(
                Level::INFO,
                "flow_stage",
                stage = stage_def.name.as_str(),
                stage_index = stage_idx,
                optional = stage_def.optional
            );

            // The span is attached to the future rather than entered with a
            // guard: an entered guard held across `.await` would make this
            // future !Send.
            match self
                .run_stage(stage_def, ctx.clone())
                .instrument(stage_span)
                .await?
            {
                StageVerdict::Continue | StageVerdict::Skipped => {}
                StageVerdict::Halt => return Ok(FlowOutcome::Halted),
            }
        }

        event!(Level::DEBUG, "Flow execution completed successfully.");
        Ok(FlowOutcome::Completed)
    }

    async fn run_stage(
        &self,
        stage_def: &StageDef<TData>,
        ctx: FlowContext<TData>,
    ) -> Result<StageVerdict, Err> {
        let stage_name = stage_def.name.as_str();
        event!(Level::DEBUG, "Processing stage.");

        if let Some(skip_cond_fn) = &stage_def.skip_if {
            if skip_cond_fn(ctx.clone()) {
                event!(Level::INFO, "Stage skipped due to 'skip_if' condition.");
                return Ok(StageVerdict::Skipped);
            }
        }

        let phases = [
            ("before", self.before.get(stage_name)),
            ("on", self.on.get(stage_name)),
            ("after", self.after.get(stage_name)),
        ];

        if phases
            .iter()
            .all(|(_, handlers)| handlers.map_or(true, |v| v.is_empty()))
        {
            if stage_def.optional {
                event!(Level::DEBUG, "Optional stage has no handlers, skipping.");
                return Ok(StageVerdict::Skipped);
            }
            event!(Level::ERROR, "Non-optional stage has no handlers.");
            return Err(Err::from(FlowError::HandlerMissing {
                stage: stage_def.name.clone(),
            }));
        }

        for (phase_name, handlers) in phases {
            let Some(handlers) = handlers else { continue };
            match self.run_phase(phase_name, handlers, ctx.clone()).await {
                Ok(true) => {}
                Ok(false) => {
                    event!(Level::INFO, phase = phase_name, "Flow halted by a handler.");
                    return Ok(StageVerdict::Halt);
                }
                Err(stage_err) => {
                    event!(
                        Level::ERROR,
                        error = %stage_err,
                        phase = phase_name,
                        "Stage handler failed."
                    );
                    self.run_compensation(stage_name, ctx.clone()).await;
                    return Err(stage_err);
                }
            }
        }
        event!(Level::DEBUG, "Stage finished successfully.");
        Ok(StageVerdict::Continue)
    }

    // Ok(true) = continue, Ok(false) = halt requested.
    async fn run_phase(
        &self,
        phase_name: &str,
        handlers: &[Handler<TData, Err>],
        ctx: FlowContext<TData>,
    ) -> Result<bool, Err> {
        for (handler_idx, handler_fn) in handlers.iter().enumerate() {
            event!(
                Level::TRACE,
                phase = phase_name,
                handler_index = handler_idx,
                "Executing handler."
            );
            match handler_fn(ctx.clone()).await {
                Ok(StageControl::Continue) => {}
                Ok(StageControl::Halt) => return Ok(false),
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }

    // Best-effort: a compensation failure is logged and swallowed so the
    // stage's original error reaches the caller undisturbed.
    async fn run_compensation(&self, stage_name: &str, ctx: FlowContext<TData>) {
        let Some(comp_fn) = self.compensations.get(stage_name) else {
            return;
        };
        event!(
            Level::INFO,
            stage = stage_name,
            "Running compensation for failed stage."
        );
        if let Err(comp_err) = comp_fn(ctx).await {
            event!(
                Level::ERROR,
                stage = stage_name,
                error = %comp_err,
                "Compensation handler itself failed; continuing with the original error."
            );
        }
    }
}
