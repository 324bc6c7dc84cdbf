//! Contains the `Flow<TData, Err>` struct definition and methods for its
//! construction.

use crate::core::context::{Compensation, Handler};
use crate::core::stage::{SkipCondition, StageDef};
use std::collections::HashMap;

/// The core flow type, generic over an underlying root data type `TData` and
/// an error type `Err` that its handlers return.
///
/// `TData` must be `'static + Send + Sync`. `Err` must be
/// `std::error::Error + Send + Sync + 'static` and `From<FlowError>` so the
/// engine can surface its own configuration failures through the same error
/// channel as the handlers.
pub struct Flow<TData, Err>
where
    TData: 'static + Send + Sync,
    Err: std::error::Error + From<crate::error::FlowError> + Send + Sync + 'static,
{
    /// Ordered list of stage definitions for this flow.
    pub(crate) stages: Vec<StageDef<TData>>,

    // Handlers for the phases of each stage.
    pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
    pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
    pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,

    // At most one compensation per stage, invoked when that stage fails.
    pub(crate) compensations: HashMap<String, Compensation<TData, Err>>,
}

impl<TData, Err> Flow<TData, Err>
where
    TData: 'static + Send + Sync,
    Err: std::error::Error + From<crate::error::FlowError> + Send + Sync + 'static,
{
    /// Creates a new `Flow` from an ordered set of stage definitions:
    /// `(name, optional, skip_if)` triples.
    pub fn new(stage_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
        let stages = stage_defs
            .iter()
            .map(|(name, optional, skip_cond_opt)| StageDef {
                name: (*name).to_string(),
                optional: *optional,
                skip_if: skip_cond_opt.clone(),
            })
            .collect();

        Self {
            stages,
            before: HashMap::new(),
            on: HashMap::new(),
            after: HashMap::new(),
            compensations: HashMap::new(),
        }
    }

    /// Ensures that a stage with the given name exists. Panics if not found:
    /// a missing stage at registration time is a programming error (e.g. a
    /// typo in the stage name), not a runtime condition.
    pub(crate) fn ensure_stage_exists(&self, stage_name: &str) {
        if !self.stages.iter().any(|s| s.name == stage_name) {
            panic!(
                "Trellis setup error: stage '{}' not found in flow definition.",
                stage_name
            );
        }
    }
}
