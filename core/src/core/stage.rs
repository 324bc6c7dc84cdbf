//! Definition of a single stage within a flow.

use super::FlowContext;

// Skip conditions are evaluated against the shared context just before the
// stage runs. Arc so a definition stays cheaply cloneable.
pub type SkipCondition<TData> =
    std::sync::Arc<dyn Fn(FlowContext<TData>) -> bool + Send + Sync + 'static>;

/// A stage definition: its name, whether it may be left without handlers,
/// and an optional skip condition over the root context.
#[derive(Clone)]
pub struct StageDef<T: 'static + Send + Sync> {
    pub name: String,
    pub optional: bool,
    // If this evaluates to true at run time, the stage is skipped entirely.
    pub skip_if: Option<SkipCondition<T>>,
}

// SkipCondition (Arc<dyn Fn...>) doesn't implement Debug, so provide a
// placeholder output.
impl<T: 'static + Send + Sync> std::fmt::Debug for StageDef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageDef")
            .field("name", &self.name)
            .field("optional", &self.optional)
            .field("skip_if_present", &self.skip_if.is_some())
            .finish()
    }
}
