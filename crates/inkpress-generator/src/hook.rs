//! Lifecycle hooks.

use crate::context::BuildContext;

/// Result of one hook invocation.
///
/// None of these abort the build. The builder logs each outcome and records
/// it in the build report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// The hook did its work.
    Completed { detail: String },
    /// Optional input was missing; nothing was touched.
    Skipped { reason: String },
    /// The hook failed; the build continues without its output.
    Failed { error: String },
}

impl HookOutcome {
    /// Whether the hook completed.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Whether the hook skipped its work.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// Whether the hook failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A hook invoked once before each build, ahead of content processing.
pub trait BuildHook: Send + Sync {
    /// Name used in diagnostics and the build report.
    fn name(&self) -> &str;

    /// Run the hook.
    fn before_build(&self, ctx: &BuildContext) -> HookOutcome;
}
