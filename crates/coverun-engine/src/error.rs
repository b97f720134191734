//! Run-level errors
//!
//! Errors local to one unit of work (one artifact, one check, one graph
//! edge) never surface here — they are contained where they happen and
//! reported as diagnostics or failed outcomes. Only "no viable target"
//! and "no checks executed at all" escalate to the batch level.

use crate::designate::DesignateError;
use crate::settings::StoreError;
use coverun_registry::ResolveError;

/// Failure of one run request.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Zero cover functions matched, or matched functions produced zero
    /// checks. Reported distinctly before the error is returned.
    #[error("nothing applicable could be found")]
    NothingApplicable,

    /// A designated-target run was requested but the workspace has no
    /// designated target.
    #[error("no target has been designated for this workspace")]
    NoDesignatedTarget,

    /// Target resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Line-based designation failed.
    #[error(transparent)]
    Designate(#[from] DesignateError),

    /// The designated-target store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
