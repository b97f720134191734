//! Cover execution engine and run orchestration for coverun
//!
//! # Core Concepts
//!
//! - [`Engine`]: invokes resolved covers sequentially and interprets the
//!   result protocol into [`CheckOutcome`]s
//! - [`Reporter`]: the line-oriented pass/fail sink
//! - [`Runner`] / [`Request`]: one-request orchestration over a project
//!   graph, an artifact host and a target store
//! - [`designate`]: pure source-line analysis for "point at a line"
//!   target designation
//! - [`TargetStore`]: persistence contract for the workspace's designated
//!   target
//!
//! Execution is strictly sequential: checks may share mutable environment
//! and the reset hook restores it between checks sharing a root.

pub mod designate;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod report;
pub mod run;
pub mod settings;

pub use designate::{designate, enclosing_namespace, function_name_from_line, DesignateError};
pub use engine::Engine;
pub use error::RunError;
pub use outcome::{CheckOutcome, Detail, RunSummary};
pub use report::Reporter;
pub use run::{Request, RunOptions, Runner};
pub use settings::{DesignatedTarget, MemoryStore, StoreError, TargetStore, TargetsFile};
