//! Merged export namespace and cover discovery for coverun
//!
//! # Core Concepts
//!
//! - [`Export`] / [`ExportMap`]: the value model of the host module
//!   system's export contract
//! - [`Cover`] / [`Checker`] / [`CheckResult`]: cover callables and the
//!   result protocol as one tagged union
//! - [`Registry`]: the merged namespace, owned by the run context and
//!   populated once by [`load_all`]
//! - [`ArtifactHost`]: the seam to the host module system
//! - [`resolve`]: target resolution across registry, verification roots
//!   and the ambient registry
//!
//! Naming conventions (marker word, check pattern, reset hook) live in
//! [`convention`].

pub mod check;
pub mod convention;
pub mod export;
pub mod host;
pub mod loader;
pub mod registry;
pub mod resolve;

pub use check::{CheckResult, Checker, CheckerSeq, CheckerStream, Cover};
pub use export::{Export, ExportMap};
pub use host::{ArtifactHost, HostError, StaticHost};
pub use loader::load_all;
pub use registry::Registry;
pub use resolve::{resolve, Resolution, ResolveError, Selector, Target};
