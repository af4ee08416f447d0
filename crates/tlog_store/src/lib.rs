//! Incremental-build dependency tracking.
//!
//! A [`TlogStore`] holds, for every source that was built, the files the
//! build read and the files it wrote. The facts are persisted as a pair of
//! line-oriented `tlog` files so that a later process can ask the
//! [`StalenessEvaluator`] whether a target is still up to date without
//! rerunning the build. [`BuildRecorder`] is the bridge a compiler uses to
//! report what it touched and to commit the record after a successful build.

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod evaluator;
pub mod log;
pub mod recorder;
pub mod store;

pub use error::StoreError;
pub use evaluator::{Staleness, StalenessEvaluator};
pub use log::DependencyLog;
pub use recorder::{BuildOutputs, BuildRecorder, DependencyObserver};
pub use store::{BuildRecord, LogKind, TlogStore};
