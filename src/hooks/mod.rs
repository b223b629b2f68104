//! User commands run around the version write
//!
//! - leading: before any manifest is touched, a failure aborts the bump
//! - trailing: after the manifests are written

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};
