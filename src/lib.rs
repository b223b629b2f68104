pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod manifest;
pub mod resolver;
pub mod ui;
pub mod version;

pub use error::{BumpError, Result};
pub use resolver::{resolve_with_tags, ResolveRequest, Resolution};
pub use version::{increment, increment_str};
