//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands receive
//! validated [`Settings`](crate::config::Settings) and write their result
//! to stdout or a file; progress goes to the tracing log on stderr.

pub mod check;
pub mod converge;
pub mod price;
pub mod tree;
