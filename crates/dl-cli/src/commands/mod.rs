//! CLI subcommand implementations.

pub mod layout;
pub mod plan;
pub mod route;
pub mod summary;
pub mod svg;
pub mod util;
