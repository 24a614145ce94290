//! CLI commands

pub mod call;
pub mod list;
pub mod render;
pub mod seed;
