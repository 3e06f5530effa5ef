//! Command implementations

pub mod catalog;
pub mod completions;
pub mod export;
pub mod new;
pub mod quote;
pub mod validate;
