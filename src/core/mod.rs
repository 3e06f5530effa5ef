//! Core module - configuration and shared plumbing

pub mod config;

pub use config::Config;
