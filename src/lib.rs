//! DQT: Dental Quotation Toolkit
//!
//! A Unix-style toolkit for pricing dental treatment plans kept as plain
//! text files: chart treatments tooth by tooth, get a grouped quotation,
//! export it as a PDF.

pub mod catalog;
pub mod cli;
pub mod core;
pub mod plan;
pub mod pricing;
pub mod quote;
