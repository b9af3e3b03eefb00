//! # controller-analyzer
//!
//! Inventories the HTTP controllers of a Java code base: which types handle
//! requests, which of their methods are endpoints, and which DTO types those
//! endpoints consume or return.
//!
//! ## Architecture
//!
//! - **scan**: source file discovery under a root directory
//! - **syntax**: Java parsing with tree-sitter into owned declarations
//! - **model**: the declarations the analysis reads
//! - **catalog**: interface index built over every file before resolution
//! - **classify**: controller and endpoint recognition from annotations
//! - **resolve**: endpoint and DTO extraction per controller
//! - **inventory**: controller -> endpoint -> DTO accumulation
//! - **frequency**: DTO usage statistics
//! - **analyzer**: the two-pass batch pipeline
//! - **report**: JSON report output
//! - **cli** / **config**: command line and resolved settings

pub mod analyzer;
pub mod catalog;
pub mod classify;
pub mod cli;
pub mod config;
pub mod frequency;
pub mod inventory;
pub mod model;
pub mod report;
pub mod resolve;
pub mod scan;
pub mod syntax;
