//! # matyou engine
//!
//! Applies a Material You color palette to the configuration files of
//! desktop applications by rewriting each tool's native format in place.
//! Configuration spread over several files is followed through include
//! directives and only the files holding color settings are rewritten.
//!
//! ## Modules
//!
//! - [`palette`] - Color palettes, validation and hex conversions
//! - [`apps`] - Registry of supported applications and their conventions
//! - [`locator`] - Config file discovery, include closure and instances
//! - [`classifier`] - Main / color-bearing / other file classification
//! - [`rewriter`] - Per-application, scope-aware find-or-insert rewriters
//! - [`backup`] - Backup copies, theme snapshots and restore
//! - [`reload`] - Asking running applications to reload
//! - [`generator`] - Optional model-backed patch generation
//! - [`orchestrator`] - One theme change from validation to report
//! - [`utils`] - File and process helpers
//! - [`common`] - Error types

pub mod apps;
pub mod backup;
pub mod classifier;
pub mod common;
pub mod generator;
pub mod locator;
pub mod orchestrator;
pub mod palette;
pub mod reload;
pub mod rewriter;
pub mod utils;
