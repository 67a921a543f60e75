//! Shared helpers for file handling and external processes.
//!
//! - [`fs`] - atomic writes, content hashing, include reference resolution
//! - [`process`] - external commands with timeouts

pub mod fs;
pub mod process;
