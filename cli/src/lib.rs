//! # matyou
//!
//! Command-line front end for the `engine` crate: applies Material You
//! palettes to the dotfiles of Hyprland, kitty, waybar, rofi, dunst and GTK.
//!
//! ## Modules
//!
//! - [`commands`] - Command implementations returning plain data
//! - [`config`] - Layered configuration (`config.toml`, `.env`, environment)
//! - [`error`] - Application error type
//! - [`logger`] - Logger setup
//! - [`output`] - Text and JSON rendering
//! - [`palette`] - Palette loading and argument validation
//! - [`validation`] - Validator trait
//!
//! This library interface enables integration testing by providing access to internal modules.

pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod output;
pub mod palette;
pub mod validation;

pub use error::AppError;
pub use validation::Validator;
