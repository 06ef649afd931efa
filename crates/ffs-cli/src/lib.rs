//! # ffs-cli
//!
//! The Featrix Foundation Shell: a command-line client for the Featrix
//! Sphere model-hosting service.
//!
//! Provides commands for:
//! - Creating and extending foundational models from tabular data
//! - Inspecting models, their columns, and their model cards
//! - Polling training with a live status display
//! - Publishing, deprecating, and deleting models
//! - Managing stored API credentials
//!
//! # Architecture
//!
//! Every invocation follows the same shape: parse arguments, resolve
//! credentials, call one remote API operation through
//! [`ffs_sphere::SphereClient`], and format the result. The `model wait`
//! command repeats its call until training reaches a terminal status.
//!
//! ```text
//! ┌───────┐      HTTPS (bearer auth)      ┌──────────────┐
//! │  ffs  │◄─────────────────────────────►│  Sphere API  │
//! └───────┘                               └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod render;
pub mod state;

pub use cli::{AuthCommands, Cli, Commands, ModelCommands, ServerCommands};
pub use error::CliError;
pub use output::{Format, OutputFormat};
pub use state::ClientState;
