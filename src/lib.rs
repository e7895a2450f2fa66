//! Library crate for userdir-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, forms, controller and event loop (`app`)
//! - Command-line options and logging setup (`cli`)
//! - Error types (`error`)
//! - User record types (`model`)
//! - Remote collection gateway (`remote`)
//! - Name search helpers (`search`)
//! - In-memory directory of records (`store`)
//! - UI rendering (`ui`)
//!
//! It is used by the `userdir-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod cli;
pub mod error;
pub mod model;
pub mod remote;
pub mod search;
pub mod store;
pub mod ui;

pub use error::{FormError, NetworkError, StoreError};
pub use model::{User, UserId, UserPatch};
pub use store::DirectoryStore;
