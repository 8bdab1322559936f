//! hvctl - Hyper-V machines over SSH
//!
//! Keeps a local inventory cache of the host's virtual machines so they
//! can be addressed by a short, stable index between syncs.

pub mod cli;
pub mod config;
pub mod error;
pub mod hyperv;
pub mod inventory;
pub mod ui;

pub use error::{HvError, HvResult};
