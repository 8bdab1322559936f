//! Remote Hyper-V management
//!
//! The inventory core never talks to the host itself; commands resolve a
//! target through the cache and then call a `HypervisorClient`.

mod client;
pub mod model;
mod powershell;
mod ssh;
#[cfg(test)]
pub(crate) mod testing;

pub use client::HypervisorClient;
pub use model::Snapshot;
pub use ssh::SshHypervisor;
