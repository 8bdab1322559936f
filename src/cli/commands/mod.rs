//! CLI command implementations

pub mod completions;
pub mod config;
pub mod list;
pub mod power;
pub mod snapshot;
pub mod snaps;

pub use completions::execute as completions;
pub use config::execute as config;
pub use list::execute as list;
pub use power::{pause, resume, start, stop};
pub use snapshot::{create, delete, restore};
pub use snaps::execute as snaps;

use crate::config::Config;
use crate::error::HvResult;
use crate::hyperv::{HypervisorClient, SshHypervisor};
use crate::inventory::{Inventory, MachineRecord};
use crate::ui::{self, UiContext};
use chrono::{DateTime, Utc};

/// Inventory backed by the configured cache file
fn open_inventory(config: &Config) -> Inventory {
    Inventory::open(config.inventory_store(), config.staleness_policy())
}

fn connect(config: &Config) -> HvResult<SshHypervisor> {
    SshHypervisor::new(&config.server)
}

/// Re-read one machine after changing it. Failure only costs freshness.
async fn refresh_machine(
    ctx: &UiContext,
    inventory: &mut Inventory,
    client: &dyn HypervisorClient,
    vm: &MachineRecord,
    now: DateTime<Utc>,
) -> Option<MachineRecord> {
    match inventory.refresh_machine(client, vm.id, now).await {
        Ok(Some(fresh)) => Some(fresh),
        Ok(None) => {
            ui::step_warn(ctx, &format!("{} is no longer on the host", vm.name));
            ui::remark(ctx, "Run: hvctl ls to renumber the inventory");
            None
        }
        Err(e) => {
            ui::step_warn_hint(
                ctx,
                &format!("Could not refresh '{}': {}", vm.name, e),
                "Run: hvctl ls",
            );
            None
        }
    }
}
