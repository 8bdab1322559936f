//! Snaps command - list a machine's snapshots

use super::{connect, open_inventory, refresh_machine};
use crate::cli::args::TargetArgs;
use crate::config::Config;
use crate::error::HvResult;
use crate::hyperv::{HypervisorClient, Snapshot};
use crate::inventory::Inventory;
use crate::ui::{self, UiContext};
use chrono::{DateTime, Utc};

/// Execute the snaps command
pub async fn execute(args: TargetArgs, config: &Config) -> HvResult<()> {
    let ctx = UiContext::detect();
    let client = connect(config)?;
    let mut inventory = open_inventory(config);

    let (vm, snapshots) = run(&ctx, &args, &mut inventory, &client, Utc::now()).await?;

    ui::section(&ctx, &format!("Snapshots of {}", vm));
    if snapshots.is_empty() {
        ui::step_info(&ctx, "No snapshots");
        return Ok(());
    }
    print!("{}", render(&ctx, &snapshots));
    Ok(())
}

async fn run(
    ctx: &UiContext,
    args: &TargetArgs,
    inventory: &mut Inventory,
    client: &dyn HypervisorClient,
    now: DateTime<Utc>,
) -> HvResult<(String, Vec<Snapshot>)> {
    let vm = inventory
        .resolve_target(client, args.name.as_deref(), args.index, now)
        .await?;
    let name = refresh_machine(ctx, inventory, client, &vm, now)
        .await
        .map_or(vm.name, |fresh| fresh.name);

    let snapshots = client.fetch_snapshots(vm.id).await?;
    Ok((name, snapshots))
}

fn render(ctx: &UiContext, snapshots: &[Snapshot]) -> String {
    let rows: Vec<Vec<String>> = snapshots
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.parent_snapshot_name.clone().unwrap_or_default(),
                s.creation_time.clone().unwrap_or_default(),
            ]
        })
        .collect();
    ui::table(ctx, &["NAME", "PARENT", "CREATED"], &rows)
}
