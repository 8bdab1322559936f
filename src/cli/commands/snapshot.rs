//! Snapshot commands - create, restore and delete checkpoints

use super::{connect, open_inventory, refresh_machine};
use crate::cli::args::{DeleteArgs, SnapshotArgs};
use crate::config::Config;
use crate::error::HvResult;
use crate::hyperv::HypervisorClient;
use crate::inventory::Inventory;
use crate::ui::{self, TaskSpinner, UiContext};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnapshotOp {
    Create,
    Restore,
    Delete { recursive: bool },
}

impl SnapshotOp {
    fn progress(self) -> &'static str {
        match self {
            Self::Create => "Creating",
            Self::Restore => "Restoring",
            Self::Delete { .. } => "Deleting",
        }
    }

    fn done(self) -> &'static str {
        match self {
            Self::Create => "Created",
            Self::Restore => "Restored",
            Self::Delete { .. } => "Deleted",
        }
    }
}

pub async fn create(args: SnapshotArgs, config: &Config) -> HvResult<()> {
    execute(&args, SnapshotOp::Create, UiContext::detect(), config).await
}

pub async fn restore(args: SnapshotArgs, config: &Config) -> HvResult<()> {
    execute(&args, SnapshotOp::Restore, UiContext::detect(), config).await
}

pub async fn delete(args: DeleteArgs, config: &Config) -> HvResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let op = SnapshotOp::Delete {
        recursive: args.recursive,
    };
    execute(&args.snapshot, op, ctx, config).await
}

async fn execute(
    args: &SnapshotArgs,
    op: SnapshotOp,
    ctx: UiContext,
    config: &Config,
) -> HvResult<()> {
    let client = connect(config)?;
    let mut inventory = open_inventory(config);
    run(&ctx, args, op, &mut inventory, &client, Utc::now()).await
}

async fn run(
    ctx: &UiContext,
    args: &SnapshotArgs,
    op: SnapshotOp,
    inventory: &mut Inventory,
    client: &dyn HypervisorClient,
    now: DateTime<Utc>,
) -> HvResult<()> {
    let (index, snapshot) = args.target()?;
    let vm = inventory
        .resolve_target(client, args.name.as_deref(), index, now)
        .await?;

    if let SnapshotOp::Delete { recursive } = op {
        let children = if recursive { " and its children" } else { "" };
        let question = format!("Delete snapshot '{}'{} of {}?", snapshot, children, vm.name);
        if !ui::confirm(ctx, &question, false).await? {
            ui::outro_warn(ctx, "Aborted, nothing deleted");
            if !ctx.is_interactive() {
                ui::remark(ctx, "Pass --yes to delete without a prompt");
            }
            return Ok(());
        }
    }

    let mut spinner = TaskSpinner::new(ctx);
    spinner.start(&format!("{} snapshot '{}' of {}...", op.progress(), snapshot, vm.name));
    let result = match op {
        SnapshotOp::Create => client.create_snapshot(vm.id, snapshot).await,
        SnapshotOp::Restore => client.restore_snapshot(vm.id, snapshot).await,
        SnapshotOp::Delete { recursive } => {
            client.remove_snapshot(vm.id, snapshot, recursive).await
        }
    };
    if let Err(e) = result {
        spinner.stop_error(&format!("{} failed", op.progress()));
        return Err(e);
    }
    spinner.stop(&format!("{} snapshot '{}' of {}", op.done(), snapshot, vm.name));

    // Restoring changes the machine's state
    if op == SnapshotOp::Restore {
        refresh_machine(ctx, inventory, client, &vm, now).await;
    }
    Ok(())
}
