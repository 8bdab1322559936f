//! Power commands - start, stop, pause and resume

use super::{connect, open_inventory, refresh_machine};
use crate::cli::args::{StopArgs, TargetArgs};
use crate::config::Config;
use crate::error::HvResult;
use crate::hyperv::HypervisorClient;
use crate::inventory::Inventory;
use crate::ui::{self, TaskSpinner, UiContext};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PowerOp {
    Start,
    Stop { force: bool },
    Pause,
    Resume,
}

impl PowerOp {
    fn progress(self) -> &'static str {
        match self {
            Self::Start => "Starting",
            Self::Stop { .. } => "Stopping",
            Self::Pause => "Pausing",
            Self::Resume => "Resuming",
        }
    }

    async fn apply(self, client: &dyn HypervisorClient, id: Uuid) -> HvResult<()> {
        match self {
            Self::Start => client.start(id).await,
            Self::Stop { force } => client.stop(id, force).await,
            Self::Pause => client.pause(id).await,
            Self::Resume => client.resume(id).await,
        }
    }
}

pub async fn start(args: TargetArgs, config: &Config) -> HvResult<()> {
    execute(&args, PowerOp::Start, config).await
}

pub async fn stop(args: StopArgs, config: &Config) -> HvResult<()> {
    execute(&args.target, PowerOp::Stop { force: args.force }, config).await
}

pub async fn pause(args: TargetArgs, config: &Config) -> HvResult<()> {
    execute(&args, PowerOp::Pause, config).await
}

pub async fn resume(args: TargetArgs, config: &Config) -> HvResult<()> {
    execute(&args, PowerOp::Resume, config).await
}

async fn execute(args: &TargetArgs, op: PowerOp, config: &Config) -> HvResult<()> {
    let ctx = UiContext::detect();
    let client = connect(config)?;
    let mut inventory = open_inventory(config);
    run(&ctx, args, op, &mut inventory, &client, Utc::now()).await
}

/// Resolve the target, apply `op`, then upsert the machine's new state
async fn run(
    ctx: &UiContext,
    args: &TargetArgs,
    op: PowerOp,
    inventory: &mut Inventory,
    client: &dyn HypervisorClient,
    now: DateTime<Utc>,
) -> HvResult<()> {
    let vm = inventory
        .resolve_target(client, args.name.as_deref(), args.index, now)
        .await?;

    let mut spinner = TaskSpinner::new(ctx);
    spinner.start(&format!("{} {}...", op.progress(), vm.name));
    if let Err(e) = op.apply(client, vm.id).await {
        spinner.stop_error(&format!("{} {} failed", op.progress(), vm.name));
        return Err(e);
    }
    spinner.clear();

    if let Some(after) = refresh_machine(ctx, inventory, client, &vm, now).await {
        ui::step_ok(
            ctx,
            &format!("[{}] {} is {}", after.index, after.name, after.state),
        );
    }
    Ok(())
}
