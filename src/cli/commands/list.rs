//! List command - show the machine inventory

use super::{connect, open_inventory};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::error::HvResult;
use crate::hyperv::HypervisorClient;
use crate::inventory::{CacheState, Inventory, MachineRecord, MachineState};
use crate::ui::{self, TaskSpinner, UiContext};
use chrono::{DateTime, Local, Utc};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> HvResult<()> {
    let ctx = UiContext::detect();
    let mut inventory = open_inventory(config);
    let now = Utc::now();

    if args.sync || inventory.needs_sync(now) {
        let client = connect(config)?;
        sync(&ctx, &mut inventory, &client, &args, now).await?;
    }

    let state = inventory.state();
    let records = matching(state, args.name.as_deref());
    if records.is_empty() && args.format == OutputFormat::Table {
        ui::step_info(&ctx, "No machines in inventory");
        return Ok(());
    }

    print!("{}", render(&ctx, &records, args.format)?);
    if args.format == OutputFormat::Table {
        ui::remark(&ctx, &summary(state, records.len()));
    }
    Ok(())
}

async fn sync(
    ctx: &UiContext,
    inventory: &mut Inventory,
    client: &dyn HypervisorClient,
    args: &ListArgs,
    now: DateTime<Utc>,
) -> HvResult<()> {
    // Keep stderr quiet for scripted formats
    let mut spinner = (args.format == OutputFormat::Table).then(|| TaskSpinner::new(ctx));
    if let Some(spinner) = spinner.as_mut() {
        spinner.start(&format!("Syncing with {}...", client.endpoint()));
    }

    let result = inventory.refresh(client, args.name.as_deref(), now).await;

    if let Some(spinner) = spinner.as_mut() {
        match &result {
            Ok(()) => spinner.clear(),
            Err(_) => spinner.stop_error("Sync failed"),
        }
    }
    result
}

/// Records whose name contains `filter`, ignoring case
fn matching<'a>(state: &'a CacheState, filter: Option<&str>) -> Vec<&'a MachineRecord> {
    let needle = filter.map(str::to_lowercase);
    state
        .records
        .iter()
        .filter(|r| {
            needle
                .as_deref()
                .is_none_or(|n| r.name.to_lowercase().contains(n))
        })
        .collect()
}

fn render(ctx: &UiContext, records: &[&MachineRecord], format: OutputFormat) -> HvResult<String> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = records
                .iter()
                .map(|r| {
                    vec![
                        r.index.to_string(),
                        r.name.clone(),
                        state_cell(ctx, r.state),
                        uptime(r).unwrap_or_default(),
                    ]
                })
                .collect();
            Ok(ui::table(ctx, &["INDEX", "NAME", "STATE", "UPTIME"], &rows))
        }
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(records)?)),
        OutputFormat::Plain => Ok(records
            .iter()
            .map(|r| format!("{}\n", r.name))
            .collect()),
    }
}

fn state_cell(ctx: &UiContext, state: MachineState) -> String {
    if !ctx.use_fancy_output() {
        return state.to_string();
    }
    let styled = match state {
        MachineState::Running => style(state.label()).green(),
        MachineState::Paused | MachineState::Saved => style(state.label()).yellow(),
        MachineState::Off => style(state.label()).dim(),
        _ => style(state.label()).cyan(),
    };
    styled.to_string()
}

/// `Uptime` as sent by the host, without fractional seconds
fn uptime(record: &MachineRecord) -> Option<String> {
    let raw = record.extra.get("Uptime")?.as_str()?;
    let seconds_start = raw.rfind(':').unwrap_or(0);
    let trimmed = match raw[seconds_start..].find('.') {
        Some(dot) => &raw[..seconds_start + dot],
        None => raw,
    };
    Some(trimmed.to_string())
}

fn summary(state: &CacheState, shown: usize) -> String {
    match state.last_sync {
        Some(at) => format!(
            "{} machine(s), synced {}",
            shown,
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        None => format!("{} machine(s), never synced", shown),
    }
}
