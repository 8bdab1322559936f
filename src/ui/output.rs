//! Status lines and tables

use super::context::UiContext;
use console::{measure_text_width, style};

/// Display a section header
pub fn section(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::info(style(title).bold()).ok();
    } else {
        eprintln!("{}", style(title).bold());
    }
}

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::success(message).ok();
    } else {
        eprintln!("  {} {}", style("[OK]").green(), message);
    }
}

/// Display an info step
pub fn step_info(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::info(message).ok();
    } else {
        eprintln!("  {} {}", style("[INFO]").cyan(), message);
    }
}

pub fn step_warn(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::warning(message).ok();
    } else {
        eprintln!("  {} {}", style("[WARN]").yellow(), message);
    }
}

/// Display a warning step with a follow-up hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::warning(format!("{} - {}", message, style(hint).dim())).ok();
    } else {
        eprintln!("  {} {} - {}", style("[WARN]").yellow(), message, hint);
    }
}

pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        eprintln!("  {}", style(message).dim());
    }
}

/// Display a warning outro (aborted operations)
pub fn outro_warn(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).yellow().bold()).ok();
    } else {
        eprintln!("{} {}", style("[WARN]").yellow(), message);
    }
}

/// Render rows as left-aligned columns separated by two spaces.
///
/// Headers are bold on a terminal. Trailing padding is trimmed so the
/// output diffs cleanly.
pub fn table(ctx: &UiContext, headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(measure_text_width(cell));
            }
        }
    }

    let render = |cells: Vec<String>| -> String {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            let pad = widths
                .get(i)
                .map_or(0, |w| w.saturating_sub(measure_text_width(cell)));
            line.push_str(&" ".repeat(pad));
        }
        line.trim_end().to_string()
    };

    let header = render(headers.iter().map(|h| h.to_string()).collect());
    let mut out = if ctx.use_fancy_output() {
        style(header).bold().to_string()
    } else {
        header
    };
    out.push('\n');
    for row in rows {
        out.push_str(&render(row.clone()));
        out.push('\n');
    }
    out
}
