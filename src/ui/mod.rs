//! Terminal output for hvctl
//!
//! Interactive terminals get `cliclack` spinners and prompts; pipes and CI
//! get plain bracketed lines. Status goes to stderr so that listings on
//! stdout stay machine-readable.
//!
//! # Example
//!
//! ```rust,ignore
//! use hvctl::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Syncing inventory...");
//! // ... fetch ...
//! spinner.stop("Inventory synced");
//!
//! if ui::confirm(&ctx, "Delete snapshot 'base'?", false).await? {
//!     ui::step_ok(&ctx, "Snapshot deleted");
//! }
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    outro_warn, remark, section, step_info, step_ok, step_warn, step_warn_hint, table,
};
pub use progress::TaskSpinner;
pub use prompts::confirm;
pub use theme::{init_theme, HvTheme};
