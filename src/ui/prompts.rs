//! Confirmation prompt with non-interactive fallback

use super::context::UiContext;
use crate::error::{HvError, HvResult};

/// Ask a yes/no question.
///
/// `--yes` answers true; without a terminal the default is returned.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> HvResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }
    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on stdin
    let message = message.to_string();
    let answer = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message).initial_value(default).interact()
    })
    .await
    .map_err(|e| HvError::User(format!("Prompt task failed: {}", e)))?;

    answer.map_err(|e| HvError::User(format!("Prompt failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirm_auto_yes() {
        let ctx = UiContext::non_interactive().with_auto_yes(true);
        assert!(confirm(&ctx, "Delete?", false).await.unwrap());
    }

    #[tokio::test]
    async fn confirm_non_interactive_default() {
        let ctx = UiContext::non_interactive();
        assert!(confirm(&ctx, "Delete?", true).await.unwrap());
        assert!(!confirm(&ctx, "Delete?", false).await.unwrap());
    }
}
