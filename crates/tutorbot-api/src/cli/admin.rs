//! Interactive maintenance menu for `tutorbot-admin`.
//!
//! Two choices only: wipe every stored message (after confirmation) or exit.

use console::style;
use dialoguer::{Confirm, Select};
use tracing::info;

use tutorbot_core::history::repository::HistoryRepository;
use tutorbot_types::error::RepositoryError;

use crate::cli::spinner;

const MENU: [&str; 2] = ["Reset all history", "Exit"];

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ResetHistory,
    Exit,
}

impl AdminAction {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => AdminAction::ResetHistory,
            _ => AdminAction::Exit,
        }
    }
}

/// Show the menu until the user picks "Exit".
pub async fn run_admin_menu<H: HistoryRepository>(history: &H) -> anyhow::Result<()> {
    loop {
        let index = Select::new()
            .with_prompt("Admin")
            .items(&MENU)
            .default(0)
            .interact()?;

        match AdminAction::from_index(index) {
            AdminAction::ResetHistory => {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Permanently delete {} for every user?",
                        style("all conversation history").red().bold()
                    ))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("  Cancelled.");
                    continue;
                }

                let progress = spinner("Resetting history...")?;
                let result = reset_history(history).await;
                progress.finish_and_clear();

                match result {
                    Ok(()) => println!(
                        "  {} All conversation history deleted.",
                        style("✓").green().bold()
                    ),
                    Err(e) => eprintln!("  {} Reset failed: {e}", style("!").red().bold()),
                }
            }
            AdminAction::Exit => return Ok(()),
        }
    }
}

/// Delete every stored message and restart the ordinal counter.
pub async fn reset_history<H: HistoryRepository>(history: &H) -> Result<(), RepositoryError> {
    history.reset().await?;
    info!("History reset by admin");
    Ok(())
}
