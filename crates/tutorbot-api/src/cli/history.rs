//! `tutorbot history <name>`: print a stored conversation.

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use tutorbot_core::chat::session::ResumedSession;
use tutorbot_types::chat::{ChatMessage, MessageRole};

use crate::state::ConcreteSessionController;

/// Look up `display_name` and print its history as a table or JSON.
pub async fn show_history(
    sessions: &ConcreteSessionController,
    display_name: &str,
    json: bool,
) -> anyhow::Result<()> {
    let (context, history) = match sessions.resume_session(display_name).await? {
        ResumedSession::Found { context, history } => (context, history),
        ResumedSession::NotFound => {
            anyhow::bail!("No session found for '{display_name}'");
        }
    };

    if json {
        let out = serde_json::json!({
            "session_id": context.session_id(),
            "display_name": context.user_name(),
            "messages": history,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if history.is_empty() {
        println!();
        println!(
            "  {} No messages yet for {}.",
            style("i").blue().bold(),
            style(context.user_name()).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", history_table(&history));
    println!();
    Ok(())
}

/// One row per message, oldest first.
pub fn history_table(history: &[ChatMessage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for (index, message) in history.iter().enumerate() {
        let role = match message.role {
            MessageRole::Human => Cell::new("you").fg(Color::Green),
            MessageRole::Assistant => Cell::new("tutor").fg(Color::Cyan),
        };
        table.add_row(vec![
            Cell::new(index + 1).fg(Color::DarkGrey),
            role,
            Cell::new(&message.content),
        ]);
    }

    table
}
