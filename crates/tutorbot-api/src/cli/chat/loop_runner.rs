//! Main chat loop orchestration.
//!
//! Coordinates the terminal conversation: banner, session selection,
//! greeting, history replay, then the input loop. Each submitted line is one
//! turn through the conversation service.

use std::borrow::Cow;

use console::style;
use dialoguer::{Input, Password, Select};
use tracing::info;

use tutorbot_core::chat::service::TurnOutcome;
use tutorbot_core::chat::session::{greeting, ResumedSession, SessionContext, SessionState};
use tutorbot_types::chat::{ChatMessage, MessageRole};
use tutorbot_types::error::ChatError;

use crate::cli::spinner;
use crate::state::AppState;

use super::banner::{print_session_header, print_welcome_banner};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

const SESSION_OPTIONS: [&str; 2] = ["New session", "Existing session"];

/// Run the interactive chat until the user exits.
pub async fn run_chat(state: &AppState) -> anyhow::Result<()> {
    print_welcome_banner(
        &state.tutor.subject,
        state.conversation.generator().provider_name(),
        &state.tutor.model,
    );

    let mut session = SessionState::default();
    let mut history = Vec::new();
    while !session.is_active() {
        if let Some((context, loaded)) = select_session(state).await? {
            session.activate(context);
            history = loaded;
        }
    }
    let context = session
        .context()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("no active session"))?;

    info!(session_id = %context.session_id(), replayed = history.len(), "Chat session active");

    println!();
    print_session_header(&context.session_id().to_string());

    let renderer = ChatRenderer::new();
    for (role, content) in opening_transcript(context.user_name(), &history) {
        print_message(&renderer, role, content);
    }

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof | InputEvent::Interrupted => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Message(text) => {
                let thinking = spinner("thinking...")?;
                let result = state.conversation.handle_turn(&context, &text).await;
                thinking.finish_and_clear();

                match result {
                    Ok(TurnOutcome::Instruction(instruction)) => {
                        println!("  {}", style(instruction).dim());
                    }
                    Ok(TurnOutcome::Reply { assistant, .. }) => {
                        print_tutor(&renderer, &assistant.content);
                    }
                    Err(ChatError::Generation(e)) => {
                        eprintln!("\n  {} Could not get a reply: {e}", style("!").red().bold());
                        eprintln!(
                            "  {}",
                            style("Your message was saved. Ask again to retry.").dim()
                        );
                    }
                    Err(e) => {
                        eprintln!("\n  {} {e}", style("!").red().bold());
                    }
                }
            }
        }
    }

    chat_input.flush();
    Ok(())
}

/// Ask for new/existing session and a name. `None` means "ask again".
async fn select_session(
    state: &AppState,
) -> anyhow::Result<Option<(SessionContext, Vec<ChatMessage>)>> {
    let choice = Select::new()
        .with_prompt("Choose an option")
        .items(&SESSION_OPTIONS)
        .default(0)
        .interact()?;

    if choice == 0 {
        let name: String = Input::<String>::new()
            .with_prompt("Enter your name")
            .interact_text()?;

        return match state.sessions.start_new_session(&name).await {
            Ok(started) => {
                if let Some(warning) = started.warning {
                    eprintln!(
                        "  {} {warning}. You will not be able to resume this session by name.",
                        style("!").yellow().bold()
                    );
                }
                Ok(Some((started.context, started.history)))
            }
            Err(ChatError::InvalidName) => {
                eprintln!("  {} Please enter a name.", style("!").yellow().bold());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        };
    }

    let name = Password::new().with_prompt("Enter your name").interact()?;
    match state.sessions.resume_session(&name).await {
        Ok(ResumedSession::Found { context, history }) => Ok(Some((context, history))),
        Ok(ResumedSession::NotFound) => {
            eprintln!(
                "  {} No session found for that name. Start a new session instead.",
                style("!").yellow().bold()
            );
            Ok(None)
        }
        Err(ChatError::InvalidName) => {
            eprintln!("  {} Please enter a name.", style("!").yellow().bold());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// What is shown once a session is active: the greeting, then the stored
/// history oldest first.
fn opening_transcript<'a>(
    user_name: &str,
    history: &'a [ChatMessage],
) -> Vec<(MessageRole, Cow<'a, str>)> {
    std::iter::once((MessageRole::Assistant, Cow::Owned(greeting(user_name))))
        .chain(
            history
                .iter()
                .map(|m| (m.role, Cow::Borrowed(m.content.as_str()))),
        )
        .collect()
}

fn print_message(renderer: &ChatRenderer, role: MessageRole, content: Cow<'_, str>) {
    match role {
        MessageRole::Human => println!("  {} {content}", style("You >").green().bold()),
        MessageRole::Assistant => print_tutor(renderer, &content),
    }
}

fn print_tutor(renderer: &ChatRenderer, content: &str) {
    println!();
    println!("  {}", style("Tutor").cyan().bold());
    println!("  {}", renderer.render(content).trim());
    println!();
}
