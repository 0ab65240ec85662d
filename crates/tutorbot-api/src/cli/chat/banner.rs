//! Welcome banner display for chat sessions.

use console::style;

/// Print the banner shown before session selection.
pub fn print_welcome_banner(subject: &str, provider: &str, model: &str) {
    println!();
    println!(
        "  {} {}",
        style("*").cyan().bold(),
        style(format!("{subject} Tutor")).cyan().bold()
    );
    println!(
        "  {}",
        style(format!("Ask me anything about {subject}.")).dim()
    );
    println!();
    println!(
        "  {}  {} / {}",
        style("Model:").bold(),
        style(provider).dim(),
        style(model).dim()
    );
    println!();
}

/// Print the session line and exit hint once a session is active.
pub fn print_session_header(session_id: &str) {
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!("  {}", style("Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
