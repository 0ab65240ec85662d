//! Terminal markdown rendering for tutor replies.
//!
//! Replies are collected in full, then rendered through `termimad`.

use termimad::MadSkin;
use termimad::crossterm::style::Color;

/// Terminal markdown renderer.
pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render a complete markdown reply.
    pub fn render(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_text() {
        let renderer = ChatRenderer::new();
        let out = renderer.render("A **p-value** is a probability.");
        assert!(out.contains("p-value"));
        assert!(out.contains("probability"));
    }
}
