//! Chat history normalization and the prompt-facing history window

use crate::config::HistoryConfig;
use crate::models::ChatRole;
use crate::models::ChatTurn;
use crate::models::UiMessage;
use crate::models::UiRole;

/// Convert UI messages to model-facing turns.
///
/// Error bubbles are dropped, and a turn that produced a recipe keeps its title
/// so follow-ups like "make it spicier" can be resolved.
#[must_use]
pub fn normalize(messages: &[UiMessage]) -> Vec<ChatTurn> {
    messages
        .iter()
        .filter(|msg| !msg.is_error)
        .map(|msg| {
            let content = match msg.recipe.as_ref().filter(|r| !r.title.is_empty()) {
                Some(recipe) => format!("{}\n\nRecipe: {}", msg.content, recipe.title),
                None => msg.content.clone(),
            };
            let role = match msg.role {
                UiRole::User => ChatRole::Human,
                UiRole::Bot => ChatRole::Ai,
            };
            ChatTurn { role, content }
        })
        .collect()
}

/// How much conversation the prompts get to see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    /// Most recent turns kept, oldest dropped first
    pub max_turns: usize,
    /// Optional cap on the rendered text, applied after `max_turns`
    pub max_chars: Option<usize>,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self {
            max_turns: 6,
            max_chars: None,
        }
    }
}

impl From<&HistoryConfig> for HistoryWindow {
    fn from(config: &HistoryConfig) -> Self {
        Self {
            max_turns: config.max_turns,
            max_chars: config.max_chars,
        }
    }
}

impl HistoryWindow {
    /// The trailing `max_turns` turns, in original order
    #[must_use]
    pub fn select<'a>(&self, turns: &'a [ChatTurn]) -> &'a [ChatTurn] {
        let start = turns.len().saturating_sub(self.max_turns);
        &turns[start..]
    }

    /// Render the window as `"role: content"` lines.
    ///
    /// With `max_chars` set, older lines are dropped until the text fits; a single
    /// remaining line that is still too long keeps only its tail.
    #[must_use]
    pub fn render(&self, turns: &[ChatTurn]) -> String {
        let mut lines: Vec<String> = self
            .select(turns)
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect();

        let Some(limit) = self.max_chars else {
            return lines.join("\n");
        };

        let rendered_len = |lines: &[String]| {
            lines.iter().map(|l| l.chars().count()).sum::<usize>() + lines.len().saturating_sub(1)
        };

        while lines.len() > 1 && rendered_len(&lines) > limit {
            lines.remove(0);
        }

        let text = lines.join("\n");
        let count = text.chars().count();
        if count > limit {
            text.chars().skip(count - limit).collect()
        } else {
            text
        }
    }
}
