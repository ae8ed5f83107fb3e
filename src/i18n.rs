use std::collections::HashMap;

/// Keys for every user-visible string the widgets and chrome emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Back,
    Next,
    Complete,
    ThanksTitle,
    ThanksHint,
    SelectPlaceholder,
    WordCount,
    AddItem,
    RemoveItem,
    Item,
    PageOf,
    RankedArea,
    UnrankedArea,
    EmptyRanked,
    EmptyUnranked,
    FilePrompt,
    SignatureHint,
    ClearSignature,
    NoChoices,
}

fn default_message(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Back => "Back",
        MessageKey::Next => "Next",
        MessageKey::Complete => "Complete",
        MessageKey::ThanksTitle => "Thanks!",
        MessageKey::ThanksHint => "Your responses have been recorded.",
        MessageKey::SelectPlaceholder => "Select…",
        MessageKey::WordCount => "{count}/{max} words",
        MessageKey::AddItem => "Add item",
        MessageKey::RemoveItem => "Remove",
        MessageKey::Item => "Item {index}",
        MessageKey::PageOf => "Page {page} of {total}",
        MessageKey::RankedArea => "Ranked",
        MessageKey::UnrankedArea => "Choices",
        MessageKey::EmptyRanked => "Move items here to rank them",
        MessageKey::EmptyUnranked => "All items ranked",
        MessageKey::FilePrompt => "Enter a file path and press Enter",
        MessageKey::SignatureHint => "Arrows draw while pen is down, Space lifts/lowers the pen",
        MessageKey::ClearSignature => "Clear",
        MessageKey::NoChoices => "(no choices)",
    }
}

/// Message lookup with per-instance overrides and `{var}` substitution.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    overrides: HashMap<MessageKey, String>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: HashMap<MessageKey, String>) -> Self {
        Self { overrides }
    }

    pub fn set(&mut self, key: MessageKey, text: impl Into<String>) {
        self.overrides.insert(key, text.into());
    }

    pub fn text(&self, key: MessageKey) -> String {
        self.overrides
            .get(&key)
            .cloned()
            .unwrap_or_else(|| default_message(key).to_string())
    }

    pub fn format(&self, key: MessageKey, vars: &[(&str, String)]) -> String {
        let mut out = self.text(key);
        for (name, value) in vars {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_vars() {
        let t = Translator::new();
        let text = t.format(
            MessageKey::WordCount,
            &[("count", "3".into()), ("max", "10".into())],
        );
        assert_eq!(text, "3/10 words");
    }

    #[test]
    fn overrides_win() {
        let mut t = Translator::new();
        t.set(MessageKey::Next, "Continue");
        assert_eq!(t.text(MessageKey::Next), "Continue");
        assert_eq!(t.text(MessageKey::Back), "Back");
    }
}
