use std::collections::HashMap;
use std::time::Duration;

use crate::i18n::MessageKey;
use crate::presentation::Theme;

#[derive(Debug, Clone)]
pub struct UiOptions {
    /// Idle redraw cadence; also bounds how quickly external model changes
    /// show up when no input arrives.
    pub tick_rate: Duration,
    /// Page-transition animation toggle.
    pub animate: bool,
    pub animation_duration: Duration,
    pub theme: Theme,
    /// Per-instance overrides for the built-in strings.
    pub messages: HashMap<MessageKey, String>,
    pub show_help: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            animate: true,
            animation_duration: Duration::from_millis(180),
            theme: Theme::default(),
            messages: HashMap::new(),
            show_help: true,
        }
    }
}
