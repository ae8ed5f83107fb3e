use ratatui::style::Color;

/// Built-in presets. A fixed catalog, not a theming system: each preset is
/// just an accent palette over the terminal's own colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Modern,
    Business,
    School,
    Fashion,
    Cyber,
}

impl Theme {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "business" => Theme::Business,
            "school" => Theme::School,
            "fashion" => Theme::Fashion,
            "cyber" => Theme::Cyber,
            _ => Theme::Modern,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Modern => Palette {
                accent: Color::Cyan,
                muted: Color::DarkGray,
                error: Color::Red,
                chrome: Color::Blue,
            },
            Theme::Business => Palette {
                accent: Color::Blue,
                muted: Color::Gray,
                error: Color::Red,
                chrome: Color::DarkGray,
            },
            Theme::School => Palette {
                accent: Color::Green,
                muted: Color::DarkGray,
                error: Color::LightRed,
                chrome: Color::Green,
            },
            Theme::Fashion => Palette {
                accent: Color::Magenta,
                muted: Color::DarkGray,
                error: Color::LightRed,
                chrome: Color::Magenta,
            },
            Theme::Cyber => Palette {
                accent: Color::LightGreen,
                muted: Color::DarkGray,
                error: Color::LightMagenta,
                chrome: Color::LightGreen,
            },
        }
    }
}

/// Resolved colors handed to the widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub chrome: Color,
}
