use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::models::FontSize;

pub const DEFAULT_PRODUCT: &str = "voxSacra";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Namespace for persisted preferences (`<product>Language`).
    pub product: String,
    pub mouse_support: bool,
    pub show_nav_hints: bool,
    pub text_width_small: usize,
    pub text_width_medium: usize,
    pub text_width_large: usize,
}

impl Settings {
    /// Column width of the reading board for a font size. A larger font
    /// means fewer columns.
    pub fn text_width(&self, size: FontSize) -> usize {
        let width = match size {
            FontSize::Small => self.text_width_small,
            FontSize::Medium => self.text_width_medium,
            FontSize::Large => self.text_width_large,
        };
        width.max(20)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            product: DEFAULT_PRODUCT.to_string(),
            mouse_support: true,
            show_nav_hints: true,
            text_width_small: 96,
            text_width_medium: 80,
            text_width_large: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfgDefaultKeymaps {
    pub next_section: String,
    pub prev_section: String,
    pub first_section: String,
    pub last_section: String,
    pub scroll_down: String,
    pub scroll_up: String,
    pub table_of_contents: String,
    pub text_controls: String,
    pub info: String,
    pub help: String,
    pub quit: String,
}

impl Default for CfgDefaultKeymaps {
    fn default() -> Self {
        Self {
            next_section: "l".to_string(),
            prev_section: "h".to_string(),
            first_section: "g".to_string(),
            last_section: "G".to_string(),
            scroll_down: "j".to_string(),
            scroll_up: "k".to_string(),
            table_of_contents: "t".to_string(),
            text_controls: "f".to_string(),
            info: "i".to_string(),
            help: "?".to_string(),
            quit: "q".to_string(),
        }
    }
}

/// Reader-mode commands a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextSection,
    PrevSection,
    FirstSection,
    LastSection,
    ScrollDown,
    ScrollUp,
    TableOfContents,
    TextControls,
    Info,
    Help,
    Quit,
}

/// Resolved key bindings. User keys from the configuration come first, the
/// built-in keys (arrows, paging, Tab) always work as well.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keymap {
    bindings: Vec<(KeyCode, Action)>,
}

impl Keymap {
    pub fn from_config(user: &CfgDefaultKeymaps) -> Self {
        let mut bindings = Vec::new();
        let user_keys = [
            (&user.next_section, Action::NextSection),
            (&user.prev_section, Action::PrevSection),
            (&user.first_section, Action::FirstSection),
            (&user.last_section, Action::LastSection),
            (&user.scroll_down, Action::ScrollDown),
            (&user.scroll_up, Action::ScrollUp),
            (&user.table_of_contents, Action::TableOfContents),
            (&user.text_controls, Action::TextControls),
            (&user.info, Action::Info),
            (&user.help, Action::Help),
            (&user.quit, Action::Quit),
        ];
        for (key, action) in user_keys {
            match parse_key(key) {
                Some(code) => bindings.push((code, action)),
                None => tracing::warn!(key = key.as_str(), ?action, "Ignoring unparsable key binding"),
            }
        }

        let builtin = [
            (KeyCode::Right, Action::NextSection),
            (KeyCode::Char(' '), Action::NextSection),
            (KeyCode::PageDown, Action::NextSection),
            (KeyCode::Left, Action::PrevSection),
            (KeyCode::PageUp, Action::PrevSection),
            (KeyCode::Home, Action::FirstSection),
            (KeyCode::End, Action::LastSection),
            (KeyCode::Down, Action::ScrollDown),
            (KeyCode::Up, Action::ScrollUp),
            (KeyCode::Tab, Action::TableOfContents),
        ];
        bindings.extend(builtin);
        Self { bindings }
    }

    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == code)
            .map(|(_, action)| *action)
    }
}

/// Parse a key name as written in the configuration file.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match name.to_ascii_lowercase().as_str() {
        "space" => Some(KeyCode::Char(' ')),
        "tab" => Some(KeyCode::Tab),
        "enter" | "return" => Some(KeyCode::Enter),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        _ => None,
    }
}
