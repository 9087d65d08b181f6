use std::fmt;
use std::str::FromStr;

/// Index of an element in the host document, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// How a translatable surface accepts new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceKind {
    /// Plain-text replacement; markup in the value is shown literally.
    #[default]
    Plain,
    /// Markup injection (reading/hymn text, mission statement).
    Rich,
}

/// Current content of a document element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Markup(String),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl Content {
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(text) | Content::Markup(text) => text.trim().is_empty(),
        }
    }
}

/// Part of the page an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    Section(usize),
    Toc,
    TocLabel,
    InfoModal,
    LanguageModal,
    TextControls,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub const ALL: [FontSize; 3] = [FontSize::Small, FontSize::Medium, FontSize::Large];

    /// Body class carried for this size. Medium is the unmarked default.
    pub fn body_class(self) -> Option<&'static str> {
        match self {
            FontSize::Small => Some("font-small"),
            FontSize::Medium => None,
            FontSize::Large => Some("font-large"),
        }
    }

    pub fn from_body_class(class: &str) -> Option<Self> {
        match class {
            "font-small" => Some(FontSize::Small),
            "font-large" => Some(FontSize::Large),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontSize {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            other => Err(eyre::eyre!("unknown font size: {other}")),
        }
    }
}

/// Session display preferences. Only `language` is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPreferences {
    pub font_size: FontSize,
    pub language: String,
}

impl DisplayPreferences {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            font_size: FontSize::default(),
            language: language.into(),
        }
    }
}

/// A language choice offered by the first-run overlay or the text-control menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOption {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WindowType {
    #[default]
    Reader,
    Help,
    Toc,
    TextControls,
    Info,
    Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_default_is_medium() {
        assert_eq!(FontSize::default(), FontSize::Medium);
        assert_eq!(FontSize::Medium.body_class(), None);
    }

    #[test]
    fn test_font_size_body_class_round_trip() {
        for size in [FontSize::Small, FontSize::Large] {
            let class = size.body_class().unwrap();
            assert_eq!(FontSize::from_body_class(class), Some(size));
        }
        assert_eq!(FontSize::from_body_class("font-huge"), None);
    }

    #[test]
    fn test_font_size_parse() {
        assert_eq!("Large".parse::<FontSize>().unwrap(), FontSize::Large);
        assert_eq!(" small ".parse::<FontSize>().unwrap(), FontSize::Small);
        assert!("giant".parse::<FontSize>().is_err());
    }

    #[test]
    fn test_content_is_empty() {
        assert!(Content::Text("   ".to_string()).is_empty());
        assert!(!Content::Markup("<p>x</p>".to_string()).is_empty());
    }

    #[test]
    fn test_window_type_default() {
        assert_eq!(WindowType::default(), WindowType::Reader);
    }
}
