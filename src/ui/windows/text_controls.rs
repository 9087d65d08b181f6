use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::inner_row;
use crate::document::Document;
use crate::models::{FontSize, Region};

const SIZE_CELL: u16 = 4;

/// Something inside the text-control menu a press can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextControlHit {
    Size(FontSize),
    Language(usize),
}

/// Font size and language menu anchored under the "Aa" toggle.
pub struct TextControlsWindow;

impl TextControlsWindow {
    fn label(document: &Document, key: &str, fallback: &str) -> String {
        document
            .region_elements(Region::TextControls)
            .find(|element| element.key.as_deref() == Some(key))
            .map(|element| element.plain_text())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    fn panel(area: Rect, document: &Document) -> Rect {
        let width = 28.min(area.width);
        let height = (document.language_options().len() as u16 + 5).min(area.height.saturating_sub(1));
        Rect::new(area.right().saturating_sub(width), area.y + 1, width, height)
    }

    pub fn render(
        frame: &mut Frame,
        area: Rect,
        document: &Document,
        active_language: Option<&str>,
    ) -> Rect {
        let panel = Self::panel(area, document);
        frame.render_widget(Clear, panel);

        let selected = Style::default().bg(Color::Blue).fg(Color::White);
        let heading = Style::default().add_modifier(Modifier::BOLD);
        let current = document.font_size();

        let sizes: Vec<Span> = FontSize::ALL
            .iter()
            .map(|size| {
                let letter = size.as_str()[..1].to_ascii_uppercase();
                let cell = format!("[{letter}] ");
                if *size == current {
                    Span::styled(cell, selected)
                } else {
                    Span::raw(cell)
                }
            })
            .collect();

        let mut lines = vec![
            Line::styled(Self::label(document, "font-size-label", "Font Size"), heading),
            Line::from(sizes),
            Line::styled(Self::label(document, "language-label", "Language"), heading),
        ];
        for (i, option) in document.language_options().iter().enumerate() {
            let text = format!("{} {}", i + 1, option.label);
            if active_language == Some(option.code.as_str()) {
                lines.push(Line::styled(text, selected));
            } else {
                lines.push(Line::raw(text));
            }
        }

        let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, panel);
        panel
    }

    /// Resolve a press inside the panel drawn last frame.
    pub fn hit(panel: Rect, position: Position, language_count: usize) -> Option<TextControlHit> {
        match inner_row(panel, position)? {
            1 => {
                let column = position.x.saturating_sub(panel.x + 1) / SIZE_CELL;
                FontSize::ALL.get(column as usize).copied().map(TextControlHit::Size)
            }
            row if row >= 3 && row - 3 < language_count => Some(TextControlHit::Language(row - 3)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_sizes_and_languages() {
        let panel = Rect::new(50, 1, 28, 7);
        assert_eq!(
            TextControlsWindow::hit(panel, Position::new(51, 3), 2),
            Some(TextControlHit::Size(FontSize::Small))
        );
        assert_eq!(
            TextControlsWindow::hit(panel, Position::new(59, 3), 2),
            Some(TextControlHit::Size(FontSize::Large))
        );
        assert_eq!(
            TextControlsWindow::hit(panel, Position::new(52, 6), 2),
            Some(TextControlHit::Language(1))
        );
        assert_eq!(TextControlsWindow::hit(panel, Position::new(52, 2), 2), None);
        assert_eq!(TextControlsWindow::hit(panel, Position::new(70, 3), 2), None);
    }
}
