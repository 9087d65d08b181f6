use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::inner_row;
use crate::document::Document;
use crate::models::Region;

/// First-run language picker. Closes only through a selection.
pub struct LanguageWindow;

impl LanguageWindow {
    fn text(document: &Document, key: &str) -> String {
        document
            .region_elements(Region::LanguageModal)
            .find(|element| element.key.as_deref() == Some(key))
            .map(|element| element.plain_text())
            .unwrap_or_default()
    }

    /// Rows above the option list: prompt line and a blank spacer.
    const HEADER_ROWS: usize = 2;

    fn panel(area: Rect, document: &Document) -> Rect {
        let width = 44.min(area.width);
        let height = (document.language_options().len() + Self::HEADER_ROWS + 2) as u16;
        let height = height.min(area.height);
        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }

    pub fn render(frame: &mut Frame, area: Rect, document: &Document, selected: usize) -> Rect {
        let panel = Self::panel(area, document);
        frame.render_widget(Clear, panel);

        let mut lines = vec![Line::raw(Self::text(document, "language-modal-text")), Line::default()];
        for (i, option) in document.language_options().iter().enumerate() {
            let text = format!("  {}  {}", i + 1, option.label);
            let style = if i == selected {
                Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            lines.push(Line::styled(text, style));
        }

        let block = Block::default()
            .title(format!(" {} ", Self::text(document, "language-modal-title")))
            .borders(Borders::ALL);
        frame.render_widget(Paragraph::new(lines).block(block), panel);
        panel
    }

    /// Language option under `position`, given the panel drawn last frame.
    pub fn option_at(panel: Rect, position: Position, count: usize) -> Option<usize> {
        let row = inner_row(panel, position)?;
        let index = row.checked_sub(Self::HEADER_ROWS)?;
        (index < count).then_some(index)
    }
}
