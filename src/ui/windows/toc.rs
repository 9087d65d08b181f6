use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use super::{inner_row, list_offset};
use crate::document::Document;

/// Dropdown listing every TOC link under the header summary.
pub struct TocWindow;

impl TocWindow {
    fn panel(area: Rect, document: &Document) -> Rect {
        let longest = document
            .toc_links()
            .iter()
            .filter_map(|link| document.element(link.element))
            .map(|element| Line::raw(element.plain_text()).width())
            .max()
            .unwrap_or(0) as u16;
        let width = (longest + 6).max(24).min(area.width);
        let height = (document.toc_links().len() as u16 + 2)
            .max(3)
            .min(area.height.saturating_sub(2));
        Rect::new(area.x, area.y + 1, width, height)
    }

    pub fn render(frame: &mut Frame, area: Rect, document: &Document, selected: usize) -> Rect {
        let panel = Self::panel(area, document);
        frame.render_widget(Clear, panel);
        let block = Block::default()
            .title(document.label().to_string())
            .borders(Borders::ALL);

        if document.toc_links().is_empty() {
            let paragraph = Paragraph::new("No table of contents available")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, panel);
            return panel;
        }

        let visible = panel.height.saturating_sub(2) as usize;
        let offset = list_offset(selected, visible);
        let items: Vec<ListItem> = document
            .toc_links()
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, link)| {
                let text = document
                    .element(link.element)
                    .map(|element| element.plain_text())
                    .unwrap_or_else(|| link.section_id.clone());
                let marker = if link.active { "● " } else { "  " };
                let mut style = if i == selected {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };
                if link.active {
                    style = style.add_modifier(Modifier::BOLD);
                }
                ListItem::new(Line::from(format!("{marker}{text}"))).style(style)
            })
            .collect();

        frame.render_widget(List::new(items).block(block), panel);
        panel
    }

    /// TOC entry under `position`, given the panel drawn last frame.
    pub fn entry_at(panel: Rect, position: Position, selected: usize, count: usize) -> Option<usize> {
        let row = inner_row(panel, position)?;
        let index = list_offset(selected, panel.height.saturating_sub(2) as usize) + row;
        (index < count).then_some(index)
    }
}
