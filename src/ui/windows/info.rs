use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered_popup_area;
use crate::document::Document;
use crate::models::Region;
use crate::ui::board::element_lines;

/// About-the-ensemble modal.
pub struct InfoWindow;

impl InfoWindow {
    fn lines(document: &Document, width: usize) -> (String, Vec<Line<'static>>) {
        let mut title = String::new();
        let mut lines = Vec::new();
        for element in document.region_elements(Region::InfoModal) {
            if element.key.as_deref() == Some("info-title") {
                title = element.plain_text();
                continue;
            }
            if element.content.is_empty() {
                continue;
            }
            lines.extend(element_lines(element, width));
            lines.push(Line::default());
        }
        lines.pop();
        (title, lines)
    }

    pub fn total_lines(document: &Document, area: Rect) -> usize {
        let panel = centered_popup_area(area, 70, 70);
        Self::lines(document, panel.width.saturating_sub(4) as usize).1.len()
    }

    pub fn render(frame: &mut Frame, area: Rect, document: &Document, scroll_offset: u16) -> Rect {
        let panel = centered_popup_area(area, 70, 70);
        frame.render_widget(Clear, panel);

        let (title, lines) = Self::lines(document, panel.width.saturating_sub(4).max(1) as usize);
        let block = Block::default()
            .title(format!(" {title} "))
            .title_bottom(" Esc close ")
            .borders(Borders::ALL);
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let body = Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), inner.height);
        frame.render_widget(Paragraph::new(lines).scroll((scroll_offset, 0)), body);
        panel
    }
}
