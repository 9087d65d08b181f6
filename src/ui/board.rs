use html2text::config;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::document::{Document, Element, SectionNode};
use crate::models::Content;
use crate::ui::chrome::HitAreas;

const PREV_LABEL: &str = "‹ Prev";
const NEXT_LABEL: &str = "Next ›";
const TEXT_TOGGLE: &str = " Aa ";
const INFO_TOGGLE: &str = " i ";

/// Lines for one section, wrapped to `width` columns.
pub fn section_lines(document: &Document, section: &SectionNode, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for element in section.blocks.iter().filter_map(|id| document.element(*id)) {
        if element.content.is_empty() {
            continue;
        }
        lines.extend(element_lines(element, width));
        lines.push(Line::default());
    }
    while lines.last().is_some_and(|line| line.width() == 0) {
        lines.pop();
    }
    lines
}

pub fn element_lines(element: &Element, width: usize) -> Vec<Line<'static>> {
    let style = block_style(element);
    let text = match &element.content {
        Content::Markup(markup) => match markup_to_text(markup, width) {
            Ok(text) => return text.lines().map(|line| Line::styled(line.to_string(), style)).collect(),
            Err(err) => {
                tracing::warn!("Falling back to plain text for markup block: {err}");
                element.plain_text()
            }
        },
        Content::Text(text) => text.clone(),
    };

    let mut lines: Vec<Line<'static>> = textwrap::wrap(&text, width)
        .into_iter()
        .map(|line| Line::styled(line.into_owned(), style))
        .collect();
    if element.tag == "a"
        && let Some(href) = element.href.as_deref().filter(|href| *href != "#")
    {
        lines.push(Line::styled(format!("<{href}>"), Style::default().fg(Color::DarkGray)));
    }
    if element.tag == "h1" {
        lines.iter_mut().for_each(|line| line.alignment = Some(Alignment::Center));
    }
    lines
}

fn block_style(element: &Element) -> Style {
    match element.tag.as_str() {
        "h1" => Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
        "h2" | "h3" => Style::default().add_modifier(Modifier::ITALIC),
        "a" => Style::default().add_modifier(Modifier::UNDERLINED).fg(Color::Cyan),
        _ if element.has_class("subtitle") => Style::default().add_modifier(Modifier::ITALIC),
        _ => Style::default(),
    }
}

fn markup_to_text(markup: &str, width: usize) -> eyre::Result<String> {
    let text = config::plain()
        .link_footnotes(false)
        .string_from_read(markup.as_bytes(), width)?;
    Ok(text.trim_end().to_string())
}

/// Width of the reading column inside a body `area_width` columns wide.
pub fn column_width(text_width: usize, area_width: u16) -> u16 {
    (text_width.min(u16::MAX as usize) as u16)
        .min(area_width.saturating_sub(2))
        .max(1)
}

/// Number of lines the active section occupies at `width`.
pub fn content_height(document: &Document, width: usize) -> usize {
    document
        .active_section()
        .map(|(_, section)| section_lines(document, section, width).len())
        .unwrap_or(0)
}

/// Every section as plain text, in document order.
pub fn dump_program(document: &Document, width: usize) -> String {
    let separator = "─".repeat(width.min(40));
    let mut out = String::new();
    for (index, section) in document.sections().iter().enumerate() {
        if index > 0 {
            out.push('\n');
            out.push_str(&separator);
            out.push_str("\n\n");
        }
        for line in section_lines(document, section, width) {
            let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
            out.push_str(text.trim_end());
            out.push('\n');
        }
    }
    out
}

pub struct Board<'a> {
    document: &'a Document,
    text_width: usize,
    show_nav_hints: bool,
}

impl<'a> Board<'a> {
    pub fn new(document: &'a Document, text_width: usize) -> Self {
        Self {
            document,
            text_width,
            show_nav_hints: true,
        }
    }

    pub fn with_nav_hints(mut self, show: bool) -> Self {
        self.show_nav_hints = show;
        self
    }

    /// Whether `area` is large enough to draw anything at all.
    pub fn fits(area: Rect) -> bool {
        area.height >= 3 && area.width >= 10
    }

    /// Draw header, active section and footer. Returns the clickable areas.
    pub fn render(&self, frame: &mut Frame, area: Rect) -> HitAreas {
        let mut areas = HitAreas::default();
        if !Self::fits(area) {
            return areas;
        }
        let header = Rect::new(area.x, area.y, area.width, 1);
        let footer = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        let body = Rect::new(area.x, area.y + 1, area.width, area.height - 2);

        self.render_header(frame, header, &mut areas);
        self.render_body(frame, body);
        self.render_footer(frame, footer, &mut areas);
        areas
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, areas: &mut HitAreas) {
        let controls_width = (TEXT_TOGGLE.len() + INFO_TOGGLE.len()) as u16;
        let label = format!(" ☰ {} ▾ ", self.document.label());
        let label_width = (Line::raw(label.as_str()).width() as u16).min(area.width.saturating_sub(controls_width));
        let label_area = Rect::new(area.x, area.y, label_width, 1);
        frame.render_widget(
            Paragraph::new(Line::styled(label, Style::default().add_modifier(Modifier::BOLD))),
            label_area,
        );
        areas.toc_toggle = Some(label_area);

        let info_area = Rect::new(area.right().saturating_sub(INFO_TOGGLE.len() as u16), area.y, INFO_TOGGLE.len() as u16, 1);
        let text_area = Rect::new(info_area.x.saturating_sub(TEXT_TOGGLE.len() as u16), area.y, TEXT_TOGGLE.len() as u16, 1);
        let toggle_style = Style::default().add_modifier(Modifier::REVERSED);
        frame.render_widget(Paragraph::new(Span::styled(TEXT_TOGGLE, toggle_style)), text_area);
        frame.render_widget(Paragraph::new(Span::styled(INFO_TOGGLE, toggle_style)), info_area);
        areas.text_toggle = Some(text_area);
        areas.info_toggle = Some(info_area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let width = column_width(self.text_width, area.width);
        let column = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);

        let lines = match self.document.active_section() {
            Some((_, section)) => section_lines(self.document, section, width as usize),
            None => vec![Line::styled(
                "This program has no sections.",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )],
        };
        let paragraph = Paragraph::new(lines).scroll((self.document.scroll(), 0));
        frame.render_widget(paragraph, column);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, areas: &mut HitAreas) {
        let button = |label: &'static str, disabled: bool| {
            let style = if disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            Span::styled(label, style)
        };

        let prev_area = Rect::new(area.x, area.y, PREV_LABEL.chars().count() as u16, 1);
        let next_width = NEXT_LABEL.chars().count() as u16;
        let next_area = Rect::new(area.right().saturating_sub(next_width), area.y, next_width, 1);
        frame.render_widget(Paragraph::new(button(PREV_LABEL, self.document.prev_disabled())), prev_area);
        frame.render_widget(Paragraph::new(button(NEXT_LABEL, self.document.next_disabled())), next_area);
        areas.prev_button = Some(prev_area);
        areas.next_button = Some(next_area);

        let total = self.document.sections().len();
        let position = self
            .document
            .active_section()
            .map(|(index, _)| format!("{}/{}", index + 1, total))
            .unwrap_or_default();
        let hint = if self.show_nav_hints {
            format!("{position}  h/l move · t contents · f text · ? help")
        } else {
            position
        };
        let middle = Rect::new(
            prev_area.right() + 1,
            area.y,
            next_area.x.saturating_sub(prev_area.right() + 2),
            1,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Center),
            middle,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    const PAGE: &str = r#"<html><body>
      <span class="toc-label">Table of Contents</span>
      <section class="section" data-section="reading1">
        <h1 data-translate="reading1-title">Genesis 3:8-15</h1>
        <h2 class="subtitle" data-translate="reading1-subtitle">The Fall</h2>
        <div class="reading-text" data-translate="reading1-text"><p>When they heard the sound of the LORD God walking about in the garden.</p><p>Where are you?</p></div>
      </section>
      <section class="section" data-section="feedback">
        <p data-translate="feedback-text">Tell us what you thought.</p>
        <a href="https://example.org/form" data-translate="feedback-link">Provide Feedback</a>
        <p data-translate="empty"></p>
      </section>
    </body></html>"#;

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_section_lines_wrap_to_width() {
        let doc = Document::parse(PAGE).unwrap();
        let lines = section_lines(&doc, &doc.sections()[0], 30);
        let rendered = text(&lines);

        assert_eq!(rendered[0], "Genesis 3:8-15");
        assert_eq!(lines[0].alignment, Some(Alignment::Center));
        assert!(rendered.iter().all(|line| line.chars().count() <= 30));
        assert!(rendered.iter().any(|line| line.contains("Where are you?")));
    }

    #[test]
    fn test_links_show_target_and_empty_blocks_are_skipped() {
        let doc = Document::parse(PAGE).unwrap();
        let rendered = text(&section_lines(&doc, &doc.sections()[1], 60));
        assert_eq!(
            rendered,
            vec![
                "Tell us what you thought.".to_string(),
                String::new(),
                "Provide Feedback".to_string(),
                "<https://example.org/form>".to_string(),
            ]
        );
    }

    #[test]
    fn test_dump_program_covers_every_section() {
        let doc = Document::parse(PAGE).unwrap();
        let dump = dump_program(&doc, 60);
        assert!(dump.contains("Genesis 3:8-15"));
        assert!(dump.contains("Provide Feedback"));
        assert!(dump.contains('─'));
    }

    #[test]
    fn test_render_reports_hit_areas() {
        let mut doc = Document::parse(PAGE).unwrap();
        crate::navigation::NavigationView::render_active_section(&mut doc, 0);
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut areas = HitAreas::default();
        terminal
            .draw(|frame| {
                areas = Board::new(&doc, 64).render(frame, frame.area());
            })
            .unwrap();

        assert_eq!(areas.prev_button.map(|r| r.y), Some(23));
        assert_eq!(areas.toc_toggle.map(|r| r.y), Some(0));
        assert!(areas.text_toggle.is_some());
        assert!(content_height(&doc, 64) > 3);
    }
}
