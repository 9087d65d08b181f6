use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::settings::CfgDefaultKeymaps;

pub struct HelpWindow;

impl HelpWindow {
    /// Help text with the user's own key bindings filled in.
    pub fn help_lines(keys: &CfgDefaultKeymaps) -> Vec<String> {
        let row = |key: String, what: &str| format!("   {key:<18}{what}");
        vec![
            " Reading:".to_string(),
            row(format!("{} / Right / Space", keys.next_section), "Next Section"),
            row(format!("{} / Left", keys.prev_section), "Previous Section"),
            row(format!("{} / Home", keys.first_section), "First Section"),
            row(format!("{} / End", keys.last_section), "Last Section"),
            row(format!("{} / Down", keys.scroll_down), "Scroll Down"),
            row(format!("{} / Up", keys.scroll_up), "Scroll Up"),
            String::new(),
            " Menus:".to_string(),
            row(format!("{} / Tab", keys.table_of_contents), "Table Of Contents"),
            row(keys.text_controls.clone(), "Font Size & Language"),
            row(keys.info.clone(), "About"),
            row(keys.help.clone(), "Help"),
            row(keys.quit.clone(), "Quit"),
            String::new(),
            " Inside Menus:".to_string(),
            row("j / k".to_string(), "Move Selection"),
            row("Enter".to_string(), "Choose"),
            row("s / m / L".to_string(), "Small / Medium / Large Text"),
            row("1-9".to_string(), "Pick Language"),
            row("Esc".to_string(), "Close"),
        ]
    }

    pub fn max_scroll_offset(area: Rect, keys: &CfgDefaultKeymaps) -> u16 {
        let total = Self::help_lines(keys).len() as u16 + 2;
        total.saturating_sub(area.height)
    }

    pub fn render(frame: &mut Frame, area: Rect, keys: &CfgDefaultKeymaps, scroll_offset: u16) {
        let help_content: Vec<Line> = Self::help_lines(keys).into_iter().map(Line::from).collect();

        let max_width = help_content.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (max_width + 4).min(area.width);
        let height = (help_content.len() as u16 + 2).min(area.height);

        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let help_paragraph = Paragraph::new(help_content)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .scroll((scroll_offset, 0));

        frame.render_widget(help_paragraph, popup_area);
    }
}
