use std::io;
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use eyre::Result;
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
};
use tracing::debug;

use crate::config::Config;
use crate::models::{FontSize, WindowType};
use crate::settings::{Action, CfgDefaultKeymaps, Keymap, Settings};
use crate::state::PreferenceStore;
use crate::ui::board::{self, Board};
use crate::ui::chrome::{HitAreas, Target};
use crate::ui::windows::help::HelpWindow;
use crate::ui::windows::info::InfoWindow;
use crate::ui::windows::language::LanguageWindow;
use crate::ui::windows::text_controls::{TextControlHit, TextControlsWindow};
use crate::ui::windows::toc::TocWindow;
use crate::viewer::Viewer;

/// Terminal front end around a [`Viewer`].
pub struct App<P: PreferenceStore> {
    viewer: Viewer<P>,
    settings: Settings,
    keymap: Keymap,
    keymap_user_dict: CfgDefaultKeymaps,
    screen: Rect,
    toc_selected: usize,
    language_selected: usize,
    help_scroll: u16,
    info_scroll: u16,
    should_quit: bool,
}

impl<P: PreferenceStore> App<P> {
    pub fn new(viewer: Viewer<P>, config: &Config) -> Self {
        Self {
            viewer,
            settings: config.settings.clone(),
            keymap: config.keymap.clone(),
            keymap_user_dict: config.keymap_user_dict().clone(),
            screen: Rect::new(0, 0, 80, 24),
            toc_selected: 0,
            language_selected: 0,
            help_scroll: 0,
            info_scroll: 0,
            should_quit: false,
        }
    }

    pub fn viewer(&self) -> &Viewer<P> {
        &self.viewer
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop
    pub fn run(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
        if self.settings.mouse_support {
            crossterm::execute!(io::stdout(), crossterm::event::EnableMouseCapture)?;
        }

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;

        let result = self.event_loop(&mut terminal);

        // Restore the terminal even when the loop failed
        terminal.show_cursor()?;
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        )?;
        crossterm::terminal::disable_raw_mode()?;

        result
    }

    fn event_loop<B>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B: Backend,
        B::Error: Send + Sync + 'static,
    {
        while !self.should_quit {
            self.draw(terminal)?;

            if !crossterm::event::poll(Duration::from_millis(250))? {
                continue;
            }
            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Event::Mouse(mouse) if self.settings.mouse_support => self.handle_mouse(mouse),
                Event::Resize(width, height) => {
                    self.screen = Rect::new(0, 0, width, height);
                    self.scroll_by(0);
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn draw<B>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B: Backend,
        B::Error: Send + Sync + 'static,
    {
        let mut areas = HitAreas::default();
        let mut screen = self.screen;
        terminal.draw(|frame| {
            screen = frame.area();
            areas = self.render(frame);
        })?;
        self.screen = screen;
        self.viewer.chrome_mut().set_areas(areas);
        Ok(())
    }

    fn render(&self, frame: &mut Frame) -> HitAreas {
        let area = frame.area();
        let document = self.viewer.document();
        let chrome = self.viewer.chrome();

        let mut areas = Board::new(document, self.text_width())
            .with_nav_hints(self.settings.show_nav_hints)
            .render(frame, area);
        if !Board::fits(area) {
            return areas;
        }

        if chrome.toc.is_open() {
            areas.toc_panel = Some(TocWindow::render(frame, area, document, self.toc_selected));
        }
        if chrome.text_controls.is_open() {
            areas.text_panel = Some(TextControlsWindow::render(
                frame,
                area,
                document,
                self.viewer.active_language_button(),
            ));
        }
        if chrome.info.is_open() {
            areas.info_panel = Some(InfoWindow::render(frame, area, document, self.info_scroll));
        }
        if chrome.help.is_open() {
            HelpWindow::render(frame, area, &self.keymap_user_dict, self.help_scroll);
        }
        if chrome.language.is_open() {
            areas.language_panel =
                Some(LanguageWindow::render(frame, area, document, self.language_selected));
        }
        areas
    }

    fn text_width(&self) -> usize {
        self.settings.text_width(self.viewer.document().font_size())
    }

    fn max_scroll(&self) -> u16 {
        let width = board::column_width(self.text_width(), self.screen.width) as usize;
        let body_height = self.screen.height.saturating_sub(2) as usize;
        let height = board::content_height(self.viewer.document(), width);
        height.saturating_sub(body_height).min(u16::MAX as usize) as u16
    }

    fn scroll_by(&mut self, delta: i32) {
        let current = self.viewer.document().scroll() as i32;
        let target = (current + delta).clamp(0, self.max_scroll() as i32);
        self.viewer.set_scroll(target as u16);
    }

    fn open_toc(&mut self) {
        self.viewer.chrome_mut().toggle_toc();
        self.toc_selected = self.viewer.navigator().current_index().unwrap_or(0);
    }

    fn choose_language(&mut self, index: usize) {
        let Some(code) = self
            .viewer
            .document()
            .language_options()
            .get(index)
            .map(|option| option.code.clone())
        else {
            return;
        };
        if self.viewer.chrome().language.is_open() {
            self.viewer.choose_first_run_language(&code);
        } else {
            self.viewer.set_language(&code);
        }
        self.language_selected = index;
    }

    fn language_count(&self) -> usize {
        self.viewer.document().language_options().len()
    }

    /// Handle keyboard input events
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.viewer.chrome().active_window() {
            WindowType::Language => self.handle_language_keys(key),
            WindowType::Help => self.handle_help_keys(key),
            WindowType::Info => self.handle_info_keys(key),
            WindowType::Toc => self.handle_toc_keys(key),
            WindowType::TextControls => self.handle_text_control_keys(key),
            WindowType::Reader => self.handle_reader_keys(key),
        }
    }

    fn handle_reader_keys(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.viewer.chrome_mut().cancel();
            return;
        }
        let Some(action) = self.keymap.action_for(key.code) else {
            return;
        };
        debug!(?action, "Reader action");
        match action {
            Action::NextSection => {
                self.viewer.next();
            }
            Action::PrevSection => {
                self.viewer.previous();
            }
            Action::FirstSection => {
                self.viewer.first();
            }
            Action::LastSection => {
                self.viewer.last();
            }
            Action::ScrollDown => self.scroll_by(1),
            Action::ScrollUp => self.scroll_by(-1),
            Action::TableOfContents => self.open_toc(),
            Action::TextControls => self.viewer.chrome_mut().toggle_text_controls(),
            Action::Info => {
                self.info_scroll = 0;
                self.viewer.chrome_mut().info.open();
            }
            Action::Help => {
                self.help_scroll = 0;
                self.viewer.chrome_mut().help.open();
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn handle_list_nav(key: &KeyEvent, list_len: usize, index: &mut usize) -> bool {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if list_len > 0 {
                    *index = (*index + 1).min(list_len - 1);
                }
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                *index = index.saturating_sub(1);
                true
            }
            KeyCode::Home | KeyCode::Char('g') => {
                *index = 0;
                true
            }
            KeyCode::End | KeyCode::Char('G') => {
                *index = list_len.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    fn handle_toc_keys(&mut self, key: KeyEvent) {
        let list_len = self.viewer.document().toc_links().len();
        let mut index = self.toc_selected;
        if Self::handle_list_nav(&key, list_len, &mut index) {
            self.toc_selected = index;
            return;
        }
        match key.code {
            KeyCode::Enter => {
                let target = self
                    .viewer
                    .document()
                    .toc_links()
                    .get(self.toc_selected)
                    .map(|link| link.section_id.clone());
                if let Some(section_id) = target {
                    self.viewer.select_toc_entry(&section_id);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Tab => {
                self.viewer.chrome_mut().cancel();
            }
            code if self.keymap.action_for(code) == Some(Action::TableOfContents) => {
                self.viewer.chrome_mut().toc.close();
            }
            _ => {}
        }
    }

    fn handle_text_control_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') => self.viewer.set_font_size(FontSize::Small),
            KeyCode::Char('m') => self.viewer.set_font_size(FontSize::Medium),
            KeyCode::Char('L') => self.viewer.set_font_size(FontSize::Large),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = c as usize - '1' as usize;
                self.choose_language(index);
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.viewer.chrome_mut().cancel();
            }
            code if self.keymap.action_for(code) == Some(Action::TextControls) => {
                self.viewer.chrome_mut().text_controls.close();
            }
            _ => {}
        }
        self.scroll_by(0);
    }

    fn handle_info_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let max = InfoWindow::total_lines(self.viewer.document(), self.screen) as u16;
                self.info_scroll = self.info_scroll.saturating_add(1).min(max.saturating_sub(1));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.info_scroll = self.info_scroll.saturating_sub(1);
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                self.viewer.chrome_mut().cancel();
            }
            code if self.keymap.action_for(code) == Some(Action::Info) => {
                self.viewer.chrome_mut().info.close();
            }
            _ => {}
        }
    }

    fn handle_help_keys(&mut self, key: KeyEvent) {
        let max_offset = HelpWindow::max_scroll_offset(self.screen, &self.keymap_user_dict);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Char('?') => {
                self.viewer.chrome_mut().help.close();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.help_scroll = self.help_scroll.saturating_add(1).min(max_offset);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.help_scroll = self.help_scroll.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// The picker can only be left by choosing a language.
    fn handle_language_keys(&mut self, key: KeyEvent) {
        let list_len = self.language_count();
        let mut index = self.language_selected;
        if Self::handle_list_nav(&key, list_len, &mut index) {
            self.language_selected = index;
            return;
        }
        match key.code {
            KeyCode::Enter => self.choose_language(self.language_selected),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                self.choose_language(c as usize - '1' as usize);
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(position),
            MouseEventKind::ScrollDown => self.handle_wheel(1),
            MouseEventKind::ScrollUp => self.handle_wheel(-1),
            _ => {}
        }
    }

    fn handle_wheel(&mut self, delta: i32) {
        match self.viewer.chrome().active_window() {
            WindowType::Reader => self.scroll_by(delta * 3),
            WindowType::Toc => {
                let len = self.viewer.document().toc_links().len();
                let next = (self.toc_selected as i32 + delta).clamp(0, len.saturating_sub(1) as i32);
                self.toc_selected = next as usize;
            }
            WindowType::Info => {
                let max = InfoWindow::total_lines(self.viewer.document(), self.screen) as i32;
                self.info_scroll = (self.info_scroll as i32 + delta).clamp(0, (max - 1).max(0)) as u16;
            }
            _ => {}
        }
    }

    fn handle_click(&mut self, position: Position) {
        let areas = *self.viewer.chrome().areas();
        let target = self.viewer.chrome_mut().pointer_down(position);
        debug!(?target, x = position.x, y = position.y, "Pointer down");
        match target {
            Target::TocToggle => self.open_toc(),
            Target::TocPanel => {
                let count = self.viewer.document().toc_links().len();
                let hit = areas
                    .toc_panel
                    .and_then(|panel| TocWindow::entry_at(panel, position, self.toc_selected, count));
                let target = hit.and_then(|index| {
                    self.viewer
                        .document()
                        .toc_links()
                        .get(index)
                        .map(|link| link.section_id.clone())
                });
                if let Some(section_id) = target {
                    self.viewer.select_toc_entry(&section_id);
                }
            }
            Target::TextToggle => self.viewer.chrome_mut().toggle_text_controls(),
            Target::TextPanel => {
                let hit = areas
                    .text_panel
                    .and_then(|panel| TextControlsWindow::hit(panel, position, self.language_count()));
                match hit {
                    Some(TextControlHit::Size(size)) => self.viewer.set_font_size(size),
                    Some(TextControlHit::Language(index)) => self.choose_language(index),
                    None => {}
                }
                self.scroll_by(0);
            }
            Target::InfoToggle => {
                self.info_scroll = 0;
                self.viewer.chrome_mut().info.open();
            }
            Target::LanguagePanel => {
                let hit = areas
                    .language_panel
                    .and_then(|panel| LanguageWindow::option_at(panel, position, self.language_count()));
                if let Some(index) = hit {
                    self.choose_language(index);
                }
            }
            Target::PrevButton => {
                self.viewer.previous();
            }
            Target::NextButton => {
                self.viewer.next();
            }
            Target::InfoPanel | Target::Board => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::i18n::LocalizationStore;
    use crate::state::MemoryStore;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app(store: MemoryStore) -> App<MemoryStore> {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("missing.json")).unwrap();
        let mut viewer = Viewer::new(
            Document::bundled().unwrap(),
            LocalizationStore::bundled().unwrap(),
            store,
            &config.settings.product,
        )
        .unwrap();
        viewer.start();
        App::new(viewer, &config)
    }

    fn drawn(mut app: App<MemoryStore>) -> App<MemoryStore> {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        app.draw(&mut terminal).unwrap();
        app
    }

    #[test]
    fn test_first_run_picker_takes_all_keys() {
        let mut app = app(MemoryStore::new());
        assert_eq!(app.viewer().chrome().active_window(), WindowType::Language);

        app.handle_key(key(KeyCode::Char('l')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.viewer().navigator().current_index(), Some(0));
        assert!(app.viewer().chrome().language.is_open());

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.viewer().chrome().language.is_open());
        assert_eq!(app.viewer().preferences().language, "ko");
        assert_eq!(app.viewer().document().label(), "말씀과 성가");
    }

    #[test]
    fn test_reader_navigation_keys() {
        let mut app = app(MemoryStore::with_value("voxSacraLanguage", "en"));
        app.handle_key(key(KeyCode::Char('l')));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.viewer().navigator().current_index(), Some(2));
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(app.viewer().navigator().current_index(), Some(1));
        app.handle_key(key(KeyCode::End));
        assert_eq!(app.viewer().navigator().current_id(), Some("feedback"));
        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.viewer().navigator().current_id(), Some("feedback"));
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_toc_selection_jumps_and_collapses() {
        let mut app = app(MemoryStore::with_value("voxSacraLanguage", "en"));
        app.handle_key(key(KeyCode::Char('t')));
        assert_eq!(app.viewer().chrome().active_window(), WindowType::Toc);
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Char('j')));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.viewer().navigator().current_id(), Some("reading1"));
        assert!(!app.viewer().chrome().toc.is_open());
        assert_eq!(app.viewer().document().label(), "Genesis 3:8–15");
    }

    #[test]
    fn test_text_controls_change_size_and_language() {
        let mut app = app(MemoryStore::with_value("voxSacraLanguage", "en"));
        app.handle_key(key(KeyCode::Char('f')));
        app.handle_key(key(KeyCode::Char('L')));
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(app.viewer().document().font_size(), FontSize::Large);
        assert_eq!(app.viewer().preferences().language, "ko");
        assert_eq!(app.viewer().document().lang(), "ko");
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.viewer().chrome().active_window(), WindowType::Reader);
    }

    #[test]
    fn test_mouse_footer_buttons_and_outside_click() {
        let mut app = drawn(app(MemoryStore::with_value("voxSacraLanguage", "en")));
        app.handle_mouse(click(98, 29));
        assert_eq!(app.viewer().navigator().current_index(), Some(1));
        app.handle_mouse(click(1, 29));
        assert_eq!(app.viewer().navigator().current_index(), Some(0));

        app.handle_mouse(click(1, 0));
        assert!(app.viewer().chrome().toc.is_open());
        let mut app = drawn(app);
        app.handle_mouse(click(50, 28));
        assert!(!app.viewer().chrome().toc.is_open());
    }

    #[test]
    fn test_draw_on_narrow_and_tiny_terminals() {
        let mut app = app(MemoryStore::with_value("voxSacraLanguage", "en"));
        app.handle_key(key(KeyCode::Char('t')));
        assert!(app.viewer().chrome().toc.is_open());

        let mut terminal = Terminal::new(TestBackend::new(20, 10)).unwrap();
        app.draw(&mut terminal).unwrap();
        let panel = app.viewer().chrome().areas().toc_panel.unwrap();
        assert!(panel.right() <= 20 && panel.bottom() <= 10);

        app.handle_key(key(KeyCode::Esc));
        app.handle_key(key(KeyCode::Char('f')));
        for (width, height) in [(8, 2), (12, 3), (10, 4)] {
            let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
            app.draw(&mut terminal).unwrap();
            let panel = app.viewer().chrome().areas().text_panel;
            assert!(panel.is_none_or(|panel| panel.right() <= width && panel.bottom() <= height));
        }
    }

    #[test]
    fn test_mouse_picks_first_run_language() {
        let mut app = drawn(app(MemoryStore::new()));
        let panel = app.viewer().chrome().areas().language_panel.unwrap();
        // Second option sits on the fourth inner row.
        app.handle_mouse(click(panel.x + 3, panel.y + 1 + 3));
        assert!(!app.viewer().chrome().language.is_open());
        assert_eq!(app.viewer().preferences().language, "ko");
    }
}
