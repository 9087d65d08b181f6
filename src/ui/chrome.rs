//! Open/closed state of the dropdowns and modals around the reading board,
//! plus the screen areas they last occupied for pointer hit testing.

use ratatui::layout::{Position, Rect};

use crate::models::WindowType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overlay {
    open: bool,
}

impl Overlay {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// Areas drawn during the last frame. `None` means not on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitAreas {
    pub toc_toggle: Option<Rect>,
    pub toc_panel: Option<Rect>,
    pub text_toggle: Option<Rect>,
    pub text_panel: Option<Rect>,
    pub info_toggle: Option<Rect>,
    pub info_panel: Option<Rect>,
    pub language_panel: Option<Rect>,
    pub prev_button: Option<Rect>,
    pub next_button: Option<Rect>,
}

impl HitAreas {
    fn hit(area: Option<Rect>, position: Position) -> bool {
        area.is_some_and(|rect| rect.contains(position))
    }
}

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    TocToggle,
    TocPanel,
    TextToggle,
    TextPanel,
    InfoToggle,
    InfoPanel,
    LanguagePanel,
    PrevButton,
    NextButton,
    Board,
}

#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub info: Overlay,
    pub language: Overlay,
    pub toc: Overlay,
    pub text_controls: Overlay,
    pub help: Overlay,
    areas: HitAreas,
}

impl Chrome {
    pub fn areas(&self) -> &HitAreas {
        &self.areas
    }

    pub fn set_areas(&mut self, areas: HitAreas) {
        self.areas = areas;
    }

    pub fn toggle_toc(&mut self) {
        self.toc.toggle();
        if self.toc.is_open() {
            self.text_controls.close();
        }
    }

    pub fn toggle_text_controls(&mut self) {
        self.text_controls.toggle();
        if self.text_controls.is_open() {
            self.toc.close();
        }
    }

    /// Resolve a pointer press and close whatever it dismisses. Menus close
    /// when the press lands outside both their toggle and their panel; the
    /// info modal closes on any press outside its panel. While the language
    /// modal is open nothing outside it reacts.
    pub fn pointer_down(&mut self, position: Position) -> Target {
        let areas = self.areas;
        if self.language.is_open() {
            return if HitAreas::hit(areas.language_panel, position) {
                Target::LanguagePanel
            } else {
                Target::Board
            };
        }

        if self.info.is_open() {
            if HitAreas::hit(areas.info_panel, position) {
                return Target::InfoPanel;
            }
            self.info.close();
        }

        let on_toc = HitAreas::hit(areas.toc_toggle, position) || HitAreas::hit(areas.toc_panel, position);
        if self.toc.is_open() && !on_toc {
            self.toc.close();
        }
        let on_text = HitAreas::hit(areas.text_toggle, position) || HitAreas::hit(areas.text_panel, position);
        if self.text_controls.is_open() && !on_text {
            self.text_controls.close();
        }

        let candidates = [
            (areas.toc_panel, Target::TocPanel, self.toc.is_open()),
            (areas.text_panel, Target::TextPanel, self.text_controls.is_open()),
            (areas.toc_toggle, Target::TocToggle, true),
            (areas.text_toggle, Target::TextToggle, true),
            (areas.info_toggle, Target::InfoToggle, true),
            (areas.prev_button, Target::PrevButton, true),
            (areas.next_button, Target::NextButton, true),
        ];
        candidates
            .into_iter()
            .find(|(area, _, live)| *live && HitAreas::hit(*area, position))
            .map(|(_, target, _)| target)
            .unwrap_or(Target::Board)
    }

    /// Esc: close the info modal, help and any open menu. The first-run
    /// language modal stays. Returns whether anything closed.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.info.is_open()
            || self.help.is_open()
            || self.toc.is_open()
            || self.text_controls.is_open();
        self.info.close();
        self.help.close();
        self.toc.close();
        self.text_controls.close();
        was_open
    }

    /// The window receiving keyboard input, top-most first.
    pub fn active_window(&self) -> WindowType {
        if self.language.is_open() {
            WindowType::Language
        } else if self.help.is_open() {
            WindowType::Help
        } else if self.info.is_open() {
            WindowType::Info
        } else if self.toc.is_open() {
            WindowType::Toc
        } else if self.text_controls.is_open() {
            WindowType::TextControls
        } else {
            WindowType::Reader
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome() -> Chrome {
        let mut chrome = Chrome::default();
        chrome.set_areas(HitAreas {
            toc_toggle: Some(Rect::new(0, 0, 30, 1)),
            toc_panel: Some(Rect::new(0, 1, 40, 10)),
            text_toggle: Some(Rect::new(70, 0, 4, 1)),
            text_panel: Some(Rect::new(50, 1, 30, 8)),
            info_toggle: Some(Rect::new(76, 0, 3, 1)),
            info_panel: Some(Rect::new(20, 5, 40, 10)),
            language_panel: Some(Rect::new(25, 8, 30, 6)),
            prev_button: Some(Rect::new(0, 23, 10, 1)),
            next_button: Some(Rect::new(70, 23, 10, 1)),
        });
        chrome
    }

    #[test]
    fn test_overlay_toggle() {
        let mut overlay = Overlay::default();
        assert!(!overlay.is_open());
        overlay.toggle();
        assert!(overlay.is_open());
        overlay.close();
        assert!(!overlay.is_open());
    }

    #[test]
    fn test_menus_are_exclusive() {
        let mut chrome = Chrome::default();
        chrome.toggle_toc();
        chrome.toggle_text_controls();
        assert!(!chrome.toc.is_open());
        assert!(chrome.text_controls.is_open());
    }

    #[test]
    fn test_click_outside_closes_menu() {
        let mut chrome = chrome();
        chrome.toc.open();
        assert_eq!(chrome.pointer_down(Position::new(5, 3)), Target::TocPanel);
        assert!(chrome.toc.is_open());
        assert_eq!(chrome.pointer_down(Position::new(5, 0)), Target::TocToggle);
        assert!(chrome.toc.is_open());
        assert_eq!(chrome.pointer_down(Position::new(60, 20)), Target::Board);
        assert!(!chrome.toc.is_open());
    }

    #[test]
    fn test_click_outside_closes_text_controls() {
        let mut chrome = chrome();
        chrome.toggle_text_controls();
        assert_eq!(chrome.pointer_down(Position::new(60, 4)), Target::TextPanel);
        assert!(chrome.text_controls.is_open());
        assert_eq!(chrome.pointer_down(Position::new(71, 0)), Target::TextToggle);
        assert!(chrome.text_controls.is_open());
        assert_eq!(chrome.pointer_down(Position::new(30, 20)), Target::Board);
        assert!(!chrome.text_controls.is_open());
    }

    #[test]
    fn test_click_outside_closes_info_modal() {
        let mut chrome = chrome();
        chrome.info.open();
        assert_eq!(chrome.pointer_down(Position::new(30, 7)), Target::InfoPanel);
        assert!(chrome.info.is_open());
        chrome.pointer_down(Position::new(1, 20));
        assert!(!chrome.info.is_open());
    }

    #[test]
    fn test_language_modal_ignores_outside_clicks_and_cancel() {
        let mut chrome = chrome();
        chrome.language.open();
        assert_eq!(chrome.pointer_down(Position::new(1, 20)), Target::Board);
        assert!(chrome.language.is_open());
        assert!(!chrome.cancel());
        assert!(chrome.language.is_open());
        assert_eq!(chrome.active_window(), WindowType::Language);
    }

    #[test]
    fn test_cancel_closes_menus_and_info() {
        let mut chrome = chrome();
        chrome.info.open();
        chrome.toc.open();
        assert!(chrome.cancel());
        assert!(!chrome.info.is_open());
        assert!(!chrome.toc.is_open());
        assert_eq!(chrome.active_window(), WindowType::Reader);
    }

    #[test]
    fn test_nav_buttons_hit() {
        let mut chrome = chrome();
        assert_eq!(chrome.pointer_down(Position::new(2, 23)), Target::PrevButton);
        assert_eq!(chrome.pointer_down(Position::new(75, 23)), Target::NextButton);
    }
}
