//! The program viewer: one document, its section cursor, its translatable
//! surfaces, and the session preferences, wired together.

use std::sync::OnceLock;

use eyre::Result;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::document::Document;
use crate::i18n::LocalizationStore;
use crate::localize::{self, SurfaceRegistry};
use crate::models::{DisplayPreferences, FontSize};
use crate::navigation::Navigator;
use crate::registry::ContentRegistry;
use crate::state::{PreferenceStore, language_key};
use crate::ui::chrome::Chrome;

/// How the session began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    /// A stored language was found and applied.
    Restored(String),
    /// Nothing stored; the default language is shown and the language
    /// picker is open.
    FirstRun,
}

fn font_class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^font-\w+$").expect("static regex"))
}

pub struct Viewer<P: PreferenceStore> {
    document: Document,
    navigator: Navigator,
    surfaces: SurfaceRegistry,
    translations: LocalizationStore,
    preferences: DisplayPreferences,
    persistence: P,
    language_key: String,
    chrome: Chrome,
    active_language_button: Option<String>,
}

impl<P: PreferenceStore> Viewer<P> {
    /// Scan the document once, then activate its first section.
    pub fn new(
        mut document: Document,
        translations: LocalizationStore,
        persistence: P,
        product: &str,
    ) -> Result<Self> {
        let registry = ContentRegistry::scan(&document)?;
        let surfaces = SurfaceRegistry::scan(&document);
        let mut navigator = Navigator::new(registry);
        navigator.initialize(&mut document);
        debug!(
            sections = navigator.len(),
            surfaces = surfaces.len(),
            "Viewer initialized"
        );

        let preferences = DisplayPreferences {
            font_size: document.font_size(),
            language: translations.default_language().to_string(),
        };

        Ok(Self {
            document,
            navigator,
            surfaces,
            translations,
            preferences,
            persistence,
            language_key: language_key(product),
            chrome: Chrome::default(),
            active_language_button: None,
        })
    }

    /// Restore the stored language, or fall back to the first-run flow.
    /// A storage read failure counts as nothing stored.
    pub fn start(&mut self) -> Startup {
        match self.saved_language() {
            Ok(Some(code)) => {
                let resolved = self.set_language(&code);
                self.active_language_button = Some(resolved.clone());
                info!(language = resolved.as_str(), "Restored stored language");
                Startup::Restored(resolved)
            }
            Ok(None) => self.begin_first_run(),
            Err(err) => {
                warn!("Could not read stored language: {err}");
                self.begin_first_run()
            }
        }
    }

    fn begin_first_run(&mut self) -> Startup {
        let default = self.translations.default_language().to_string();
        self.preferences.language = default.clone();
        self.apply_language(&default);
        self.chrome.language.open();
        info!(language = default.as_str(), "No stored language; asking the reader");
        Startup::FirstRun
    }

    pub fn saved_language(&self) -> Result<Option<String>> {
        self.persistence.load(&self.language_key)
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        self.navigator.go_to(index, &mut self.document)
    }

    pub fn next(&mut self) -> bool {
        self.navigator.next(&mut self.document)
    }

    pub fn previous(&mut self) -> bool {
        self.navigator.previous(&mut self.document)
    }

    pub fn first(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn last(&mut self) -> bool {
        match self.navigator.len() {
            0 => false,
            len => self.go_to(len - 1),
        }
    }

    /// Jump to the section a TOC entry points at and collapse the dropdown.
    /// Unknown ids change nothing, the dropdown included.
    pub fn select_toc_entry(&mut self, section_id: &str) -> bool {
        let moved = self.navigator.go_to_id(section_id, &mut self.document);
        if moved {
            self.chrome.toc.close();
        }
        moved
    }

    /// Rewrite every translatable surface without touching preferences or
    /// storage, then recompute the summary label in the new language.
    pub fn apply_language(&mut self, code: &str) -> String {
        let resolved = localize::apply_language(
            &self.translations,
            code,
            &self.surfaces,
            &mut self.document,
        );
        self.navigator.refresh_label(&mut self.document);
        resolved
    }

    /// Switch language, remember it, and re-render. Unknown codes resolve to
    /// the default language, and the resolved code is what gets stored. A
    /// failed write is logged and otherwise ignored.
    pub fn set_language(&mut self, code: &str) -> String {
        let (resolved, _) = self.translations.resolve(code);
        let resolved = resolved.to_string();
        if !self.translations.contains_language(code) {
            warn!(requested = code, resolved = resolved.as_str(), "Unknown language; using default");
        }

        self.preferences.language = resolved.clone();
        if let Err(err) = self.persistence.save(&self.language_key, &resolved) {
            warn!(key = self.language_key.as_str(), "Could not store language: {err}");
        }

        let missing = self.translations.missing_keys(&resolved);
        if !missing.is_empty() {
            warn!(
                language = resolved.as_str(),
                missing = missing.len(),
                "Dictionary is incomplete; untranslated surfaces keep their text"
            );
        }

        self.apply_language(&resolved);
        self.active_language_button = Some(resolved.clone());
        info!(language = resolved.as_str(), "Language changed");
        resolved
    }

    /// Selection from the first-run picker.
    pub fn choose_first_run_language(&mut self, code: &str) -> String {
        let resolved = self.set_language(code);
        self.chrome.language.close();
        resolved
    }

    /// Swap the font-size body class. Session only.
    pub fn set_font_size(&mut self, size: FontSize) {
        self.document.remove_body_classes_matching(font_class_re());
        if let Some(class) = size.body_class() {
            self.document.add_body_class(class);
        }
        self.preferences.font_size = size;
        debug!(%size, "Font size changed");
    }

    /// Forget the stored language so the next session starts fresh.
    pub fn reset_language(&mut self) -> Result<()> {
        self.persistence.remove(&self.language_key)?;
        info!(key = self.language_key.as_str(), "Stored language removed");
        Ok(())
    }

    pub fn set_scroll(&mut self, scroll: u16) {
        self.document.set_scroll(scroll);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn surfaces(&self) -> &SurfaceRegistry {
        &self.surfaces
    }

    pub fn translations(&self) -> &LocalizationStore {
        &self.translations
    }

    pub fn preferences(&self) -> &DisplayPreferences {
        &self.preferences
    }

    pub fn language_key(&self) -> &str {
        &self.language_key
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn chrome_mut(&mut self) -> &mut Chrome {
        &mut self.chrome
    }

    /// Language button currently marked active, if any.
    pub fn active_language_button(&self) -> Option<&str> {
        self.active_language_button.as_deref()
    }

    pub fn into_persistence(self) -> P {
        self.persistence
    }
}
