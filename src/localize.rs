use tracing::debug;

use crate::document::Document;
use crate::i18n::LocalizationStore;
use crate::models::{ElementId, SurfaceKind};

/// Write access to translatable surfaces.
pub trait SurfaceSink {
    fn set_text(&mut self, element: ElementId, text: &str);
    fn set_markup(&mut self, element: ElementId, markup: &str);
    fn set_link(&mut self, element: ElementId, href: &str);
    fn set_document_language(&mut self, code: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableSurface {
    pub element: ElementId,
    pub key: String,
    pub link_key: Option<String>,
    pub kind: SurfaceKind,
}

/// Every translatable surface of the document, collected once at startup.
#[derive(Debug, Clone, Default)]
pub struct SurfaceRegistry {
    surfaces: Vec<TranslatableSurface>,
}

impl SurfaceRegistry {
    pub fn new(surfaces: Vec<TranslatableSurface>) -> Self {
        Self { surfaces }
    }

    pub fn scan(document: &Document) -> Self {
        let surfaces = document
            .elements()
            .iter()
            .enumerate()
            .filter_map(|(index, element)| {
                let key = element.key.clone()?;
                Some(TranslatableSurface {
                    element: ElementId(index),
                    key,
                    link_key: element.link_key.clone(),
                    kind: element.kind,
                })
            })
            .collect();
        Self { surfaces }
    }

    pub fn surfaces(&self) -> &[TranslatableSurface] {
        &self.surfaces
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// Rewrite every surface from the dictionary for `code` and return the
/// language actually applied. Unknown codes resolve to the default language;
/// keys missing from the dictionary leave their surface untouched.
pub fn apply_language<S>(
    store: &LocalizationStore,
    code: &str,
    surfaces: &SurfaceRegistry,
    sink: &mut S,
) -> String
where
    S: SurfaceSink + ?Sized,
{
    let (resolved, dictionary) = store.resolve(code);
    let mut replaced = 0usize;
    let mut skipped = 0usize;

    for surface in surfaces.surfaces() {
        match dictionary.get(&surface.key) {
            Some(value) => {
                match surface.kind {
                    SurfaceKind::Rich => sink.set_markup(surface.element, value),
                    SurfaceKind::Plain => sink.set_text(surface.element, value),
                }
                replaced += 1;
            }
            None => skipped += 1,
        }
        if let Some(href) = surface
            .link_key
            .as_deref()
            .and_then(|link_key| dictionary.get(link_key))
        {
            sink.set_link(surface.element, href);
        }
    }

    sink.set_document_language(resolved);
    debug!(requested = code, resolved, replaced, skipped, "Applied language");
    resolved.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingSink {
        text: HashMap<usize, String>,
        markup: HashMap<usize, String>,
        links: HashMap<usize, String>,
        lang: Option<String>,
    }

    impl SurfaceSink for RecordingSink {
        fn set_text(&mut self, element: ElementId, text: &str) {
            self.text.insert(element.0, text.to_string());
        }

        fn set_markup(&mut self, element: ElementId, markup: &str) {
            self.markup.insert(element.0, markup.to_string());
        }

        fn set_link(&mut self, element: ElementId, href: &str) {
            self.links.insert(element.0, href.to_string());
        }

        fn set_document_language(&mut self, code: &str) {
            self.lang = Some(code.to_string());
        }
    }

    fn store() -> LocalizationStore {
        LocalizationStore::from_json(
            r#"{
                "default": "en",
                "languages": {
                    "en": {
                        "title": "Reading I",
                        "text": "<p>In the beginning</p>",
                        "feedback-link": "Provide Feedback",
                        "feedback-url": "https://example.org/en"
                    },
                    "ko": { "title": "제 1 독서" }
                }
            }"#,
        )
        .unwrap()
    }

    fn surfaces() -> SurfaceRegistry {
        SurfaceRegistry::new(vec![
            TranslatableSurface {
                element: ElementId(0),
                key: "title".to_string(),
                link_key: None,
                kind: SurfaceKind::Plain,
            },
            TranslatableSurface {
                element: ElementId(1),
                key: "text".to_string(),
                link_key: None,
                kind: SurfaceKind::Rich,
            },
            TranslatableSurface {
                element: ElementId(2),
                key: "feedback-link".to_string(),
                link_key: Some("feedback-url".to_string()),
                kind: SurfaceKind::Plain,
            },
        ])
    }

    #[test]
    fn test_rich_and_plain_surfaces() {
        let mut sink = RecordingSink::default();
        let resolved = apply_language(&store(), "en", &surfaces(), &mut sink);

        assert_eq!(resolved, "en");
        assert_eq!(sink.text.get(&0).map(String::as_str), Some("Reading I"));
        assert_eq!(sink.markup.get(&1).map(String::as_str), Some("<p>In the beginning</p>"));
        assert!(!sink.text.contains_key(&1));
        assert_eq!(sink.links.get(&2).map(String::as_str), Some("https://example.org/en"));
        assert_eq!(sink.lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_partial_language_leaves_missing_surfaces() {
        let mut sink = RecordingSink::default();
        apply_language(&store(), "ko", &surfaces(), &mut sink);

        assert_eq!(sink.text.get(&0).map(String::as_str), Some("제 1 독서"));
        assert!(sink.markup.is_empty());
        assert!(sink.links.is_empty());
        assert_eq!(sink.lang.as_deref(), Some("ko"));
    }

    #[test]
    fn test_unknown_language_matches_default() {
        let mut unknown = RecordingSink::default();
        let mut default = RecordingSink::default();
        let resolved = apply_language(&store(), "xx", &surfaces(), &mut unknown);
        apply_language(&store(), "en", &surfaces(), &mut default);

        assert_eq!(resolved, "en");
        assert_eq!(unknown.text, default.text);
        assert_eq!(unknown.markup, default.markup);
        assert_eq!(unknown.links, default.links);
        assert_eq!(unknown.lang, default.lang);
    }
}
