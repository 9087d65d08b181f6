//! In-memory host document.
//!
//! The program markup is parsed once with `scraper` into an owned tree of
//! addressable elements. The navigation state machine and the localization
//! applier write into it through [`NavigationView`] and [`SurfaceSink`]; the
//! terminal front end only ever reads from it.

use std::collections::HashMap;
use std::fs;
use std::hash::Hash;
use std::path::Path;
use std::sync::OnceLock;

use eyre::{Result, WrapErr, eyre};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::localize::SurfaceSink;
use crate::models::{Content, ElementId, FontSize, LanguageOption, Region, SurfaceKind};
use crate::navigation::{NavigationView, TextSource};
use crate::registry::FALLBACK_TITLE;

/// Program markup bundled with the binary.
pub const BUNDLED_PROGRAM: &str = include_str!("../assets/program.html");

/// Classes marking surfaces that receive markup instead of plain text.
const RICH_CLASSES: &[&str] = &["reading-text", "carol-text", "info-mission"];

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub key: Option<String>,
    pub link_key: Option<String>,
    pub kind: SurfaceKind,
    pub content: Content,
    pub href: Option<String>,
    pub region: Region,
}

impl Element {
    /// Content flattened to a single line of text.
    pub fn plain_text(&self) -> String {
        match &self.content {
            Content::Text(text) => normalize_whitespace(text),
            Content::Markup(markup) => {
                let fragment = Html::parse_fragment(markup);
                normalize_whitespace(&fragment.root_element().text().collect::<String>())
            }
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionNode {
    pub id: String,
    pub heading: Option<ElementId>,
    pub blocks: Vec<ElementId>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TocLink {
    pub section_id: String,
    pub element: ElementId,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    lang: String,
    body_classes: Vec<String>,
    elements: Vec<Element>,
    sections: Vec<SectionNode>,
    toc_links: Vec<TocLink>,
    toc_label: Option<ElementId>,
    label: String,
    language_options: Vec<LanguageOption>,
    prev_disabled: bool,
    next_disabled: bool,
    scroll: u16,
}

struct Builder<K> {
    elements: Vec<Element>,
    seen: HashMap<K, ElementId>,
    translate: Selector,
}

impl<K: Hash + Eq + Copy> Builder<K> {
    fn register(&mut self, node: K, element: ElementRef<'_>, region: Region) -> ElementId {
        if let Some(id) = self.seen.get(&node) {
            return *id;
        }
        let value = element.value();
        let classes: Vec<String> = value.classes().map(str::to_string).collect();
        let kind = if classes.iter().any(|c| RICH_CLASSES.contains(&c.as_str())) {
            SurfaceKind::Rich
        } else {
            SurfaceKind::Plain
        };
        let key = value.attr("data-translate").map(str::to_string);
        let has_child_elements = element.children().any(|child| child.value().is_element());
        let content = if kind == SurfaceKind::Rich || (key.is_none() && has_child_elements) {
            Content::Markup(element.inner_html().trim().to_string())
        } else {
            Content::Text(normalize_whitespace(&element.text().collect::<String>()))
        };

        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            tag: value.name().to_string(),
            classes,
            key,
            link_key: value.attr("data-translate-url").map(str::to_string),
            kind,
            content,
            href: value.attr("href").map(str::to_string),
            region,
        });
        self.seen.insert(node, id);
        id
    }

    /// Register the block-level children of a section. Wrappers holding
    /// translatable descendants are flattened so every keyed surface renders
    /// as its own block.
    fn collect_blocks<F>(&mut self, parent: ElementRef<'_>, region: Region, node_of: &F, out: &mut Vec<ElementId>)
    where
        F: Fn(&ElementRef<'_>) -> K,
    {
        for child in parent.children().filter_map(ElementRef::wrap) {
            let keyed = child.value().attr("data-translate").is_some();
            let wraps_keyed = child.select(&self.translate).next().is_some();
            if !keyed && wraps_keyed {
                self.collect_blocks(child, region, node_of, out);
            } else {
                out.push(self.register(node_of(&child), child, region));
            }
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| eyre!("invalid selector `{css}`: {err:?}"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn normalize_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text.trim(), " ").into_owned()
}

fn region_for(element: &ElementRef<'_>) -> Region {
    for ancestor in element.ancestors().filter_map(ElementRef::wrap) {
        match ancestor.value().id() {
            Some("infoModal") => return Region::InfoModal,
            Some("languageModal") => return Region::LanguageModal,
            Some("textControlMenu") => return Region::TextControls,
            Some("tocDropdown") => return Region::Toc,
            _ => {}
        }
    }
    Region::Other
}

impl Document {
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        let section_sel = selector(".section[data-section]")?;
        let heading_sel = selector("h1")?;
        let toc_label_sel = selector(".toc-label")?;
        let toc_link_sel = selector(".toc-link[data-section]")?;
        let translate_sel = selector("[data-translate]")?;
        let body_sel = selector("body")?;
        let language_sel = selector(".language-option-btn[data-lang], .language-btn[data-lang]")?;

        let mut builder = Builder {
            elements: Vec::new(),
            seen: HashMap::new(),
            translate: translate_sel.clone(),
        };
        let node_of = |element: &ElementRef<'_>| element.id();

        let mut sections = Vec::new();
        for (index, section) in html.select(&section_sel).enumerate() {
            let Some(id) = section.value().attr("data-section") else {
                continue;
            };
            let region = Region::Section(index);
            let mut blocks = Vec::new();
            builder.collect_blocks(section, region, &node_of, &mut blocks);
            let heading = section
                .select(&heading_sel)
                .next()
                .map(|h1| builder.register(h1.id(), h1, region));
            sections.push(SectionNode {
                id: id.to_string(),
                heading,
                blocks,
                active: false,
            });
        }

        let toc_label = html
            .select(&toc_label_sel)
            .next()
            .map(|label| builder.register(label.id(), label, Region::TocLabel));

        let mut toc_links = Vec::new();
        for link in html.select(&toc_link_sel) {
            if let Some(section_id) = link.value().attr("data-section") {
                let element = builder.register(link.id(), link, Region::Toc);
                toc_links.push(TocLink {
                    section_id: section_id.to_string(),
                    element,
                    active: false,
                });
            }
        }

        for element in html.select(&translate_sel) {
            builder.register(element.id(), element, region_for(&element));
        }

        let mut language_options: Vec<LanguageOption> = Vec::new();
        for button in html.select(&language_sel) {
            let Some(code) = button.value().attr("data-lang") else {
                continue;
            };
            if language_options.iter().any(|option| option.code == code) {
                continue;
            }
            language_options.push(LanguageOption {
                code: code.to_string(),
                label: normalize_whitespace(&button.text().collect::<String>()),
            });
        }

        let lang = html
            .root_element()
            .value()
            .attr("lang")
            .unwrap_or_default()
            .to_string();
        let body_classes = html
            .select(&body_sel)
            .next()
            .map(|body| body.value().classes().map(str::to_string).collect())
            .unwrap_or_default();

        let mut document = Self {
            lang,
            body_classes,
            elements: builder.elements,
            sections,
            toc_links,
            toc_label,
            label: String::new(),
            language_options,
            prev_disabled: true,
            next_disabled: true,
            scroll: 0,
        };
        document.label = document
            .toc_label
            .map(|id| document.elements[id.0].plain_text())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());
        Ok(document)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let html = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read program from {}", path.display()))?;
        Self::parse(&html)
    }

    pub fn bundled() -> Result<Self> {
        Self::parse(BUNDLED_PROGRAM)
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn sections(&self) -> &[SectionNode] {
        &self.sections
    }

    pub fn active_section(&self) -> Option<(usize, &SectionNode)> {
        self.sections
            .iter()
            .enumerate()
            .find(|(_, section)| section.active)
    }

    pub fn toc_links(&self) -> &[TocLink] {
        &self.toc_links
    }

    pub fn toc_entry_for(&self, section_id: &str) -> Option<ElementId> {
        self.toc_links
            .iter()
            .find(|link| link.section_id == section_id)
            .map(|link| link.element)
    }

    /// Text currently shown on the table-of-contents summary.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn language_options(&self) -> &[LanguageOption] {
        &self.language_options
    }

    pub fn prev_disabled(&self) -> bool {
        self.prev_disabled
    }

    pub fn next_disabled(&self) -> bool {
        self.next_disabled
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: u16) {
        self.scroll = scroll;
    }

    pub fn body_classes(&self) -> &[String] {
        &self.body_classes
    }

    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.iter().any(|c| c == class)
    }

    pub fn add_body_class(&mut self, class: &str) {
        if !self.has_body_class(class) {
            self.body_classes.push(class.to_string());
        }
    }

    pub fn remove_body_classes_matching(&mut self, pattern: &Regex) {
        self.body_classes.retain(|class| !pattern.is_match(class));
    }

    /// Font size implied by the body classes.
    pub fn font_size(&self) -> FontSize {
        self.body_classes
            .iter()
            .find_map(|class| FontSize::from_body_class(class))
            .unwrap_or_default()
    }

    /// Elements belonging to a chrome region, in registration order.
    pub fn region_elements(&self, region: Region) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |element| element.region == region)
    }

    /// First element carrying `key`, wherever it lives.
    pub fn element_by_key(&self, key: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|element| element.key.as_deref() == Some(key))
    }
}

impl TextSource for Document {
    fn element_text(&self, element: ElementId) -> Option<String> {
        self.element(element).map(Element::plain_text)
    }
}

impl NavigationView for Document {
    fn render_active_section(&mut self, index: usize) {
        for (i, section) in self.sections.iter_mut().enumerate() {
            section.active = i == index;
        }
    }

    fn render_toc_highlight(&mut self, section_id: &str) {
        for link in &mut self.toc_links {
            link.active = link.section_id == section_id;
        }
    }

    fn render_label(&mut self, title: &str) {
        self.label = title.to_string();
        if let Some(id) = self.toc_label {
            self.elements[id.0].content = Content::Text(title.to_string());
        }
    }

    fn render_nav_buttons(&mut self, prev_disabled: bool, next_disabled: bool) {
        self.prev_disabled = prev_disabled;
        self.next_disabled = next_disabled;
    }

    fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }
}

impl SurfaceSink for Document {
    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(element.0) {
            element.content = Content::Text(text.to_string());
        }
    }

    fn set_markup(&mut self, element: ElementId, markup: &str) {
        if let Some(element) = self.elements.get_mut(element.0) {
            element.content = Content::Markup(markup.to_string());
        }
    }

    fn set_link(&mut self, element: ElementId, href: &str) {
        if let Some(element) = self.elements.get_mut(element.0) {
            element.href = Some(href.to_string());
        }
    }

    fn set_document_language(&mut self, code: &str) {
        self.lang = code.to_string();
    }
}
