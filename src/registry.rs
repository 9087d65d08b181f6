use std::collections::HashMap;

use eyre::{Result, bail};

use crate::document::Document;
use crate::models::ElementId;
use crate::navigation::TextSource;

/// Label used when a section has neither a heading nor a TOC entry.
pub const FALLBACK_TITLE: &str = "Table of Contents";

/// One page of program content. Its position in the registry is its DOM order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub heading: Option<ElementId>,
    pub toc_entry: Option<ElementId>,
}

/// Ordered, immutable list of sections built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    sections: Vec<Section>,
    by_id: HashMap<String, usize>,
}

impl ContentRegistry {
    pub fn from_sections(sections: Vec<Section>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(sections.len());
        for (index, section) in sections.iter().enumerate() {
            if by_id.insert(section.id.clone(), index).is_some() {
                bail!("duplicate section id `{}`", section.id);
            }
        }
        Ok(Self { sections, by_id })
    }

    /// Collect the document's sections in document order, pairing each with
    /// its heading and the TOC entry carrying the same id.
    pub fn scan(document: &Document) -> Result<Self> {
        let sections = document
            .sections()
            .iter()
            .map(|node| Section {
                id: node.id.clone(),
                heading: node.heading,
                toc_entry: document.toc_entry_for(&node.id),
            })
            .collect();
        Self::from_sections(sections)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Display title: heading text, then TOC entry text, then the fallback literal.
    pub fn title<T>(&self, index: usize, source: &T) -> String
    where
        T: TextSource + ?Sized,
    {
        let Some(section) = self.sections.get(index) else {
            return FALLBACK_TITLE.to_string();
        };
        [section.heading, section.toc_entry]
            .into_iter()
            .flatten()
            .filter_map(|element| source.element_text(element))
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string())
    }
}
