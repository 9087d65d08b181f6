use tracing::debug;

use crate::models::ElementId;
use crate::registry::ContentRegistry;

/// Render capabilities the navigation state machine drives after a transition.
pub trait NavigationView {
    fn render_active_section(&mut self, index: usize);
    fn render_toc_highlight(&mut self, section_id: &str);
    fn render_label(&mut self, title: &str);
    fn render_nav_buttons(&mut self, prev_disabled: bool, next_disabled: bool);
    fn scroll_to_top(&mut self);
}

/// Read access to the current text of document elements, used to resolve titles.
pub trait TextSource {
    fn element_text(&self, element: ElementId) -> Option<String>;
}

/// Cursor over the content registry.
///
/// `current` is `None` only when the registry is empty; otherwise it always
/// points at a valid section.
#[derive(Debug, Clone)]
pub struct Navigator {
    registry: ContentRegistry,
    current: Option<usize>,
}

impl Navigator {
    pub fn new(registry: ContentRegistry) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    /// Activate the first section, if any. With an empty registry the
    /// navigation controls are rendered disabled and nothing else happens.
    pub fn initialize<V>(&mut self, view: &mut V)
    where
        V: NavigationView + TextSource,
    {
        if self.registry.is_empty() {
            self.current = None;
            view.render_nav_buttons(true, true);
            return;
        }
        self.go_to(0, view);
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current
            .and_then(|index| self.registry.get(index))
            .map(|section| section.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.current.is_none_or(|index| index == 0)
    }

    pub fn is_last(&self) -> bool {
        self.current
            .is_none_or(|index| index + 1 >= self.registry.len())
    }

    /// Move to `index`. Out-of-range targets leave the state untouched.
    pub fn go_to<V>(&mut self, index: usize, view: &mut V) -> bool
    where
        V: NavigationView + TextSource,
    {
        if index >= self.registry.len() {
            debug!(index, count = self.registry.len(), "Ignoring out-of-range navigation");
            return false;
        }
        self.current = Some(index);
        self.render(view);
        debug!(index, id = self.current_id().unwrap_or_default(), "Section activated");
        true
    }

    /// Move by `delta` sections relative to the current one.
    pub fn step<V>(&mut self, delta: isize, view: &mut V) -> bool
    where
        V: NavigationView + TextSource,
    {
        let Some(current) = self.current else {
            return false;
        };
        match current.checked_add_signed(delta) {
            Some(target) => self.go_to(target, view),
            None => false,
        }
    }

    pub fn next<V>(&mut self, view: &mut V) -> bool
    where
        V: NavigationView + TextSource,
    {
        self.step(1, view)
    }

    pub fn previous<V>(&mut self, view: &mut V) -> bool
    where
        V: NavigationView + TextSource,
    {
        self.step(-1, view)
    }

    /// Jump to the section with the given id. Unknown ids are ignored.
    pub fn go_to_id<V>(&mut self, id: &str, view: &mut V) -> bool
    where
        V: NavigationView + TextSource,
    {
        match self.registry.index_of(id) {
            Some(index) => self.go_to(index, view),
            None => {
                debug!(id, "Ignoring unknown section id");
                false
            }
        }
    }

    /// Re-render the summary label for the active section.
    pub fn refresh_label<V>(&self, view: &mut V)
    where
        V: NavigationView + TextSource,
    {
        if let Some(index) = self.current {
            let title = self.registry.title(index, &*view);
            view.render_label(&title);
        }
    }

    fn render<V>(&self, view: &mut V)
    where
        V: NavigationView + TextSource,
    {
        let Some(index) = self.current else {
            return;
        };
        view.render_active_section(index);
        if let Some(section) = self.registry.get(index) {
            view.render_toc_highlight(&section.id);
        }
        self.refresh_label(view);
        view.render_nav_buttons(index == 0, index + 1 == self.registry.len());
        view.scroll_to_top();
    }
}
