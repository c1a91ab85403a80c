use crossterm::event::KeyEvent;
use ratatui::widgets::TableState;
use tui_input::backend::crossterm::EventHandler;

use crate::data::{catalog, CatalogEntry};
use crate::helper::cycle;

/// Search box over the symbol catalog with a live-filtered result table
#[derive(Default)]
pub struct CatalogSearch {
    pub(crate) input: tui_input::Input,
    pub(crate) table: TableState,
    visible: bool,
    options: Vec<CatalogEntry>,
}

impl std::fmt::Debug for CatalogSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSearch")
            .field("visible", &self.visible)
            .field("input", &self.input.value())
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}

impl CatalogSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn query(&self) -> &str {
        self.input.value()
    }

    pub fn options(&self) -> &[CatalogEntry] {
        &self.options
    }

    /// Re-run the filter, e.g. after the catalog finished loading
    pub fn refresh(&mut self, filter: impl Fn(&str) -> Vec<CatalogEntry>) {
        self.options = self.matches(filter);
        if self
            .table
            .selected()
            .is_some_and(|idx| idx >= self.options.len())
        {
            self.table.select(None);
        }
    }

    /// Returns whether the popup closed and the entry picked with Enter
    pub fn handle_key(
        &mut self,
        event: KeyEvent,
        filter: impl Fn(&str) -> Vec<CatalogEntry>,
    ) -> (bool, Option<CatalogEntry>) {
        match event {
            key!(Esc) => {
                self.close();
                return (true, None);
            }
            key!(Enter) => {
                let picked = self
                    .table
                    .selected()
                    .or_else(|| (self.options.len() == 1).then_some(0))
                    .and_then(|idx| self.options.get(idx).cloned());
                if let Some(picked) = picked {
                    self.close();
                    return (true, Some(picked));
                }
            }
            key!(Up) => {
                let idx = cycle::prev_opt(self.table.selected(), self.options.len());
                self.table.select(idx);
            }
            key!(Down) => {
                let idx = cycle::next_opt(self.table.selected(), self.options.len());
                self.table.select(idx);
            }
            _ => {
                let evt = crossterm::event::Event::Key(event);
                if self.input.handle_event(&evt).is_some() {
                    self.table.select(None);
                    self.options = self.matches(filter);
                }
            }
        }
        (false, None)
    }

    /// A query with nothing left after sanitizing shows no results
    fn matches(&self, filter: impl Fn(&str) -> Vec<CatalogEntry>) -> Vec<CatalogEntry> {
        let query = self.input.value();
        if catalog::sanitize_query(query).is_empty() {
            return Vec::new();
        }
        filter(query)
    }

    fn close(&mut self) {
        self.visible = false;
        self.input.reset();
        self.table.select(None);
        self.options.clear();
    }
}
