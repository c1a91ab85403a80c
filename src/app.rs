use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::TableState,
    Frame,
};
use tokio_stream::StreamExt;

use crate::data::DetailRecord;
use crate::helper::cycle;
use crate::session::Session;
use crate::views;
use crate::widgets::{CatalogSearch, Terminal};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Popup {
    #[default]
    None,
    Search,
    Help,
}

/// Screen state on top of a session
pub struct App {
    session: Arc<Session>,
    search: CatalogSearch,
    popup: Popup,
    table: TableState,
    catalog_len: usize,
    quit: bool,
}

impl App {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            catalog_len: session.catalog().len(),
            session,
            search: CatalogSearch::new(),
            popup: Popup::None,
            table: TableState::default(),
            quit: false,
        }
    }

    pub fn popup(&self) -> Popup {
        self.popup
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Pick up a catalog that finished loading while the search box is open
    pub fn sync_catalog(&mut self) -> bool {
        let len = self.session.catalog().len();
        if len == self.catalog_len {
            return false;
        }
        self.catalog_len = len;
        if self.search.is_visible() {
            let session = Arc::clone(&self.session);
            self.search.refresh(|query| session.search(query));
        }
        true
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        match self.popup {
            Popup::Search => self.handle_search_key(event),
            Popup::Help => {
                if matches!(event, key!(Esc) | key!('?') | key!('q')) {
                    self.popup = Popup::None;
                }
            }
            Popup::None => match event {
                ctrl!('c') | key!('q') => self.quit = true,
                key!('/') => {
                    self.search.open();
                    self.popup = Popup::Search;
                }
                key!('?') => self.popup = Popup::Help,
                key!(Up) => self.move_selection(cycle::prev),
                key!(Down) => self.move_selection(cycle::next),
                _ => {}
            },
        }
    }

    fn handle_search_key(&mut self, event: KeyEvent) {
        if matches!(event, ctrl!('c')) {
            self.quit = true;
            return;
        }

        let session = Arc::clone(&self.session);
        let (closed, picked) = self.search.handle_key(event, |query| session.search(query));
        if let Some(entry) = picked {
            tracing::info!(symbol = %entry.symbol, "adding symbol from search");
            self.session.add_symbol(entry.symbol);
        }
        if closed {
            self.popup = Popup::None;
        }
    }

    fn move_selection(&mut self, step: fn(Option<usize>, usize) -> Option<usize>) {
        let records = self.session.details().sorted();
        let current = self.selected_index(&records);
        if let Some(record) = step(current, records.len()).and_then(|idx| records.get(idx)) {
            self.session.select(&record.symbol);
        }
    }

    fn selected_index(&self, records: &[Arc<DetailRecord>]) -> Option<usize> {
        let selected = self.session.selected()?;
        records.iter().position(|r| r.symbol == selected.symbol)
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let records = self.session.details().sorted();
        let selected = self.session.selected();
        self.table.select(self.selected_index(&records));

        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(area);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
            .split(rows[0]);

        views::watchlist::render(frame, panes[0], &records, &mut self.table);
        views::detail::render(frame, panes[1], selected.as_deref());
        views::footer::render(frame, rows[1], self.session.watchlist().len(), records.len());

        match self.popup {
            Popup::Search => {
                views::search::render(frame, area, &mut self.search, self.catalog_len);
            }
            Popup::Help => views::help::render(frame, area),
            Popup::None => {}
        }
    }
}

/// Drive the screen until the user quits
pub async fn run(session: Arc<Session>) -> anyhow::Result<()> {
    let mut terminal = Terminal::new()?;
    let mut app = App::new(Arc::clone(&session));
    let mut details = session.details().subscribe();
    let mut watchlist = session.subscribe_watchlist();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut events = EventStream::new();
    let mut dirty = true;

    loop {
        tokio::select! {
            _ = render_tick.tick() => {
                dirty |= app.sync_catalog();
                if dirty {
                    terminal.draw(|frame| app.draw(frame))?;
                    dirty = false;
                }
            }
            Ok(()) = details.changed() => dirty = true,
            Ok(()) = watchlist.changed() => dirty = true,
            Some(event) = events.next() => {
                match event {
                    Ok(Event::Key(event)) => app.handle_key(event),
                    Ok(Event::Resize(..)) => {}
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::error!(error = %err, "failed to read terminal event");
                        return Err(err.into());
                    }
                }
                if app.should_quit() {
                    tracing::info!("quit requested");
                    return Ok(());
                }
                dirty = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CatalogEntry;
    use crate::testing::{MemoryStore, ScriptedApi};
    use ratatui::backend::TestBackend;
    use rust_decimal_macros::dec;

    async fn app_with(symbols: &[&str]) -> (App, Arc<Session>, Arc<ScriptedApi>) {
        let api = Arc::new(ScriptedApi::new());
        api.set_catalog(vec![
            CatalogEntry::new("AAPL", "Apple Inc."),
            CatalogEntry::new("MSFT", "Microsoft Corp."),
            CatalogEntry::new("TSLA", "Tesla Inc."),
        ]);
        api.quote("AAPL", dec!(100), dec!(110));
        api.quote("MSFT", dec!(200), dec!(190));
        api.quote("TSLA", dec!(50), dec!(50));

        let session = Session::new(Arc::new(MemoryStore::new()), api.clone());
        session.load_catalog().await;
        for symbol in symbols {
            session.add_symbol((*symbol).into());
        }
        session.reconcile().await;
        (App::new(Arc::clone(&session)), session, api)
    }

    fn press(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::new(
                crossterm::event::KeyCode::Char(c),
                crossterm::event::KeyModifiers::NONE,
            ));
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = ratatui::Terminal::new(TestBackend::new(100, 24)).expect("terminal");
        terminal.draw(|frame| app.draw(frame)).expect("draw");
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol.as_str()).collect()
    }

    #[tokio::test]
    async fn search_and_add() {
        let (mut app, session, _api) = app_with(&[]).await;

        press(&mut app, "/");
        assert_eq!(app.popup(), Popup::Search);
        press(&mut app, "tesla");
        app.handle_key(key!(Down));
        app.handle_key(key!(Enter));

        assert_eq!(app.popup(), Popup::None);
        assert!(session.watchlist().contains(&"TSLA".into()));
    }

    #[tokio::test]
    async fn arrows_move_through_sorted_records() {
        let (mut app, session, _api) = app_with(&["MSFT", "AAPL"]).await;
        let selected = || session.selected().map(|r| r.symbol.to_string());
        session.select(&"MSFT".into());

        app.handle_key(key!(Up));
        assert_eq!(selected().as_deref(), Some("AAPL"));
        app.handle_key(key!(Up));
        assert_eq!(selected().as_deref(), Some("MSFT"));
        app.handle_key(key!(Down));
        assert_eq!(selected().as_deref(), Some("AAPL"));
    }

    #[tokio::test]
    async fn help_and_quit() {
        let (mut app, _session, _api) = app_with(&[]).await;
        press(&mut app, "?");
        assert_eq!(app.popup(), Popup::Help);
        press(&mut app, "q");
        assert_eq!(app.popup(), Popup::None);
        assert!(!app.should_quit());

        press(&mut app, "q");
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn typing_q_in_search_does_not_quit() {
        let (mut app, _session, _api) = app_with(&[]).await;
        press(&mut app, "/q");
        assert!(!app.should_quit());
        assert_eq!(app.search.query(), "q");
        app.handle_key(key!(Esc));
        assert_eq!(app.popup(), Popup::None);
    }

    #[tokio::test]
    async fn renders_watchlist_and_detail() {
        let (mut app, session, _api) = app_with(&["MSFT", "AAPL"]).await;
        session.select(&"MSFT".into());
        let text = screen(&mut app);

        assert!(text.contains("AAPL"));
        assert!(text.contains("110.00"));
        assert!(text.contains("+10.00%"));
        assert!(text.contains("-5.00%"));
        assert!(text.contains("MSFT Corp"));
        assert!(text.contains("OPEN"));
        assert!(text.contains("VOLUME"));
    }

    #[tokio::test]
    async fn renders_search_prompt() {
        let (mut app, _session, _api) = app_with(&[]).await;
        assert!(screen(&mut app).contains("No stocks watched yet."));

        press(&mut app, "/");
        assert!(screen(&mut app).contains(views::search::PROMPT));
    }
}
