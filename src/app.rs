use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::api::Catalog;
use crate::event::Event;
use crate::fetch::{CatalogState, PendingBatch, Viewport};
use crate::types::CatalogEntry;

pub const CARD_WIDTH: u16 = 22;
pub const CARD_HEIGHT: u16 = 5;
// header(1) + search box(3) + grid borders(2) + status bar(1)
const CHROME_ROWS: u16 = 7;

/// How many cards fit on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub visible_rows: usize,
}

impl GridLayout {
    pub fn for_terminal(width: u16, height: u16) -> Self {
        Self {
            columns: (width.saturating_sub(2) / CARD_WIDTH).max(1) as usize,
            visible_rows: (height.saturating_sub(CHROME_ROWS) / CARD_HEIGHT).max(1) as usize,
        }
    }

    pub fn rows_for(&self, count: usize) -> usize {
        count.div_ceil(self.columns)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::for_terminal(80, 24)
    }
}

pub struct App {
    pub state: CatalogState,
    pub selected: usize,
    pub scroll_row: usize,
    pub layout: GridLayout,
    pub search_mode: bool,
    pub should_quit: bool,
    /// Advances on every tick while a batch is in flight.
    pub spinner: usize,
    catalog: Arc<dyn Catalog>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        page_size: u32,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            state: CatalogState::new(page_size),
            selected: 0,
            scroll_row: 0,
            layout: GridLayout::default(),
            search_mode: false,
            should_quit: false,
            spinner: 0,
            catalog,
            action_tx,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::LoadNextBatch,
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Wheel(delta) => Action::Wheel(delta),
            Event::Resize(width, height) => Action::Resize(width, height),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.search_mode {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => Action::ExitSearchMode,
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Char(c) => Action::SearchInput(c),
                _ => Action::None,
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc => {
                if self.state.search().is_empty() {
                    Action::Quit
                } else {
                    Action::ClearSearch
                }
            }
            KeyCode::Char('/') => Action::EnterSearchMode,
            KeyCode::Char('d') if ctrl => Action::PageDown,
            KeyCode::Char('u') if ctrl => Action::PageUp,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('h') | KeyCode::Left => Action::MoveLeft,
            KeyCode::Char('l') | KeyCode::Right => Action::MoveRight,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Char('o') => Action::OpenImage,
            KeyCode::Char('y') => Action::YankImageUrl,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Tick => {
                if self.state.is_loading() {
                    self.spinner = self.spinner.wrapping_add(1);
                }
            }

            // Navigation: move, keep the selection on screen, then signal.
            Action::ScrollUp => {
                self.selected = self.selected.saturating_sub(self.layout.columns);
                self.follow_selection();
                self.handle_scroll();
            }
            Action::ScrollDown => {
                self.move_selection_forward(self.layout.columns);
                self.follow_selection();
                self.handle_scroll();
            }
            Action::MoveLeft => {
                self.selected = self.selected.saturating_sub(1);
                self.follow_selection();
                self.handle_scroll();
            }
            Action::MoveRight => {
                self.move_selection_forward(1);
                self.follow_selection();
                self.handle_scroll();
            }
            Action::PageUp => {
                self.selected = self.selected.saturating_sub(self.page_len());
                self.follow_selection();
                self.handle_scroll();
            }
            Action::PageDown => {
                self.move_selection_forward(self.page_len());
                self.follow_selection();
                self.handle_scroll();
            }
            Action::GoToTop => {
                self.selected = 0;
                self.follow_selection();
                self.handle_scroll();
            }
            Action::GoToBottom => {
                self.selected = self.visible_len().saturating_sub(1);
                self.follow_selection();
                self.handle_scroll();
            }
            Action::Wheel(delta) => {
                self.scroll_by(delta as isize);
                self.handle_scroll();
            }
            Action::Resize(width, height) => {
                self.layout = GridLayout::for_terminal(width, height);
                self.clamp_scroll();
                self.follow_selection();
            }

            // Fetching. Only `Event::Init` sends LoadNextBatch; the state
            // already counts as loading from creation, so it is not guarded.
            Action::LoadNextBatch => {
                let pending = self.state.load_next_batch(Arc::clone(&self.catalog));
                self.spawn_batch(pending);
            }
            Action::BatchFinished(outcome) => {
                self.state.finish_batch(outcome);
                self.clamp_selection();
            }

            // Search
            Action::EnterSearchMode => {
                self.search_mode = true;
            }
            Action::ExitSearchMode => {
                self.search_mode = false;
            }
            Action::SearchInput(c) => {
                let mut query = self.state.search().to_string();
                query.push(c);
                self.set_search(query);
            }
            Action::SearchBackspace => {
                let mut query = self.state.search().to_string();
                query.pop();
                self.set_search(query);
            }
            Action::ClearSearch => {
                self.set_search(String::new());
            }

            Action::OpenImage => {
                if let Some(url) = self.selected_image_url() {
                    if let Err(e) = open::that(&url) {
                        tracing::warn!(%url, error = %e, "failed to open image");
                    }
                }
            }
            Action::YankImageUrl => {
                if let Some(url) = self.selected_image_url() {
                    let copied = arboard::Clipboard::new()
                        .and_then(|mut clipboard| clipboard.set_text(url.clone()));
                    if let Err(e) = copied {
                        tracing::warn!(%url, error = %e, "failed to copy image url");
                    }
                }
            }

            Action::None => {}
        }
    }

    /// Entries that pass the current search, recomputed on every call.
    pub fn visible(&self) -> Vec<&CatalogEntry> {
        self.state.visible()
    }

    pub fn visible_len(&self) -> usize {
        self.visible().len()
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.visible().get(self.selected).copied()
    }

    fn selected_image_url(&self) -> Option<String> {
        self.selected_entry()
            .and_then(|entry| entry.imagery.primary())
            .map(str::to_string)
    }

    /// Scroll geometry of the card grid, in rows.
    pub fn viewport(&self) -> Viewport {
        Viewport {
            scroll_position: self.scroll_row,
            visible_height: self.layout.visible_rows,
            content_height: self.layout.rows_for(self.visible_len()),
        }
    }

    /// Single entry point for every scroll source (keys and mouse wheel).
    fn handle_scroll(&mut self) {
        let viewport = self.viewport();
        if let Some(pending) = self.state.on_scroll_signal(viewport, &self.catalog) {
            self.spawn_batch(pending);
        }
    }

    fn set_search(&mut self, query: String) {
        self.state.set_search(query);
        self.selected = 0;
        self.scroll_row = 0;
    }

    fn page_len(&self) -> usize {
        self.layout.columns * self.layout.visible_rows
    }

    fn move_selection_forward(&mut self, step: usize) {
        let last = self.visible_len().saturating_sub(1);
        self.selected = (self.selected + step).min(last);
    }

    fn max_scroll_row(&self) -> usize {
        self.layout
            .rows_for(self.visible_len())
            .saturating_sub(self.layout.visible_rows)
    }

    fn scroll_by(&mut self, delta: isize) {
        let row = (self.scroll_row as isize + delta).max(0) as usize;
        self.scroll_row = row.min(self.max_scroll_row());

        // drag the selection along so it stays on screen
        let columns = self.layout.columns;
        let first = self.scroll_row * columns;
        let last = (self.scroll_row + self.layout.visible_rows) * columns;
        if self.selected < first {
            self.selected = first;
        } else if self.selected >= last {
            self.selected = last - 1;
        }
        self.clamp_selection();
    }

    fn follow_selection(&mut self) {
        let row = self.selected / self.layout.columns;
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + self.layout.visible_rows {
            self.scroll_row = row + 1 - self.layout.visible_rows;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn clamp_scroll(&mut self) {
        self.scroll_row = self.scroll_row.min(self.max_scroll_row());
    }

    fn spawn_batch(&self, pending: PendingBatch) {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tx.send(Action::BatchFinished(pending.await)).ok();
        });
    }
}
