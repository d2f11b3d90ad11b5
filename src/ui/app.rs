use std::future::Future;
use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::widgets::ListState;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    config::TmdbConfig,
    http::TmdbClient,
    store::{MovieState, MovieStore},
    ui::{
        input::InputHandler,
        message::AppMessage,
        tui::{TerminalEvent, Tui},
        view,
    },
};

pub struct App {
    pub config: TmdbConfig,
    pub store: Arc<MovieStore>,
    pub input: String,
    pub is_editing: bool,
    pub list_state: ListState,
    pub spinner_frame: usize,
    changes: watch::Receiver<MovieState>,
    fetch_handle: Option<JoinHandle<()>>,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        let config = TmdbConfig::from_env();
        let client = TmdbClient::new(config.clone());
        let store = Arc::new(MovieStore::new(Arc::new(client)));
        let changes = store.subscribe();

        Self {
            config,
            store,
            input: String::new(),
            is_editing: false,
            list_state: ListState::default(),
            spinner_frame: 0,
            changes,
            fetch_handle: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.load_popular();

        while !self.should_quit {
            tui.draw(|frame| view::render(self, frame))?;

            match tui.next().await {
                Some(TerminalEvent::Tick) => self.on_tick(),
                Some(TerminalEvent::Key(key)) => {
                    if let Some(msg) = InputHandler::handle_key(key, self.is_editing) {
                        self.update(msg);
                    }
                }
                Some(TerminalEvent::Paste(text)) => {
                    if self.is_editing {
                        self.input.push_str(&text);
                    }
                }
                Some(TerminalEvent::Resize(_, _)) => {}
                None => self.should_quit = true,
            }
        }

        tui.exit()
    }

    fn on_tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        if self.changes.has_changed().unwrap_or(false) {
            let len = self.changes.borrow_and_update().movies.len();
            self.clamp_selection(len);
        }
    }

    fn update(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::Refresh => self.refresh(),
            AppMessage::EditSearch => self.is_editing = true,
            AppMessage::CancelSearch => {
                if self.is_editing {
                    self.is_editing = false;
                } else if !self.input.is_empty() {
                    self.input.clear();
                    self.load_popular();
                }
            }
            AppMessage::SubmitSearch => {
                self.is_editing = false;
                self.search(self.input.clone());
            }
            AppMessage::InputChar(c) => self.input.push(c),
            AppMessage::InputBackspace => {
                self.input.pop();
            }
            AppMessage::MoveDown => self.move_selection(1),
            AppMessage::MoveUp => self.move_selection(-1),
            AppMessage::SelectFirst => self.select_edge(true),
            AppMessage::SelectLast => self.select_edge(false),
        }
    }

    fn load_popular(&mut self) {
        let store = self.store.clone();
        self.spawn_fetch(async move { store.load_popular().await });
    }

    fn search(&mut self, query: String) {
        let store = self.store.clone();
        self.spawn_fetch(async move { store.search(&query).await });
    }

    fn refresh(&mut self) {
        let store = self.store.clone();
        self.spawn_fetch(async move { store.refresh().await });
    }

    /// At most one in-flight fetch task; a new intent replaces and aborts the
    /// previous one. Correctness does not depend on the abort, the store
    /// discards superseded results on its own.
    fn spawn_fetch(&mut self, task: impl Future<Output = ()> + Send + 'static) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
        }
        self.fetch_handle = Some(tokio::spawn(task));
    }

    fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
        } else {
            let i = self.list_state.selected().unwrap_or(0).min(len - 1);
            self.list_state.select(Some(i));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.store.snapshot().movies.len();
        if len == 0 {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| {
            if delta < 0 {
                i.saturating_sub(delta.unsigned_abs())
            } else {
                (i + delta as usize).min(len - 1)
            }
        });
        self.list_state.select(Some(i));
    }

    fn select_edge(&mut self, first: bool) {
        let len = self.store.snapshot().movies.len();
        if len == 0 {
            return;
        }
        self.list_state.select(Some(if first { 0 } else { len - 1 }));
    }
}
