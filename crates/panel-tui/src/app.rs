//! App — the panel's component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Bridge service calls flow out as fire-and-forget spawned tasks.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use panel_core::bridge::{BridgeClient, PlayerState, ServiceCall};
use panel_core::catalog::{CatalogSource, Show};
use panel_core::favorites::{self, FavoritesStore};
use panel_core::index::ShowIndex;
use panel_core::profile::ProfileSelector;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{
        favorites_grid::FavoritesGrid, media_player::MediaPlayer, profile_bar::ProfileBar,
        show_browser::ShowBrowser,
    },
    focus::FocusRing,
    theme::{C_ACCENT, C_MUTED, C_SECONDARY},
    widgets::{
        pane_chrome::pane_chrome,
        status_bar,
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// Fresh media-player snapshot from the poll task.
    PlayerState(PlayerState),
    /// A state poll failed (bridge unreachable or malformed response).
    PollFailed(String),
    /// A catalog fetch finished.  `generation` identifies the request so a
    /// superseded fetch can be discarded (last-write-wins).
    CatalogLoaded { generation: u64, shows: Vec<Show> },
    CatalogFailed { generation: u64, error: String },
}

/// Stores the last-drawn layout rects for mouse hit-testing.
#[derive(Default, Clone)]
struct PaneAreas {
    media_player: Rect,
    browse_hint: Rect,
    profile_bar: Rect,
    favorites: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,

    // ── Components ────────────────────────────────────────────────────────────
    media_player: MediaPlayer,
    favorites_grid: FavoritesGrid,
    profile_bar: ProfileBar,
    show_browser: ShowBrowser,
    focus: FocusRing,

    // ── Collaborators ─────────────────────────────────────────────────────────
    bridge: Option<Arc<BridgeClient>>,
    catalog_source: Arc<CatalogSource>,
    favorites_store: FavoritesStore,
    profiles: ProfileSelector,

    // ── Session bookkeeping ───────────────────────────────────────────────────
    poll_interval: Duration,
    catalog_generation: u64,
    should_quit: bool,
    pane_areas: PaneAreas,
    toast: ToastManager,
    msg_tx: Option<mpsc::Sender<AppMessage>>,
}

impl App {
    pub fn new(
        bridge: Option<BridgeClient>,
        catalog_source: CatalogSource,
        favorites_store: FavoritesStore,
        profiles: ProfileSelector,
        poll_interval: Duration,
    ) -> Self {
        let active_profile = profiles.active().to_string();
        let favorites = favorites_store.load(&active_profile);
        let bridge_available = bridge.is_some();

        let state = AppState {
            player: PlayerState::default(),
            bridge_available,
            connected: false,
            catalog: Vec::new(),
            index: ShowIndex::default(),
            favorites,
            favorite_shows: Vec::new(),
            active_profile,
            browser_open: false,
            last_nonzero_volume: 0.5,
            last_log: None,
        };

        Self {
            state,
            media_player: MediaPlayer::new(),
            favorites_grid: FavoritesGrid::new(),
            profile_bar: ProfileBar::new(),
            show_browser: ShowBrowser::new(),
            focus: FocusRing::new(vec![
                ComponentId::MediaPlayer,
                ComponentId::FavoritesGrid,
                ComponentId::ProfileBar,
            ]),
            bridge: bridge.map(Arc::new),
            catalog_source: Arc::new(catalog_source),
            favorites_store,
            profiles,
            poll_interval,
            catalog_generation: 0,
            should_quit: false,
            pane_areas: PaneAreas::default(),
            toast: ToastManager::new(),
            msg_tx: None,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        self.msg_tx = Some(tx.clone());

        self.push_log("tvpanel started".to_string());
        self.request_catalog();

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut state_poll = tokio::time::interval(self.poll_interval);
        state_poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Toast expiry check
        let mut toast_tick = tokio::time::interval(Duration::from_millis(250));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut fatal: Option<anyhow::Error> = None;
        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    if let Err(e) = self.handle_message(msg).await {
                        fatal = Some(e);
                        break;
                    }
                }

                _ = state_poll.tick() => {
                    if let Some(bridge) = &self.bridge {
                        let bridge = bridge.clone();
                        let poll_tx = tx.clone();
                        tokio::spawn(async move {
                            let msg = match bridge.fetch_player_state().await {
                                Ok(state) => AppMessage::PlayerState(state),
                                Err(e) => AppMessage::PollFailed(e.to_string()),
                            };
                            let _ = poll_tx.send(msg).await;
                        });
                    }
                }

                _ = toast_tick.tick() => {
                    self.toast.tick();
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        match fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ── Message handler ───────────────────────────────────────────────────────

    async fn handle_message(&mut self, msg: AppMessage) -> anyhow::Result<()> {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return Ok(());
                    }
                    let actions = self.handle_key(key);
                    for a in actions {
                        self.dispatch(a).await;
                    }
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    for a in actions {
                        self.dispatch(a).await;
                    }
                }
                Event::Resize(w, h) => {
                    self.dispatch(Action::Resize(w, h)).await;
                }
                _ => {}
            },

            AppMessage::PlayerState(player) => {
                if !self.state.connected {
                    self.push_log("bridge state poll connected".to_string());
                }
                self.state.connected = true;
                if player.volume > 0.001 {
                    self.state.last_nonzero_volume = player.volume;
                }
                self.state.player = player;
            }

            AppMessage::PollFailed(error) => {
                if self.state.connected {
                    self.push_log(format!("bridge state poll failed: {}", error));
                }
                self.state.connected = false;
            }

            AppMessage::CatalogLoaded { generation, shows } => {
                if generation != self.catalog_generation {
                    debug!("discarding stale catalog fetch (gen {})", generation);
                    return Ok(());
                }
                self.on_catalog_loaded(shows)?;
            }

            AppMessage::CatalogFailed { generation, error } => {
                if generation != self.catalog_generation {
                    return Ok(());
                }
                warn!("catalog load failed: {}", error);
                self.toast.error("catalog load failed");
                self.push_log(format!("catalog load failed: {}", error));
            }
        }
        Ok(())
    }

    /// Install a fresh catalog snapshot: rebuild the index, seed the active
    /// profile's favorites if they are still empty, re-resolve.
    ///
    /// An empty show name is an upstream contract violation — the index
    /// build fails fast and takes the panel down with it.
    fn on_catalog_loaded(&mut self, shows: Vec<Show>) -> anyhow::Result<()> {
        self.state.index = ShowIndex::build(&shows)?;
        self.state.catalog = shows;
        self.state.favorites = self.favorites_store.seed_if_empty(
            &self.state.active_profile,
            std::mem::take(&mut self.state.favorites),
            &self.state.catalog,
        );
        self.resolve_favorites();
        self.show_browser.sync(&self.state);
        self.push_log(format!("catalog loaded: {} shows", self.state.catalog.len()));
        Ok(())
    }

    fn resolve_favorites(&mut self) {
        self.state.favorite_shows = favorites::resolve(&self.state.favorites, &self.state.catalog);
    }

    fn request_catalog(&mut self) {
        self.catalog_generation += 1;
        let generation = self.catalog_generation;
        let source = self.catalog_source.clone();
        let Some(tx) = self.msg_tx.clone() else {
            return;
        };
        tokio::spawn(async move {
            let msg = match source.fetch().await {
                Ok(shows) => AppMessage::CatalogLoaded { generation, shows },
                Err(e) => AppMessage::CatalogFailed {
                    generation,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg).await;
        });
    }

    /// Spawn a fire-and-forget bridge call.  Without a bridge this is a
    /// silent no-op.
    fn fire(&self, call: ServiceCall) {
        match &self.bridge {
            Some(bridge) => {
                let bridge = bridge.clone();
                tokio::spawn(async move {
                    bridge.call(call).await;
                });
            }
            None => debug!("no bridge configured; dropping {:?}", call),
        }
    }

    fn push_log(&mut self, msg: String) {
        info!("{}", msg);
        self.state.last_log = Some(msg);
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // The browser overlay captures everything while open.
        if self.state.browser_open {
            return self.show_browser.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                return vec![Action::Quit];
            }
            KeyCode::Char('b') => return vec![Action::OpenBrowser],
            KeyCode::Char('r') => return vec![Action::ReloadCatalog],
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::MediaPlayer)],
            KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::FavoritesGrid)],
            KeyCode::Char('3') => return vec![Action::FocusPane(ComponentId::ProfileBar)],
            _ => {}
        }

        match self.focus.current() {
            Some(ComponentId::MediaPlayer) => self.media_player.handle_key(key, &self.state),
            Some(ComponentId::FavoritesGrid) => self.favorites_grid.handle_key(key, &self.state),
            Some(ComponentId::ProfileBar) => self.profile_bar.handle_key(key, &self.state),
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Action> {
        if self.state.browser_open {
            return self
                .show_browser
                .handle_mouse(mouse, Rect::default(), &self.state);
        }

        use ratatui::crossterm::event::{MouseButton, MouseEventKind};
        let pos = (mouse.column, mouse.row).into();

        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if self.pane_areas.browse_hint.contains(pos) {
                return vec![Action::OpenBrowser];
            }
        }

        let areas = self.pane_areas.clone();
        let target: Option<(&mut dyn Component, Rect)> = if areas.media_player.contains(pos) {
            Some((&mut self.media_player, areas.media_player))
        } else if areas.favorites.contains(pos) {
            Some((&mut self.favorites_grid, areas.favorites))
        } else if areas.profile_bar.contains(pos) {
            Some((&mut self.profile_bar, areas.profile_bar))
        } else {
            None
        };

        match target {
            Some((component, area)) => {
                // Clicking a pane focuses it before the component sees the event.
                if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
                    self.focus.set(component.id());
                }
                component.handle_mouse(mouse, area, &self.state)
            }
            None => vec![],
        }
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        // Broadcast to components first so they can react (selection clamps etc.)
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.media_player.on_action(&action, s));
            out.extend(self.favorites_grid.on_action(&action, s));
            out.extend(self.profile_bar.on_action(&action, s));
            out.extend(self.show_browser.on_action(&action, s));
            out
        };

        self.apply_action(action).await;

        // Dispatch any secondary actions (depth-limited to 1 level)
        for a in secondary {
            self.apply_action(a).await;
        }
    }

    async fn apply_action(&mut self, action: Action) {
        match &action {
            Action::Resize(_, _) => {}
            _ => debug!("apply_action: {:?}", action),
        }
        match action {
            // ── Playback ──────────────────────────────────────────────────────
            Action::PlayShow(url) => {
                let name = self
                    .state
                    .show_by_url(&url)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| url.clone());
                match &self.bridge {
                    Some(bridge) => {
                        // Power on the output device first, then request the
                        // show — strictly in that order, neither awaited for
                        // a result.
                        let bridge = bridge.clone();
                        tokio::spawn(async move {
                            bridge.call(ServiceCall::TurnOn).await;
                            bridge.call(ServiceCall::PlayShow { url }).await;
                        });
                        self.toast.success(format!("playing {}", name));
                    }
                    None => debug!("no bridge configured; cannot play {}", name),
                }
            }
            Action::PlayPause => {
                self.fire(ServiceCall::PlayPause);
            }
            Action::Next => {
                self.fire(ServiceCall::Next);
            }
            Action::Previous => {
                self.fire(ServiceCall::Previous);
            }
            Action::Volume(level) => {
                let level = level.clamp(0.0, 1.0);
                if level > 0.001 {
                    self.state.last_nonzero_volume = level;
                }
                // Optimistic local echo; the next poll confirms.
                self.state.player.volume = level;
                self.fire(ServiceCall::Volume { level });
            }
            Action::SeekTo(position_secs) => {
                self.fire(ServiceCall::Seek { position_secs });
            }
            Action::Mute => {
                let current = self.state.player.volume;
                let level = if current < 0.01 {
                    self.state.last_nonzero_volume.max(0.1)
                } else {
                    0.0
                };
                self.state.player.volume = level;
                self.fire(ServiceCall::Volume { level });
            }

            // ── Favorites / browser ───────────────────────────────────────────
            Action::OpenBrowser => {
                self.state.browser_open = true;
                self.show_browser.sync(&self.state);
            }
            Action::CloseBrowser => {
                self.state.browser_open = false;
            }
            Action::SaveFavorite { url, slot } => {
                let name = self
                    .state
                    .show_by_url(&url)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| url.clone());
                self.state.favorites = self.favorites_store.set_slot(
                    &self.state.active_profile,
                    std::mem::take(&mut self.state.favorites),
                    &url,
                    slot,
                );
                self.resolve_favorites();
                self.toast.success(format!("{} → slot {}", name, slot + 1));
                self.state.browser_open = false;
            }

            // ── Profiles ──────────────────────────────────────────────────────
            Action::SwitchProfile(id) => {
                if !self.profiles.switch_to(&id) {
                    return;
                }
                self.state.active_profile = id.clone();
                let loaded = self.favorites_store.load(&id);
                self.state.favorites =
                    self.favorites_store
                        .seed_if_empty(&id, loaded, &self.state.catalog);
                self.resolve_favorites();
                // Best-effort notification; the local switch never waits on it.
                self.fire(ServiceCall::SwitchProfile { profile: id.clone() });
                self.toast.info(format!("profile: {}", id));
                self.push_log(format!("switched to profile {}", id));
            }

            // ── Catalog ───────────────────────────────────────────────────────
            Action::ReloadCatalog => {
                self.push_log("reloading catalog".to_string());
                self.request_catalog();
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => {
                self.focus.set(id);
            }

            // ── UI ────────────────────────────────────────────────────────────
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text.clone()
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(45),
                Constraint::Min(4),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(4)])
            .split(top[1]);

        self.pane_areas.media_player = top[0];
        self.pane_areas.browse_hint = right[0];
        self.pane_areas.profile_bar = right[1];
        self.pane_areas.favorites = rows[1];

        self.media_player.draw(
            frame,
            top[0],
            self.focus.is_focused(ComponentId::MediaPlayer),
            &self.state,
        );
        self.draw_browse_hint(frame, right[0]);
        self.profile_bar.draw(
            frame,
            right[1],
            self.focus.is_focused(ComponentId::ProfileBar),
            &self.state,
        );
        self.favorites_grid.draw(
            frame,
            rows[1],
            self.focus.is_focused(ComponentId::FavoritesGrid),
            &self.state,
        );

        status_bar::draw_separator(frame, rows[2]);
        status_bar::draw_keys_bar(
            frame,
            rows[3],
            self.state.browser_open,
            &self.state.active_profile,
        );
        status_bar::draw_log_bar(
            frame,
            rows[4],
            self.state.last_log.as_deref(),
            self.state.connected,
        );

        if self.state.browser_open {
            // Overlay covers the panes but leaves the key/log bars visible,
            // since they switch to the browser's bindings while it is open.
            let overlay = Rect {
                height: rows[2].y.saturating_sub(area.y),
                ..area
            };
            self.show_browser.draw(frame, overlay, true, &self.state);
        }

        self.toast.draw(frame, area);
    }

    fn draw_browse_hint(&mut self, frame: &mut ratatui::Frame, area: Rect) {
        let block = pane_chrome("show browser", None, false, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }
        let lines = vec![
            Line::default(),
            Line::from(Span::styled("  Browse shows", Style::default().fg(C_ACCENT))).centered(),
            Line::from(Span::styled(
                format!("  {} in catalog — press b", self.state.index.show_count()),
                Style::default().fg(C_SECONDARY),
            ))
            .centered(),
            Line::from(Span::styled(
                "  pick your favorites",
                Style::default().fg(C_MUTED),
            ))
            .centered(),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
