//! FavoritesGrid component — the active profile's favorite shows in slot order.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_NUMBER_HINT, C_PRIMARY, C_SECONDARY, C_SELECTION_BG},
    widgets::pane_chrome::pane_chrome,
};

pub struct FavoritesGrid {
    selected: usize,
    /// Last-drawn card rects for mouse hit-testing.
    card_areas: Vec<Rect>,
    /// Track last click (card index, time) for double-click detection.
    last_click: Option<(usize, Instant)>,
}

impl FavoritesGrid {
    pub fn new() -> Self {
        Self {
            selected: 0,
            card_areas: Vec::new(),
            last_click: None,
        }
    }

    fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

impl Component for FavoritesGrid {
    fn id(&self) -> ComponentId {
        ComponentId::FavoritesGrid
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let shows = &state.favorite_shows;
        if shows.is_empty() {
            return vec![];
        }
        self.clamp_selection(shows.len());
        match key.code {
            KeyCode::Left => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Right => {
                self.selected = (self.selected + 1).min(shows.len() - 1);
            }
            KeyCode::Enter => {
                return vec![Action::PlayShow(shows[self.selected].url.clone())];
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            let hit = self
                .card_areas
                .iter()
                .position(|r| r.contains((event.column, event.row).into()));
            if let Some(idx) = hit {
                let now = Instant::now();
                let is_double = self
                    .last_click
                    .map(|(i, t)| i == idx && t.elapsed().as_millis() < 400)
                    .unwrap_or(false);
                self.selected = idx;
                if is_double {
                    self.last_click = None;
                    if let Some(show) = state.favorite_shows.get(idx) {
                        return vec![Action::PlayShow(show.url.clone())];
                    }
                } else {
                    self.last_click = Some((idx, now));
                }
            }
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        // Favorites shrink when a profile switch or save lands.
        if matches!(
            action,
            Action::SwitchProfile(_) | Action::SaveFavorite { .. } | Action::ReloadCatalog
        ) {
            self.clamp_selection(state.favorite_shows.len());
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("favorites", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.card_areas.clear();

        let shows = &state.favorite_shows;
        if shows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No favorites yet. Press b to browse shows.",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }
        self.clamp_selection(shows.len());

        let constraints: Vec<Constraint> = shows
            .iter()
            .map(|_| Constraint::Ratio(1, shows.len() as u32))
            .collect();
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(inner);

        for (idx, show) in shows.iter().enumerate() {
            let cell = cells[idx];
            self.card_areas.push(cell);
            let is_selected = focused && idx == self.selected;

            let bg = if is_selected {
                Style::default().bg(C_SELECTION_BG)
            } else {
                Style::default()
            };

            let name_style = if is_selected {
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_PRIMARY)
            };

            let mut lines = vec![Line::from(vec![
                Span::styled(format!(" {} ", idx + 1), Style::default().fg(C_NUMBER_HINT)),
                Span::styled(show.name.clone(), name_style),
            ])];
            if cell.height > 1 {
                lines.push(Line::from(Span::styled(
                    format!("   {}", show.description),
                    Style::default().fg(C_SECONDARY),
                )));
            }

            frame.render_widget(
                Paragraph::new(lines).style(bg).wrap(Wrap { trim: false }),
                cell,
            );
        }
    }
}
