//! ProfileBar component — one button per fixed profile; switching reloads
//! that profile's favorites.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use panel_core::profile::PROFILES;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_MUTED, C_SECONDARY, C_SELECTION_BG},
    widgets::pane_chrome::pane_chrome,
};

pub struct ProfileBar {
    cursor: usize,
    button_areas: Vec<Rect>,
}

impl ProfileBar {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            button_areas: Vec::new(),
        }
    }
}

impl Component for ProfileBar {
    fn id(&self) -> ComponentId {
        ComponentId::ProfileBar
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(PROFILES.len() - 1);
            }
            KeyCode::Enter => {
                return vec![Action::SwitchProfile(PROFILES[self.cursor].id.to_string())];
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            let hit = self
                .button_areas
                .iter()
                .position(|r| r.contains((event.column, event.row).into()));
            if let Some(idx) = hit {
                self.cursor = idx;
                return vec![Action::SwitchProfile(PROFILES[idx].id.to_string())];
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let block = pane_chrome("profiles", Some('3'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.button_areas.clear();

        if inner.height == 0 {
            return;
        }

        let constraints: Vec<Constraint> = PROFILES
            .iter()
            .map(|_| Constraint::Ratio(1, PROFILES.len() as u32))
            .collect();
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(inner);

        for (idx, profile) in PROFILES.iter().enumerate() {
            let cell = cells[idx];
            self.button_areas.push(cell);
            let is_active = state.active_profile == profile.id;
            let is_cursor = focused && idx == self.cursor;

            let style = if is_active {
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            let bg = if is_cursor {
                Style::default().bg(C_SELECTION_BG)
            } else {
                Style::default()
            };

            let marker = if is_active { "●" } else { "○" };
            let line = Line::from(vec![
                Span::styled(format!(" {} ", marker), Style::default().fg(C_MUTED)),
                Span::styled(profile.name, style),
            ]);
            frame.render_widget(Paragraph::new(line).style(bg).centered(), cell);
        }
    }
}
