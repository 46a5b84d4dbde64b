//! ShowBrowser component — full-screen overlay for picking favorites.
//!
//! Left pane: the alphabetical show list with letter headers, a letter rail,
//! and drag/jump scrolling through the ScrollPane geometry.  Right pane:
//! preview of the selected show and the five favorite slots.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use panel_core::catalog::Show;
use panel_core::favorites::SLOT_COUNT;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        C_ACCENT, C_LETTER_RAIL, C_MUTED, C_NUMBER_HINT, C_PRIMARY, C_SECONDARY, C_SELECTION_BG,
        C_SEPARATOR, C_STAR,
    },
    widgets::{pane_chrome::pane_chrome, scroll_pane::ScrollPane},
};

/// One rendered line of the virtualized list.
enum Row {
    Header(char),
    Show(Show),
}

pub struct ShowBrowser {
    rows: Vec<Row>,
    letters: Vec<char>,
    /// Index into `rows`, always pointing at a `Row::Show` when any exist.
    selected_row: usize,
    scroll: ScrollPane,
    drag_moved: bool,
    last_click: Option<(usize, Instant)>,

    // Last-drawn rects for mouse hit-testing.
    list_area: Rect,
    rail_area: Rect,
    slot_areas: Vec<Rect>,
}

impl ShowBrowser {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            letters: Vec::new(),
            selected_row: 0,
            scroll: ScrollPane::new(),
            drag_moved: false,
            last_click: None,
            list_area: Rect::default(),
            rail_area: Rect::default(),
            slot_areas: Vec::new(),
        }
    }

    /// Rebuild the virtual rows from the current index.  Called by the App
    /// whenever the catalog changes and when the overlay opens.
    pub fn sync(&mut self, state: &AppState) {
        self.rows.clear();
        self.letters.clear();
        let mut headers: Vec<(char, f64)> = Vec::new();
        for (letter, shows) in state.index.buckets() {
            headers.push((*letter, self.rows.len() as f64));
            self.letters.push(*letter);
            self.rows.push(Row::Header(*letter));
            for show in shows {
                self.rows.push(Row::Show(show.clone()));
            }
        }
        self.scroll.set_headers(headers);
        if !self.row_is_show(self.selected_row) {
            self.selected_row = self.first_show_row().unwrap_or(0);
        }
    }

    pub fn selected_show(&self) -> Option<&Show> {
        match self.rows.get(self.selected_row) {
            Some(Row::Show(show)) => Some(show),
            _ => None,
        }
    }

    fn row_is_show(&self, row: usize) -> bool {
        matches!(self.rows.get(row), Some(Row::Show(_)))
    }

    fn first_show_row(&self) -> Option<usize> {
        self.rows.iter().position(|r| matches!(r, Row::Show(_)))
    }

    fn select_step(&mut self, forward: bool, steps: usize) {
        for _ in 0..steps {
            let mut row = self.selected_row;
            loop {
                row = if forward {
                    row + 1
                } else {
                    match row.checked_sub(1) {
                        Some(r) => r,
                        None => return,
                    }
                };
                if row >= self.rows.len() {
                    return;
                }
                if self.row_is_show(row) {
                    self.selected_row = row;
                    break;
                }
            }
        }
        self.scroll.ensure_visible(self.selected_row as f64);
    }

    fn select_row(&mut self, row: usize) -> bool {
        if self.row_is_show(row) {
            self.selected_row = row;
            return true;
        }
        false
    }

    /// Jump the viewport to a letter bucket and move the selection to its
    /// first show.
    fn jump_to_letter(&mut self, letter: char) {
        if !self.scroll.jump_to_letter(letter) {
            return;
        }
        let upper = letter.to_uppercase().next().unwrap_or(letter);
        if let Some(header) = self
            .rows
            .iter()
            .position(|r| matches!(r, Row::Header(l) if *l == upper))
        {
            self.select_row(header + 1);
        }
    }
}

impl Component for ShowBrowser {
    fn id(&self) -> ComponentId {
        ComponentId::ShowBrowser
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Esc => return vec![Action::CloseBrowser],
            KeyCode::Up => self.select_step(false, 1),
            KeyCode::Down => self.select_step(true, 1),
            KeyCode::PageUp => self.select_step(false, 10),
            KeyCode::PageDown => self.select_step(true, 10),
            KeyCode::Home => {
                if let Some(row) = self.first_show_row() {
                    self.selected_row = row;
                    self.scroll.ensure_visible(row as f64);
                }
            }
            KeyCode::End => {
                if let Some(row) = (0..self.rows.len()).rev().find(|&r| self.row_is_show(r)) {
                    self.selected_row = row;
                    self.scroll.ensure_visible(row as f64);
                }
            }
            KeyCode::Enter => {
                if let Some(show) = self.selected_show() {
                    return vec![Action::PlayShow(show.url.clone())];
                }
            }
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(show) = self.selected_show() {
                    let slot = c as usize - '1' as usize;
                    return vec![Action::SaveFavorite {
                        url: show.url.clone(),
                        slot,
                    }];
                }
            }
            KeyCode::Char('y') => {
                if let Some(show) = self.selected_show() {
                    return vec![Action::CopyToClipboard(show.url.clone())];
                }
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                self.jump_to_letter(c);
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll.scroll_by(3.0),
            MouseEventKind::ScrollDown => self.scroll.scroll_by(-3.0),

            MouseEventKind::Down(MouseButton::Left) => {
                let pos = (event.column, event.row).into();
                if self.rail_area.contains(pos) {
                    let idx = (event.row - self.rail_area.y) as usize;
                    if let Some(&letter) = self.letters.get(idx) {
                        self.jump_to_letter(letter);
                    }
                } else if self.list_area.contains(pos) {
                    self.scroll.drag_start(event.row as f64);
                    self.drag_moved = false;
                } else if let Some(slot) = self
                    .slot_areas
                    .iter()
                    .position(|r| r.contains(pos))
                {
                    if let Some(show) = self.selected_show() {
                        return vec![Action::SaveFavorite {
                            url: show.url.clone(),
                            slot,
                        }];
                    }
                }
            }

            MouseEventKind::Drag(MouseButton::Left) => {
                if self.scroll.is_dragging() {
                    self.scroll.drag_move(event.row as f64);
                    self.drag_moved = true;
                }
            }

            MouseEventKind::Up(MouseButton::Left) => {
                if self.scroll.is_dragging() {
                    self.scroll.drag_end();
                    let pos = (event.column, event.row).into();
                    if !self.drag_moved && self.list_area.contains(pos) {
                        // A press-and-release without movement is a click-select.
                        let rel = (event.row - self.list_area.y) as usize;
                        let row = self.scroll.top_row() + rel;
                        if self.select_row(row) {
                            let now = Instant::now();
                            let is_double = self
                                .last_click
                                .map(|(r, t)| r == row && t.elapsed().as_millis() < 400)
                                .unwrap_or(false);
                            if is_double {
                                self.last_click = None;
                                if let Some(show) = self.selected_show() {
                                    return vec![Action::PlayShow(show.url.clone())];
                                }
                            }
                            self.last_click = Some((row, now));
                        }
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        frame.render_widget(Clear, area);
        let block = pane_chrome("show browser", None, true, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width < 20 || inner.height < 6 {
            return;
        }

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        self.draw_list(frame, halves[0], state);
        self.draw_side(frame, halves[1], state);
    }
}

impl ShowBrowser {
    fn draw_list(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(3), Constraint::Min(10)])
            .split(area);
        self.rail_area = cols[0];
        self.list_area = cols[1];

        // Letter rail
        for (i, letter) in self.letters.iter().enumerate() {
            if i as u16 >= self.rail_area.height {
                break;
            }
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", letter),
                    Style::default().fg(C_LETTER_RAIL),
                )),
                Rect {
                    y: self.rail_area.y + i as u16,
                    height: 1,
                    ..self.rail_area
                },
            );
        }

        if self.rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  no shows in catalog",
                    Style::default().fg(C_MUTED),
                )),
                self.list_area,
            );
            return;
        }

        let height = self.list_area.height as usize;
        self.scroll
            .set_extents(height as f64, self.rows.len() as f64);

        let top = self.scroll.top_row();
        // When the viewport starts mid-bucket, pin that bucket's header over
        // the first line so the letter stays visible while scrolling.  The
        // pin steps aside when the covered row is the selection itself.
        let sticky = match self.rows.get(top) {
            Some(Row::Show(_)) if top != self.selected_row => {
                self.rows[..top].iter().rev().find_map(|r| match r {
                    Row::Header(l) => Some(*l),
                    _ => None,
                })
            }
            _ => None,
        };
        for (view_row, row_idx) in (top..self.rows.len()).take(height).enumerate() {
            if view_row == 0 {
                if let Some(letter) = sticky {
                    self.draw_header_line(
                        frame,
                        letter,
                        Rect {
                            y: self.list_area.y,
                            height: 1,
                            ..self.list_area
                        },
                    );
                    continue;
                }
            }
            let line_area = Rect {
                y: self.list_area.y + view_row as u16,
                height: 1,
                ..self.list_area
            };
            match &self.rows[row_idx] {
                Row::Header(letter) => {
                    self.draw_header_line(frame, *letter, line_area);
                }
                Row::Show(show) => {
                    let is_selected = row_idx == self.selected_row;
                    let style = if is_selected {
                        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(C_SECONDARY)
                    };
                    let bg = if is_selected {
                        Style::default().bg(C_SELECTION_BG)
                    } else {
                        Style::default()
                    };
                    let mut spans = vec![
                        Span::raw("   "),
                        Span::styled(show.name.clone(), style),
                    ];
                    if state.is_favorite(&show.url) {
                        spans.push(Span::styled("  ★", Style::default().fg(C_STAR)));
                    }
                    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg), line_area);
                }
            }
        }
    }

    fn draw_header_line(&self, frame: &mut Frame, letter: char, area: Rect) {
        let fill = "─".repeat((area.width as usize).saturating_sub(4));
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", letter),
                    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(fill, Style::default().fg(C_SEPARATOR)),
            ])),
            area,
        );
    }

    fn draw_side(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let slots_h = 4;
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(slots_h)])
            .split(area);

        self.draw_preview(frame, parts[0]);
        self.draw_slots(frame, parts[1], state);
    }

    fn draw_preview(&mut self, frame: &mut Frame, area: Rect) {
        let Some(show) = self.selected_show() else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Pick a show to preview",
                    Style::default().fg(C_MUTED),
                )),
                area,
            );
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!(" {}", show.name),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {}", show.url),
                Style::default().fg(C_MUTED),
            )),
            Line::default(),
        ];
        for chunk in show.description.split('\n') {
            lines.push(Line::from(Span::styled(
                format!(" {}", chunk),
                Style::default().fg(C_SECONDARY),
            )));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    fn draw_slots(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.slot_areas.clear();
        if area.height < 2 {
            return;
        }
        let enabled = self.selected_show().is_some();
        let label = if enabled {
            " Save to slot (1-5):"
        } else {
            " Save to slot: pick a show first"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(label, Style::default().fg(C_SECONDARY))),
            Rect { height: 1, ..area },
        );

        let cells_area = Rect {
            y: area.y + 1,
            height: area.height - 1,
            ..area
        };
        let constraints: Vec<Constraint> =
            (0..SLOT_COUNT).map(|_| Constraint::Ratio(1, SLOT_COUNT as u32)).collect();
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(cells_area);

        let occupants = state.slot_occupants();
        for (idx, cell) in cells.iter().enumerate() {
            self.slot_areas.push(*cell);
            let occupant = occupants.get(idx).copied().flatten();
            let holds_selection = occupant
                .zip(self.selected_show())
                .map(|(o, s)| o.url == s.url)
                .unwrap_or(false);

            let number_style = if enabled {
                Style::default().fg(C_NUMBER_HINT)
            } else {
                Style::default().fg(C_MUTED)
            };
            let name_style = if holds_selection {
                Style::default().fg(C_STAR)
            } else if occupant.is_some() {
                Style::default().fg(C_SECONDARY)
            } else {
                Style::default().fg(C_MUTED)
            };

            let name = occupant.map(|s| s.name.as_str()).unwrap_or("—");
            let max_w = (cell.width as usize).saturating_sub(4);
            let line = Line::from(vec![
                Span::styled(format!(" {} ", idx + 1), number_style),
                Span::styled(truncate(name, max_w), name_style),
            ]);
            frame.render_widget(Paragraph::new(line), *cell);
        }
    }
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        if out.width() + 2 > max_width {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}
