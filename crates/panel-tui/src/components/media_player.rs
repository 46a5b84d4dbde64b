//! MediaPlayer component — the "now playing" card.
//!
//! Renders the composed display title, playback status, progress and volume
//! rows, and turns key/mouse input into transport actions.  All transport
//! actions are fire-and-forget bridge calls dispatched by the App.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use panel_core::bridge::PlaybackStatus;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ERROR, C_MUTED, C_PAUSED, C_PLAYING, C_PRIMARY, C_SECONDARY},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        progress_bar::{click_fraction, draw_progress},
    },
};

const VOLUME_STEP: f32 = 0.05;
const SEEK_STEP_SECS: f64 = 10.0;

#[derive(Default)]
pub struct MediaPlayer {
    /// Last-drawn rects for mouse hit-testing.
    progress_area: Rect,
    volume_area: Rect,
}

impl MediaPlayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for MediaPlayer {
    fn id(&self) -> ComponentId {
        ComponentId::MediaPlayer
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let player = &state.player;
        match key.code {
            KeyCode::Char(' ') => vec![Action::PlayPause],
            KeyCode::Char('n') => vec![Action::Next],
            KeyCode::Char('p') => vec![Action::Previous],
            KeyCode::Left => vec![Action::Volume((player.volume - VOLUME_STEP).max(0.0))],
            KeyCode::Right => vec![Action::Volume((player.volume + VOLUME_STEP).min(1.0))],
            KeyCode::Char('m') => vec![Action::Mute],
            KeyCode::Char(',') => {
                vec![Action::SeekTo((player.position_secs - SEEK_STEP_SECS).max(0.0))]
            }
            KeyCode::Char('.') => vec![Action::SeekTo(player.position_secs + SEEK_STEP_SECS)],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            // Click on the progress row seeks to that fraction of the show.
            if event.row == self.progress_area.y {
                if let Some(frac) = click_fraction(self.progress_area, event.column) {
                    let duration = state.player.duration_secs;
                    if duration > 0.0 {
                        return vec![Action::SeekTo((frac * duration).floor())];
                    }
                }
            }
            // Click on the volume row sets the volume directly.
            if event.row == self.volume_area.y {
                if let Some(frac) = click_fraction(self.volume_area, event.column) {
                    return vec![Action::Volume(frac as f32)];
                }
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = if !state.bridge_available {
            Some(Badge {
                text: "OFFLINE",
                color: C_ERROR,
            })
        } else if !state.connected {
            Some(Badge {
                text: "NO STATE",
                color: C_PAUSED,
            })
        } else {
            None
        };
        let block = pane_chrome("now playing", Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height < 4 || inner.width < 10 {
            return;
        }

        if !state.bridge_available && !state.connected {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  media player unavailable",
                    Style::default().fg(C_MUTED),
                )),
                inner,
            );
            return;
        }

        let player = &state.player;
        let (icon, icon_color) = match player.status {
            PlaybackStatus::Playing => ("▶", C_PLAYING),
            PlaybackStatus::Paused => ("⏸", C_PAUSED),
            PlaybackStatus::Idle => ("■", C_MUTED),
        };

        // Row 0: status icon + title
        let title_line = Line::from(vec![
            Span::styled(format!(" {} ", icon), Style::default().fg(icon_color)),
            Span::styled(
                player.display_title(),
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(title_line),
            Rect {
                height: 1,
                ..inner
            },
        );

        // Row 1: device name (and artwork hint when the bridge reports one)
        let mut sub_spans = vec![Span::styled(
            format!("   {}", player.device_name.as_deref().unwrap_or("")),
            Style::default().fg(C_SECONDARY),
        )];
        if player.artwork.is_some() && player.is_active() {
            sub_spans.push(Span::styled("  ◻ artwork", Style::default().fg(C_MUTED)));
        }
        frame.render_widget(
            Paragraph::new(Line::from(sub_spans)),
            Rect {
                y: inner.y + 1,
                height: 1,
                ..inner
            },
        );

        // Progress row (remembered for click-to-seek)
        self.progress_area = Rect {
            x: inner.x + 1,
            y: inner.y + inner.height.saturating_sub(2),
            width: inner.width.saturating_sub(2),
            height: 1,
        };
        let fill = if player.status == PlaybackStatus::Paused {
            C_PAUSED
        } else {
            C_PLAYING
        };
        draw_progress(
            frame,
            self.progress_area,
            player.progress(),
            Some(player.position_secs),
            Some(player.duration_secs),
            fill,
        );

        // Volume row (remembered for click-to-set)
        self.volume_area = Rect {
            x: inner.x + 1,
            y: inner.y + inner.height.saturating_sub(1),
            width: inner.width.saturating_sub(2),
            height: 1,
        };
        draw_volume(frame, self.volume_area, player.volume, player.muted);
    }
}

fn draw_volume(frame: &mut Frame, area: Rect, volume: f32, muted: bool) {
    if area.width < 8 {
        return;
    }
    let icon = if muted || volume == 0.0 { "✕" } else { "♪" };
    let label = format!("{:>3.0}%", volume * 100.0);
    let bar_w = area.width.saturating_sub(8) as usize;
    let filled = (volume.clamp(0.0, 1.0) as f64 * bar_w as f64).round() as usize;
    let bar: String = (0..bar_w)
        .map(|i| if i < filled { '━' } else { '─' })
        .collect();

    let color = if muted { C_MUTED } else { C_SECONDARY };
    let line = Line::from(vec![
        Span::styled(format!("{} ", icon), Style::default().fg(color)),
        Span::styled(bar, Style::default().fg(color)),
        Span::styled(format!(" {}", label), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
