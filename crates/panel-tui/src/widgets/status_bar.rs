//! Status bar — bottom lines with connection state, last log, and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ACCENT, C_MUTED, C_PLAYING, C_SECONDARY, C_SEPARATOR};

/// Draw the log bar: connection dot + last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>, connected: bool) {
    let conn_span = if connected {
        Span::styled("●", Style::default().fg(C_PLAYING))
    } else {
        Span::styled("○", Style::default().fg(C_ACCENT))
    };

    let log_span = Span::styled(last_log.unwrap_or(""), Style::default().fg(C_SECONDARY));

    let line = Line::from(vec![conn_span, Span::raw(" "), log_span]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, browser_open: bool, active_profile: &str) {
    let (label, keys) = if browser_open {
        (
            "BROWSE",
            " ↑↓ select  a-z jump  Enter play  1-5 save slot  y copy url  Esc close",
        )
    } else {
        (
            "PANEL",
            " Space pause  n/p track  ←→ vol  m mute  ,/. seek  b browse  r reload  Tab/1-3 panes  q quit",
        )
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", label),
            Style::default().fg(C_SECONDARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", active_profile), Style::default().fg(C_ACCENT)),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
