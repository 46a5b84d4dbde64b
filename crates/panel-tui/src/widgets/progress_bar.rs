//! Smooth Unicode progress bar with time labels, plus the hit-test helper
//! used for click-to-seek.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_SECONDARY};

/// Render a smooth progress bar in `area`.
/// `progress` is 0.0..=1.0. `time_pos` and `duration` are optional display values.
pub fn draw_progress(
    frame: &mut Frame,
    area: Rect,
    progress: f64,
    time_pos: Option<f64>,
    duration: Option<f64>,
    fill_color: Color,
) {
    if area.width < 4 || area.height == 0 {
        return;
    }

    let left_label = time_pos.map(fmt_time).unwrap_or_default();
    let right_label = duration.map(fmt_time).unwrap_or_default();
    let label_w = (left_label.len() + right_label.len() + 2) as u16;
    let bar_w = area.width.saturating_sub(label_w).max(4) as usize;

    // Unicode smooth fill: 8 eighths per cell
    let eighths = (progress.clamp(0.0, 1.0) * bar_w as f64 * 8.0) as usize;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

    let mut bar = String::with_capacity(bar_w + 4);
    for _ in 0..full_blocks {
        bar.push('█');
    }
    if full_blocks < bar_w {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..bar_w {
            bar.push(' ');
        }
    }

    let mut spans = Vec::new();
    if !left_label.is_empty() {
        spans.push(Span::styled(
            format!("{} ", left_label),
            Style::default().fg(C_SECONDARY),
        ));
    }
    spans.push(Span::styled(bar, Style::default().fg(fill_color)));
    if !right_label.is_empty() {
        spans.push(Span::styled(
            format!(" {}", right_label),
            Style::default().fg(C_MUTED),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Fraction (0.0..=1.0) of the bar a click at `column` corresponds to.
/// Returns `None` when the click is outside the area.
pub fn click_fraction(area: Rect, column: u16) -> Option<f64> {
    if area.width == 0 || column < area.x || column >= area.x + area.width {
        return None;
    }
    Some((column - area.x) as f64 / area.width as f64)
}

pub fn fmt_time(secs: f64) -> String {
    if secs < 0.0 {
        return "0:00".to_string();
    }
    let s = secs as u64;
    let h = s / 3600;
    let m = (s % 3600) / 60;
    let s = s % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_time() {
        assert_eq!(fmt_time(0.0), "0:00");
        assert_eq!(fmt_time(65.4), "1:05");
        assert_eq!(fmt_time(3725.0), "1:02:05");
        assert_eq!(fmt_time(-3.0), "0:00");
    }

    #[test]
    fn test_click_fraction() {
        let area = Rect::new(10, 0, 20, 1);
        assert_eq!(click_fraction(area, 10), Some(0.0));
        assert_eq!(click_fraction(area, 20), Some(0.5));
        assert_eq!(click_fraction(area, 9), None);
        assert_eq!(click_fraction(area, 30), None);
    }
}
