//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this for panel state, but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use panel_core::bridge::PlayerState;
use panel_core::catalog::Show;
use panel_core::favorites::Slots;
use panel_core::index::ShowIndex;

/// The full shared state of the panel.
/// Components read this; only the App event-loop writes to it.
pub struct AppState {
    // ── Bridge ──────────────────────────────────────────────────────────────
    /// Latest media-player snapshot pushed in by the poll task.
    pub player: PlayerState,
    /// True when a bridge is configured at all (playback actions work).
    pub bridge_available: bool,
    /// True while state polls are succeeding.
    pub connected: bool,

    // ── Catalog ─────────────────────────────────────────────────────────────
    pub catalog: Vec<Show>,
    /// Alphabetical buckets, rebuilt on every catalog change.
    pub index: ShowIndex,

    // ── Favorites / profile ─────────────────────────────────────────────────
    pub favorites: Slots,
    /// `favorites` resolved against the current catalog, slot order kept.
    pub favorite_shows: Vec<Show>,
    pub active_profile: String,

    // ── Session ─────────────────────────────────────────────────────────────
    pub browser_open: bool,
    pub last_nonzero_volume: f32,
    /// Last log line for the footer bar.
    pub last_log: Option<String>,
}

impl AppState {
    /// Whether a favorite slot currently holds this show.
    pub fn is_favorite(&self, url: &str) -> bool {
        self.favorites.iter().flatten().any(|u| u == url)
    }

    pub fn show_by_url(&self, url: &str) -> Option<&Show> {
        self.catalog.iter().find(|s| s.url == url)
    }

    /// Per-slot resolved shows for the slot picker: stale or empty slots
    /// render as vacant.
    pub fn slot_occupants(&self) -> Vec<Option<&Show>> {
        (0..panel_core::favorites::SLOT_COUNT)
            .map(|i| {
                self.favorites
                    .get(i)
                    .and_then(|slot| slot.as_deref())
                    .and_then(|url| self.show_by_url(url))
            })
            .collect()
    }
}
