//! Action enum — all user-initiated intents and internal events.

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    MediaPlayer,
    FavoritesGrid,
    ProfileBar,
    ShowBrowser,
}

/// All actions that can flow through the panel.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Playback ─────────────────────────────────────────────────────────────
    /// Power on the output device, then start the show — in that order.
    PlayShow(String),
    PlayPause,
    Next,
    Previous,
    Volume(f32),
    /// Seek to an absolute position in seconds.
    SeekTo(f64),
    Mute, // toggle mute (save/restore volume)

    // ── Favorites / browser ──────────────────────────────────────────────────
    OpenBrowser,
    CloseBrowser,
    /// Save the browser's selected show into a slot (0–4), then close.
    SaveFavorite { url: String, slot: usize },

    // ── Profiles ─────────────────────────────────────────────────────────────
    SwitchProfile(String),

    // ── Catalog ──────────────────────────────────────────────────────────────
    ReloadCatalog,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── UI ───────────────────────────────────────────────────────────────────
    CopyToClipboard(String),
    Quit,
    Resize(u16, u16),
}
