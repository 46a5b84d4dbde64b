pub mod favorites_grid;
pub mod media_player;
pub mod profile_bar;
pub mod show_browser;
