//! Profiles — a fixed, statically known set of named user contexts.
//! Exactly one is active at a time; the active id persists across sessions.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub id: &'static str,
    pub name: &'static str,
}

pub const PROFILES: &[Profile] = &[
    Profile {
        id: "timur",
        name: "Timur",
    },
    Profile {
        id: "jackie",
        name: "Jackie",
    },
];

pub const DEFAULT_PROFILE: &str = "timur";

pub fn is_known(id: &str) -> bool {
    PROFILES.iter().any(|p| p.id == id)
}

pub struct ProfileSelector {
    path: PathBuf,
    active: String,
}

impl ProfileSelector {
    /// Load the persisted active profile id.  Missing or unreadable state —
    /// or an id not in the fixed set — falls back to the default profile.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("active_profile.json");
        let active = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<String>(&content).ok())
            .filter(|id| is_known(id))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        Self { path, active }
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    /// Switch the active profile.  Returns `false` (no-op) when `id` is
    /// already active or not in the fixed set; on success the new id is
    /// persisted before returning.  Reloading the switched-to profile's
    /// favorites and notifying the bridge are the caller's job.
    pub fn switch_to(&mut self, id: &str) -> bool {
        if id == self.active || !is_known(id) {
            return false;
        }
        self.active = id.to_string();
        if let Err(e) = self.persist() {
            tracing::warn!("failed to persist active profile: {}", e);
        }
        true
    }

    fn persist(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string(&self.active)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_first_profile() {
        let dir = tempfile::tempdir().unwrap();
        let selector = ProfileSelector::load(dir.path());
        assert_eq!(selector.active(), DEFAULT_PROFILE);
    }

    #[test]
    fn test_switch_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut selector = ProfileSelector::load(dir.path());
        assert!(selector.switch_to("jackie"));
        assert_eq!(selector.active(), "jackie");

        let reloaded = ProfileSelector::load(dir.path());
        assert_eq!(reloaded.active(), "jackie");
    }

    #[test]
    fn test_switch_to_same_or_unknown_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut selector = ProfileSelector::load(dir.path());
        assert!(!selector.switch_to(DEFAULT_PROFILE));
        assert!(!selector.switch_to("nobody"));
        assert_eq!(selector.active(), DEFAULT_PROFILE);
    }

    #[test]
    fn test_unknown_persisted_id_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("active_profile.json"), "\"ghost\"").unwrap();
        let selector = ProfileSelector::load(dir.path());
        assert_eq!(selector.active(), DEFAULT_PROFILE);
    }
}
