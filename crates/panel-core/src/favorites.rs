//! Per-profile favorites — five ordered slots, persisted as one JSON file
//! per profile under the data dir.

use std::path::{Path, PathBuf};

use crate::catalog::Show;

pub const SLOT_COUNT: usize = 5;

/// A favorites list is an ordered sequence of slots; empty slots are
/// explicit `None`s so slot positions survive serialization.
pub type Slots = Vec<Option<String>>;

/// True when no slot holds a show — both the freshly-loaded empty list and
/// an all-`None` list count.
pub fn is_unseeded(slots: &[Option<String>]) -> bool {
    slots.iter().all(|s| s.is_none())
}

/// Pad to five slots, clear any slot already holding `show_url`, then
/// overwrite `slot`.  A show can never occupy two slots.
///
/// `slot` must be 0–4; the panel only ever offers those five.
pub fn assign_slot(mut slots: Slots, show_url: &str, slot: usize) -> Slots {
    debug_assert!(slot < SLOT_COUNT);
    while slots.len() < SLOT_COUNT {
        slots.push(None);
    }
    for s in slots.iter_mut() {
        if s.as_deref() == Some(show_url) {
            *s = None;
        }
    }
    slots[slot] = Some(show_url.to_string());
    slots
}

/// Map occupied slots through the catalog, in slot order.  Empty slots and
/// identifiers absent from the current catalog (stale references) are
/// dropped, not repaired.
pub fn resolve(favorites: &[Option<String>], catalog: &[Show]) -> Vec<Show> {
    favorites
        .iter()
        .flatten()
        .filter_map(|url| catalog.iter().find(|s| &s.url == url))
        .cloned()
        .collect()
}

pub struct FavoritesStore {
    data_dir: PathBuf,
}

impl FavoritesStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn slots_path(&self, profile_id: &str) -> PathBuf {
        self.data_dir.join(format!("favorites_{}.json", profile_id))
    }

    /// Load the persisted slots for a profile.  Missing file or corrupt
    /// contents are treated identically to "no data": an empty list,
    /// awaiting seeding.
    pub fn load(&self, profile_id: &str) -> Slots {
        load_slots(&self.slots_path(profile_id))
    }

    pub fn save(&self, profile_id: &str, slots: &[Option<String>]) -> anyhow::Result<()> {
        let path = self.slots_path(profile_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(slots)?;
        std::fs::write(&path, json)?;
        Ok(())
    }

    /// Seed an unseeded list from the first five catalog entries, in catalog
    /// order (not alphabetical), and persist.  Anything already seeded is
    /// returned untouched.
    pub fn seed_if_empty(&self, profile_id: &str, current: Slots, catalog: &[Show]) -> Slots {
        if !is_unseeded(&current) || catalog.is_empty() {
            return current;
        }
        let mut slots: Slots = catalog
            .iter()
            .take(SLOT_COUNT)
            .map(|s| Some(s.url.clone()))
            .collect();
        slots.resize(SLOT_COUNT, None);
        if let Err(e) = self.save(profile_id, &slots) {
            tracing::warn!("failed to persist seeded favorites for {}: {}", profile_id, e);
        } else {
            tracing::info!(
                "seeded {} favorites for profile {}",
                slots.iter().flatten().count(),
                profile_id
            );
        }
        slots
    }

    /// Assign `show_url` to `slot` and persist the result.
    pub fn set_slot(&self, profile_id: &str, current: Slots, show_url: &str, slot: usize) -> Slots {
        let slots = assign_slot(current, show_url, slot);
        if let Err(e) = self.save(profile_id, &slots) {
            tracing::warn!("failed to persist favorites for {}: {}", profile_id, e);
        }
        slots
    }
}

fn load_slots(path: &Path) -> Slots {
    if let Ok(content) = std::fs::read_to_string(path) {
        if let Ok(slots) = serde_json::from_str::<Slots>(&content) {
            return slots;
        }
        tracing::debug!("unreadable favorites file {}, starting empty", path.display());
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(url: &str, name: &str) -> Show {
        Show {
            url: url.to_string(),
            name: name.to_string(),
            image: String::new(),
            description: String::new(),
            color: None,
        }
    }

    fn slots(urls: &[Option<&str>]) -> Slots {
        urls.iter().map(|u| u.map(str::to_string)).collect()
    }

    #[test]
    fn test_assign_slot_overwrites() {
        let before = slots(&[Some("a"), None, None, None, None]);
        let after = assign_slot(before, "b", 0);
        assert_eq!(after, slots(&[Some("b"), None, None, None, None]));
    }

    #[test]
    fn test_assign_slot_moves_existing() {
        let before = slots(&[Some("a"), Some("b"), None, None, None]);
        let after = assign_slot(before, "a", 3);
        assert_eq!(after, slots(&[None, Some("b"), None, Some("a"), None]));
    }

    #[test]
    fn test_assign_slot_pads_short_lists() {
        let after = assign_slot(Vec::new(), "a", 4);
        assert_eq!(after.len(), SLOT_COUNT);
        assert_eq!(after[4].as_deref(), Some("a"));
        assert!(after[..4].iter().all(|s| s.is_none()));
    }

    #[test]
    fn test_assign_slot_never_duplicates() {
        let mut current = slots(&[Some("a"), Some("b"), Some("c"), None, None]);
        for (url, slot) in [("a", 2), ("b", 0), ("c", 4), ("a", 1)] {
            current = assign_slot(current, url, slot);
            let occurrences = current.iter().flatten().filter(|u| *u == url).count();
            assert_eq!(occurrences, 1, "{} duplicated in {:?}", url, current);
        }
    }

    #[test]
    fn test_resolve_drops_stale_and_empty() {
        let catalog = vec![show("a", "Alpha"), show("b", "Bravo")];
        let favs = slots(&[Some("b"), None, Some("gone"), Some("a"), None]);
        let resolved = resolve(&favs, &catalog);
        let names: Vec<&str> = resolved.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Bravo", "Alpha"]);
    }

    #[test]
    fn test_resolve_empty_catalog() {
        let favs = slots(&[Some("a"), Some("b"), None, None, None]);
        assert!(resolve(&favs, &[]).is_empty());
    }

    #[test]
    fn test_is_unseeded() {
        assert!(is_unseeded(&[]));
        assert!(is_unseeded(&slots(&[None, None, None, None, None])));
        assert!(!is_unseeded(&slots(&[None, Some("a"), None, None, None])));
    }
}
