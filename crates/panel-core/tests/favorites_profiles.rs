//! End-to-end favorites + profile scenarios over a real temp data dir.

use panel_core::catalog::Show;
use panel_core::favorites::{self, FavoritesStore, SLOT_COUNT};
use panel_core::profile::ProfileSelector;

fn show(url: &str, name: &str) -> Show {
    Show {
        url: url.to_string(),
        name: name.to_string(),
        image: String::new(),
        description: String::new(),
        color: None,
    }
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::new(dir.path().to_path_buf());

    let slots = vec![
        Some("show://a".to_string()),
        None,
        Some("show://b".to_string()),
        None,
        None,
    ];
    store.save("timur", &slots).unwrap();
    assert_eq!(store.load("timur"), slots);
}

#[test]
fn corrupt_state_is_treated_as_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::new(dir.path().to_path_buf());

    std::fs::write(dir.path().join("favorites_timur.json"), "{not json").unwrap();
    assert!(store.load("timur").is_empty());
}

#[test]
fn seeding_uses_catalog_order_and_pads_short_catalogs() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::new(dir.path().to_path_buf());

    // Deliberately not alphabetical: seeding must keep catalog order.
    let catalog = vec![show("z", "Zed"), show("a", "Alpha"), show("b", "Bravo")];

    let current = store.load("timur");
    let seeded = store.seed_if_empty("timur", current, &catalog);

    assert_eq!(seeded.len(), SLOT_COUNT);
    assert_eq!(seeded[0].as_deref(), Some("z"));
    assert_eq!(seeded[1].as_deref(), Some("a"));
    assert_eq!(seeded[2].as_deref(), Some("b"));
    assert!(seeded[3].is_none() && seeded[4].is_none());

    // Seeding persists, and a second pass leaves the list alone.
    assert_eq!(store.load("timur"), seeded);
    let again = store.seed_if_empty("timur", seeded.clone(), &catalog);
    assert_eq!(again, seeded);
}

#[test]
fn seeding_waits_for_a_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::new(dir.path().to_path_buf());

    let seeded = store.seed_if_empty("timur", Vec::new(), &[]);
    assert!(seeded.is_empty());
    assert!(store.load("timur").is_empty());
}

#[test]
fn set_slot_persists_the_moved_show() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::new(dir.path().to_path_buf());

    let slots = store.set_slot("timur", Vec::new(), "show://a", 0);
    let slots = store.set_slot("timur", slots, "show://b", 1);
    // Moving "a" to slot 3 clears slot 0 first.
    let slots = store.set_slot("timur", slots, "show://a", 3);

    assert_eq!(slots[0], None);
    assert_eq!(slots[1].as_deref(), Some("show://b"));
    assert_eq!(slots[3].as_deref(), Some("show://a"));
    assert_eq!(store.load("timur"), slots);
}

#[test]
fn profiles_keep_separate_favorites() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::new(dir.path().to_path_buf());
    let mut selector = ProfileSelector::load(dir.path());

    let catalog = vec![show("a", "Alpha"), show("b", "Bravo")];
    let timur = store.seed_if_empty(selector.active(), store.load(selector.active()), &catalog);
    assert_eq!(favorites::resolve(&timur, &catalog).len(), 2);

    // Switching to a profile with no stored favorites starts empty.
    assert!(selector.switch_to("jackie"));
    let jackie = store.load(selector.active());
    assert!(favorites::is_unseeded(&jackie));
    assert!(favorites::resolve(&jackie, &catalog).is_empty());

    // And timur's list is still on disk, untouched.
    assert_eq!(store.load("timur"), timur);
}

#[test]
fn resolve_filters_stale_references_after_catalog_change() {
    let dir = tempfile::tempdir().unwrap();
    let store = FavoritesStore::new(dir.path().to_path_buf());

    let old_catalog = vec![show("a", "Alpha"), show("b", "Bravo"), show("c", "Chaos")];
    let slots = store.seed_if_empty("timur", Vec::new(), &old_catalog);

    // "b" disappears from the next catalog snapshot: filtered, not repaired.
    let new_catalog = vec![show("a", "Alpha"), show("c", "Chaos")];
    let resolved = favorites::resolve(&slots, &new_catalog);
    let urls: Vec<&str> = resolved.iter().map(|s| s.url.as_str()).collect();
    assert_eq!(urls, vec!["a", "c"]);

    // The persisted slots keep the stale identifier.
    assert_eq!(store.load("timur"), slots);
}
