//! Alphabetical show index — groups the catalog into per-letter buckets
//! for the browser's letter-rail navigation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::catalog::Show;

#[derive(Debug, Error)]
pub enum IndexError {
    /// Upstream data contract violation — the catalog must never contain a
    /// show without a name.
    #[error("show {url:?} has an empty name")]
    EmptyShowName { url: String },
}

/// Shows grouped by the uppercased first letter of their name.
///
/// Buckets are ordered by letter ascending; within a bucket shows keep the
/// case-insensitive name sort.  Rebuilt whenever the catalog changes, never
/// persisted.  Building the same catalog twice yields identical output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShowIndex {
    buckets: Vec<(char, Vec<Show>)>,
}

impl ShowIndex {
    pub fn build(catalog: &[Show]) -> Result<Self, IndexError> {
        let mut sorted: Vec<Show> = catalog.to_vec();
        sorted.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        let mut groups: BTreeMap<char, Vec<Show>> = BTreeMap::new();
        for show in sorted {
            let first = show
                .name
                .chars()
                .next()
                .ok_or_else(|| IndexError::EmptyShowName {
                    url: show.url.clone(),
                })?;
            let letter = first.to_uppercase().next().unwrap_or(first);
            groups.entry(letter).or_default().push(show);
        }

        Ok(Self {
            buckets: groups.into_iter().collect(),
        })
    }

    pub fn buckets(&self) -> &[(char, Vec<Show>)] {
        &self.buckets
    }

    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.buckets.iter().map(|(l, _)| *l)
    }

    pub fn bucket(&self, letter: char) -> Option<&[Show]> {
        self.buckets
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, shows)| shows.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of shows across all buckets.
    pub fn show_count(&self) -> usize {
        self.buckets.iter().map(|(_, shows)| shows.len()).sum()
    }
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

    #[test]
    fn test_buckets_sorted_by_letter_and_name() {
        let catalog = vec![
            show("z", "Zed"),
            show("b2", "bravo two"),
            show("a", "Alpha"),
            show("b1", "Bravo One"),
        ];
        let index = ShowIndex::build(&catalog).unwrap();

        let letters: Vec<char> = index.letters().collect();
        assert_eq!(letters, vec!['A', 'B', 'Z']);

        // Case-insensitive within-bucket order
        let b = index.bucket('B').unwrap();
        assert_eq!(b[0].name, "Bravo One");
        assert_eq!(b[1].name, "bravo two");
    }

    #[test]
    fn test_lowercase_names_fold_into_uppercase_bucket() {
        let index = ShowIndex::build(&[show("a", "alpha")]).unwrap();
        assert!(index.bucket('A').is_some());
        assert!(index.bucket('a').is_none());
    }

    #[test]
    fn test_build_is_idempotent() {
        let catalog = vec![show("m", "Mixed"), show("a", "apple"), show("A2", "Apple Pie")];
        let first = ShowIndex::build(&catalog).unwrap();
        let second = ShowIndex::build(&catalog).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_catalog_has_no_buckets() {
        let index = ShowIndex::build(&[]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.show_count(), 0);
    }

    #[test]
    fn test_empty_name_fails_fast() {
        let err = ShowIndex::build(&[show("bad", "")]).unwrap_err();
        match err {
            IndexError::EmptyShowName { url } => assert_eq!(url, "bad"),
        }
    }
}
