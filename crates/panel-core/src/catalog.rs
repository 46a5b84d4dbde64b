use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One show from the externally supplied catalog.  The `url` is the unique
/// identifier the bridge understands; the panel never mutates these records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Show {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    /// Optional display hint (card background colour).
    #[serde(default)]
    pub color: Option<String>,
}

/// Intermediate struct that matches the catalog JSON document.
/// Kept separate from `Show` so the document schema can grow without
/// touching the in-memory type.
#[derive(Debug, Deserialize)]
struct CatalogDoc {
    #[serde(default)]
    shows: Vec<Show>,
}

pub fn parse_catalog_str(content: &str) -> anyhow::Result<Vec<Show>> {
    let doc: CatalogDoc = serde_json::from_str(content)?;
    Ok(doc.shows)
}

/// Fetches the catalog document over HTTP.
///
/// A failed or malformed fetch is an error here; the panel treats it as an
/// empty catalog at the call site (logged, never fatal).
pub struct CatalogSource {
    url: String,
    cache_bust: bool,
    client: reqwest::Client,
}

impl CatalogSource {
    pub fn new(url: String, cache_bust: bool) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            url,
            cache_bust,
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> anyhow::Result<Vec<Show>> {
        let url = if self.cache_bust {
            let sep = if self.url.contains('?') { '&' } else { '?' };
            format!("{}{}t={}", self.url, sep, chrono::Utc::now().timestamp_millis())
        } else {
            self.url.clone()
        };
        tracing::debug!("fetching catalog from {}", url);
        let resp = self.client.get(&url).send().await?.error_for_status()?;
        let body = resp.text().await?;
        let shows = parse_catalog_str(&body)?;
        tracing::info!("catalog loaded: {} shows", shows.len());
        Ok(shows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let json = r#"{
            "shows": [
                {"url": "show://alpha", "name": "Alpha", "image": "http://x/a.jpg",
                 "description": "First one", "color": "#112233"},
                {"url": "show://bravo", "name": "Bravo"}
            ]
        }"#;
        let shows = parse_catalog_str(json).unwrap();
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].url, "show://alpha");
        assert_eq!(shows[0].color.as_deref(), Some("#112233"));
        // Missing optional fields default to empty
        assert_eq!(shows[1].image, "");
        assert_eq!(shows[1].description, "");
        assert!(shows[1].color.is_none());
    }

    #[test]
    fn test_parse_catalog_empty_document() {
        let shows = parse_catalog_str("{}").unwrap();
        assert!(shows.is_empty());
    }

    #[test]
    fn test_parse_catalog_malformed() {
        assert!(parse_catalog_str("not json").is_err());
        assert!(parse_catalog_str(r#"{"shows": [{"name": "no url"}]}"#).is_err());
    }
}
