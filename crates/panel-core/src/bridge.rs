//! Media bridge — the external automation service that turns playback
//! commands into actual device control.
//!
//! All outbound calls are fire-and-forget: the panel never awaits an
//! acknowledgement and never inspects a response body.  Failures are logged
//! here and nowhere else.  Inbound playback state is polled by the panel at
//! a fixed cadence and pushed into the event loop as a message.

use serde::Deserialize;
use std::time::Duration;

/// Playback status as reported by the bridge's media player entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
}

impl PlaybackStatus {
    fn from_entity_state(state: &str) -> Self {
        match state {
            "playing" => Self::Playing,
            "paused" => Self::Paused,
            _ => Self::Idle,
        }
    }
}

/// Snapshot of the media player entity, refreshed by the ~1 s poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub status: PlaybackStatus,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: f32,
    pub muted: bool,
    pub title: Option<String>,
    pub series: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub artwork: Option<String>,
    pub device_name: Option<String>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Idle,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume: 0.5,
            muted: false,
            title: None,
            series: None,
            season: None,
            episode: None,
            artwork: None,
            device_name: None,
        }
    }
}

impl PlayerState {
    pub fn is_active(&self) -> bool {
        matches!(self.status, PlaybackStatus::Playing | PlaybackStatus::Paused)
    }

    /// Progress ratio 0.0..=1.0, zero when the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Title for the now-playing line: "Series S1E4" when the episode
    /// attributes are all present, otherwise the raw media title.
    pub fn display_title(&self) -> String {
        if let (Some(series), Some(season), Some(episode)) =
            (self.series.as_deref(), self.season, self.episode)
        {
            return format!("{} S{}E{}", series, season, episode);
        }
        self.title
            .clone()
            .unwrap_or_else(|| "Nothing playing".to_string())
    }
}

// ── Entity-state wire format ──────────────────────────────────────────────────

/// Wire shape of the bridge's entity-state response.  Kept separate from
/// `PlayerState` so the attribute naming of the automation platform stays
/// out of the rest of the panel.
#[derive(Debug, Deserialize)]
struct EntityState {
    state: String,
    #[serde(default)]
    attributes: EntityAttributes,
}

#[derive(Debug, Deserialize, Default)]
struct EntityAttributes {
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    media_title: Option<String>,
    #[serde(default)]
    media_series_title: Option<String>,
    #[serde(default)]
    media_season: Option<u32>,
    #[serde(default)]
    media_episode: Option<u32>,
    #[serde(default)]
    entity_picture: Option<String>,
    #[serde(default)]
    media_position: f64,
    #[serde(default)]
    media_duration: f64,
    #[serde(default = "default_volume")]
    volume_level: f32,
    #[serde(default)]
    is_volume_muted: bool,
}

fn default_volume() -> f32 {
    0.5
}

pub fn parse_player_state(body: &str) -> anyhow::Result<PlayerState> {
    let entity: EntityState = serde_json::from_str(body)?;
    Ok(PlayerState {
        status: PlaybackStatus::from_entity_state(&entity.state),
        position_secs: entity.attributes.media_position,
        duration_secs: entity.attributes.media_duration,
        volume: entity.attributes.volume_level.clamp(0.0, 1.0),
        muted: entity.attributes.is_volume_muted,
        title: entity.attributes.media_title,
        series: entity.attributes.media_series_title,
        season: entity.attributes.media_season,
        episode: entity.attributes.media_episode,
        artwork: entity.attributes.entity_picture,
        device_name: entity.attributes.friendly_name,
    })
}

// ── Outbound service calls ────────────────────────────────────────────────────

/// The full set of service calls the panel issues.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    /// Power on the target output device.
    TurnOn,
    PlayPause,
    Next,
    Previous,
    Volume { level: f32 },
    /// Seek to an absolute position in seconds.
    Seek { position_secs: f64 },
    /// Start playback of a show by its catalog identifier.
    PlayShow { url: String },
    /// Best-effort notification that the panel's profile changed.
    SwitchProfile { profile: String },
}

impl ServiceCall {
    /// (domain, service, payload).  `media_player` payloads get the target
    /// entity id injected by the client.
    fn parts(&self) -> (&'static str, &'static str, serde_json::Value) {
        match self {
            Self::TurnOn => ("media_player", "turn_on", serde_json::json!({})),
            Self::PlayPause => ("media_player", "media_play_pause", serde_json::json!({})),
            Self::Next => ("media_player", "media_next_track", serde_json::json!({})),
            Self::Previous => ("media_player", "media_previous_track", serde_json::json!({})),
            Self::Volume { level } => (
                "media_player",
                "volume_set",
                serde_json::json!({ "volume_level": level.clamp(0.0, 1.0) }),
            ),
            Self::Seek { position_secs } => (
                "media_player",
                "media_seek",
                serde_json::json!({ "seek_position": position_secs.max(0.0).floor() as u64 }),
            ),
            Self::PlayShow { url } => ("script", "play_tv_show", serde_json::json!({ "url": url })),
            Self::SwitchProfile { profile } => (
                "script",
                "switch_tv_profile",
                serde_json::json!({ "profile": profile }),
            ),
        }
    }
}

/// HTTP client for the automation bridge.
///
/// The panel holds an `Option<BridgeClient>`; when the bridge is not
/// configured every playback action is a silent no-op at the call site.
pub struct BridgeClient {
    base_url: String,
    token: String,
    entity_id: String,
    client: reqwest::Client,
}

impl BridgeClient {
    pub fn new(base_url: &str, token: &str, entity_id: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            entity_id: entity_id.to_string(),
            client,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Issue a service call.  Fire-and-forget: the outcome is logged and
    /// discarded, never propagated.
    pub async fn call(&self, call: ServiceCall) {
        let (domain, service, mut payload) = call.parts();
        if domain == "media_player" {
            payload["entity_id"] = serde_json::Value::String(self.entity_id.clone());
        }
        let url = format!("{}/api/services/{}/{}", self.base_url, domain, service);
        tracing::debug!("bridge call {}.{}", domain, service);
        let result = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .and_then(|resp| resp.error_for_status());
        if let Err(e) = result {
            tracing::warn!("bridge call {}.{} failed: {}", domain, service, e);
        }
    }

    /// Fetch the media player entity's current state.
    pub async fn fetch_player_state(&self) -> anyhow::Result<PlayerState> {
        let url = format!("{}/api/states/{}", self.base_url, self.entity_id);
        let body = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_player_state(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_entity_state() {
        assert_eq!(PlaybackStatus::from_entity_state("playing"), PlaybackStatus::Playing);
        assert_eq!(PlaybackStatus::from_entity_state("paused"), PlaybackStatus::Paused);
        assert_eq!(PlaybackStatus::from_entity_state("idle"), PlaybackStatus::Idle);
        assert_eq!(PlaybackStatus::from_entity_state("unavailable"), PlaybackStatus::Idle);
    }

    #[test]
    fn test_parse_player_state() {
        let body = r#"{
            "state": "playing",
            "attributes": {
                "friendly_name": "Living Room TV",
                "media_title": "The Pilot",
                "media_series_title": "Some Show",
                "media_season": 2,
                "media_episode": 7,
                "entity_picture": "/api/media_player_proxy/pic",
                "media_position": 93.5,
                "media_duration": 1440.0,
                "volume_level": 0.35,
                "is_volume_muted": false
            }
        }"#;
        let state = parse_player_state(body).unwrap();
        assert_eq!(state.status, PlaybackStatus::Playing);
        assert_eq!(state.display_title(), "Some Show S2E7");
        assert!((state.progress() - 93.5 / 1440.0).abs() < 1e-9);
        assert_eq!(state.device_name.as_deref(), Some("Living Room TV"));
    }

    #[test]
    fn test_parse_player_state_sparse_attributes() {
        let state = parse_player_state(r#"{"state": "idle", "attributes": {}}"#).unwrap();
        assert_eq!(state.status, PlaybackStatus::Idle);
        assert_eq!(state.display_title(), "Nothing playing");
        assert_eq!(state.progress(), 0.0);
        assert_eq!(state.volume, 0.5);
    }

    #[test]
    fn test_display_title_needs_all_episode_fields() {
        let state = PlayerState {
            title: Some("The Pilot".to_string()),
            series: Some("Some Show".to_string()),
            season: Some(1),
            episode: None,
            ..PlayerState::default()
        };
        assert_eq!(state.display_title(), "The Pilot");
    }

    #[test]
    fn test_service_call_parts() {
        let (domain, service, payload) = ServiceCall::TurnOn.parts();
        assert_eq!((domain, service), ("media_player", "turn_on"));
        assert_eq!(payload, serde_json::json!({}));

        let (_, service, payload) = ServiceCall::Volume { level: 1.7 }.parts();
        assert_eq!(service, "volume_set");
        assert_eq!(payload["volume_level"], 1.0);

        let (_, service, payload) = ServiceCall::Seek { position_secs: 12.9 }.parts();
        assert_eq!(service, "media_seek");
        assert_eq!(payload["seek_position"], 12);

        let (domain, service, payload) = ServiceCall::PlayShow {
            url: "show://alpha".to_string(),
        }
        .parts();
        assert_eq!((domain, service), ("script", "play_tv_show"));
        assert_eq!(payload["url"], "show://alpha");

        let (domain, _, payload) = ServiceCall::SwitchProfile {
            profile: "jackie".to_string(),
        }
        .parts();
        assert_eq!(domain, "script");
        assert_eq!(payload["profile"], "jackie");
    }
}
