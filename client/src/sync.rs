use std::fmt;

use gloo_net::http::Request;

use warmap_shared::{GameInfo, Territory, TerritoryId};

/// Fetch failures. Both kinds degrade the same way — a console diagnostic
/// and no state change — but they are carried distinctly so the log says
/// which side misbehaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    Network(String),
    Decode(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Network(e) => write!(f, "network error: {e}"),
            SyncError::Decode(e) => write!(f, "decode error: {e}"),
        }
    }
}

/// Game id from the navigation path: the last non-empty segment, so
/// `/abc123`, `/lobby/abc123`, and `/lobby/abc123/` all yield `abc123`.
pub fn game_id_from_path() -> Option<String> {
    let path = web_sys::window()?.location().pathname().ok()?;
    last_path_segment(&path)
}

fn last_path_segment(path: &str) -> Option<String> {
    path.rsplit('/').find(|s| !s.is_empty()).map(str::to_string)
}

async fn get_text(url: &str) -> Result<String, SyncError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| SyncError::Network(e.to_string()))?;
    if !resp.ok() {
        return Err(SyncError::Network(format!("HTTP {}", resp.status())));
    }
    resp.text().await.map_err(|e| SyncError::Network(e.to_string()))
}

/// Decode the `/territoriesInfo` body, sorted ascending by id so the store
/// can index by position.
pub fn decode_territories(body: &str) -> Result<Vec<Territory>, SyncError> {
    let mut territories: Vec<Territory> =
        serde_json::from_str(body).map_err(|e| SyncError::Decode(e.to_string()))?;
    territories.sort_by_key(|t| t.id);
    Ok(territories)
}

pub fn decode_territory(body: &str) -> Result<Territory, SyncError> {
    serde_json::from_str(body).map_err(|e| SyncError::Decode(e.to_string()))
}

pub fn decode_game_info(body: &str) -> Result<GameInfo, SyncError> {
    serde_json::from_str(body).map_err(|e| SyncError::Decode(e.to_string()))
}

/// Fetch all territories for the active game.
pub async fn fetch_territories(game_id: &str) -> Result<Vec<Territory>, SyncError> {
    let body = get_text(&format!("/territoriesInfo/{game_id}")).await?;
    decode_territories(&body)
}

/// Fetch one territory's authoritative state (point refresh).
pub async fn fetch_territory(id: TerritoryId, game_id: &str) -> Result<Territory, SyncError> {
    let body = get_text(&format!("/territoryInfo/{id}/{game_id}")).await?;
    decode_territory(&body)
}

/// Fetch the player roster and turn counter.
pub async fn fetch_game_info(game_id: &str) -> Result<GameInfo, SyncError> {
    let body = get_text(&format!("/gameInfo/{game_id}")).await?;
    decode_game_info(&body)
}

/// Confirm an optimistic increment with the authority. Acknowledgement
/// only; the body is never folded back into the store.
pub async fn confirm_add_armies(
    count: u32,
    id: TerritoryId,
    game_id: &str,
) -> Result<(), SyncError> {
    get_text(&format!("/addArmiesToTerritory/{count}/{id}/{game_id}"))
        .await
        .map(|_| ())
}

/// Ask the authority to advance the turn. On success the caller reloads
/// game info in full.
pub async fn request_end_turn(game_id: &str) -> Result<(), SyncError> {
    get_text(&format!("/endTurn/{game_id}")).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::{SyncError, decode_game_info, decode_territories, decode_territory, last_path_segment};

    #[test]
    fn game_id_is_the_last_nonempty_path_segment() {
        assert_eq!(last_path_segment("/abc123").as_deref(), Some("abc123"));
        assert_eq!(last_path_segment("/lobby/abc123").as_deref(), Some("abc123"));
        assert_eq!(last_path_segment("/lobby/abc123/").as_deref(), Some("abc123"));
        assert_eq!(last_path_segment("/"), None);
        assert_eq!(last_path_segment(""), None);
    }

    #[test]
    fn territories_decode_sorted_by_id() {
        let body = r#"[
            {"id":2,"owner":{"name":"Bob"},"armies":1},
            {"id":0,"owner":{"name":"Alice"},"armies":0},
            {"id":1,"owner":{"name":"Alice"},"armies":3}
        ]"#;
        let territories = decode_territories(body).unwrap();
        let ids: Vec<usize> = territories.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(territories[2].owner.name, "Bob");
    }

    #[test]
    fn malformed_territories_body_is_a_decode_error() {
        let err = decode_territories(r#"{"not":"a list"}"#).unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }

    #[test]
    fn single_territory_decodes() {
        let territory = decode_territory(r#"{"id":3,"owner":{"name":"Bob"},"armies":9}"#).unwrap();
        assert_eq!(territory.id, 3);
        assert_eq!(territory.armies, 9);
    }

    #[test]
    fn game_info_decodes() {
        let info =
            decode_game_info(r#"{"players":[{"name":"Alice"},{"name":"Bob"}],"turn":1}"#).unwrap();
        assert_eq!(info.current_player().unwrap().name, "Bob");
    }

    #[test]
    fn truncated_game_info_is_a_decode_error() {
        let err = decode_game_info(r#"{"players":[{"name":"Alice"}]"#).unwrap_err();
        assert!(matches!(err, SyncError::Decode(_)));
    }
}
