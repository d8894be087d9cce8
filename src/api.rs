//! PokeAPI client

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_API_BASE;
use crate::pagination::BatchKind;
use crate::state::{BaseStats, Pokemon};

static API_BASE: OnceLock<String> = OnceLock::new();

/// Sets the base URL used by every request. Only the first call takes effect.
pub fn configure(api_base: &str) {
    let _ = API_BASE.set(api_base.trim_end_matches('/').to_string());
}

fn api_base() -> &'static str {
    API_BASE.get().map(String::as_str).unwrap_or(DEFAULT_API_BASE)
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("pokemon #{id} is malformed: {reason}")]
    Malformed { id: u16, reason: String },
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    species: NamedResource,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(default)]
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

/// Decodes one `/pokemon/{id}` body.
pub fn parse_pokemon(bytes: &[u8]) -> Result<Pokemon, ApiError> {
    let response: PokemonResponse = serde_json::from_slice(bytes)?;
    pokemon_from_response(response)
}

fn pokemon_from_response(response: PokemonResponse) -> Result<Pokemon, ApiError> {
    let id = response.id;

    let mut types = response.types;
    types.sort_by_key(|slot| slot.slot);
    let mut types = types.into_iter().map(|slot| slot.type_info.name);
    let primary_type = types.next().ok_or_else(|| ApiError::Malformed {
        id,
        reason: "no types".to_string(),
    })?;
    let secondary_type = types.next();

    let stats: Vec<u16> = response.stats.iter().map(|slot| slot.base_stat).collect();
    let stats: [u16; 6] = stats
        .get(..6)
        .and_then(|values| values.try_into().ok())
        .ok_or_else(|| ApiError::Malformed {
            id,
            reason: format!("expected 6 stats, got {}", response.stats.len()),
        })?;

    Ok(Pokemon {
        id,
        name: response.species.name,
        primary_type,
        secondary_type,
        image_url: pointer_string(&response.sprites, "/other/official-artwork/front_default"),
        height: response.height,
        weight: response.weight,
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        stats: BaseStats::from_positional(stats),
    })
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
}

pub async fn fetch_pokemon(id: u16) -> Result<Pokemon, ApiError> {
    let url = format!("{}/pokemon/{id}/", api_base());
    let response = http_client().get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            url,
        });
    }
    let bytes = response.bytes().await?;
    parse_pokemon(&bytes)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub id: u16,
    pub error: String,
}

/// Result of one batch, fetched in id order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub records: Vec<Pokemon>,
    pub failures: Vec<FetchFailure>,
}

impl BatchOutcome {
    pub fn fetched_ids(&self) -> Vec<u16> {
        self.records.iter().map(|record| record.id).collect()
    }

    /// Error that stopped the batch, if any.
    pub fn error(&self) -> Option<String> {
        self.failures
            .first()
            .map(|failure| format!("#{}: {}", failure.id, failure.error))
    }
}

/// Fetches `ids` one after another.
///
/// Initial batches skip failing ids; `More` batches stop at the first failure
/// and leave the remaining ids unattempted.
pub async fn fetch_batch(ids: Vec<u16>, kind: BatchKind) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for id in ids {
        match fetch_pokemon(id).await {
            Ok(record) => outcome.records.push(record),
            Err(err) => {
                tracing::warn!(id, batch = kind.label(), error = %err, "pokemon fetch failed");
                outcome.failures.push(FetchFailure {
                    id,
                    error: err.to_string(),
                });
                if kind == BatchKind::More {
                    break;
                }
            }
        }
    }
    tracing::info!(
        batch = kind.label(),
        fetched = outcome.records.len(),
        failed = outcome.failures.len(),
        "batch finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CHARIZARD: &str = r#"{
        "id": 6,
        "name": "charizard",
        "species": { "name": "charizard", "url": "https://pokeapi.co/api/v2/pokemon-species/6/" },
        "height": 17,
        "weight": 905,
        "types": [
            { "slot": 2, "type": { "name": "flying", "url": "" } },
            { "slot": 1, "type": { "name": "fire", "url": "" } }
        ],
        "stats": [
            { "base_stat": 78, "effort": 0, "stat": { "name": "hp", "url": "" } },
            { "base_stat": 84, "effort": 0, "stat": { "name": "attack", "url": "" } },
            { "base_stat": 78, "effort": 0, "stat": { "name": "defense", "url": "" } },
            { "base_stat": 109, "effort": 3, "stat": { "name": "special-attack", "url": "" } },
            { "base_stat": 85, "effort": 0, "stat": { "name": "special-defense", "url": "" } },
            { "base_stat": 100, "effort": 0, "stat": { "name": "speed", "url": "" } }
        ],
        "abilities": [
            { "ability": { "name": "blaze", "url": "" }, "is_hidden": false, "slot": 1 },
            { "ability": { "name": "solar-power", "url": "" }, "is_hidden": true, "slot": 3 }
        ],
        "sprites": {
            "front_default": "https://img.example/sprite/6.png",
            "other": { "official-artwork": { "front_default": "https://img.example/art/6.png" } }
        }
    }"#;

    #[test]
    fn test_parse_pokemon_fields() {
        let record = parse_pokemon(CHARIZARD.as_bytes()).unwrap();
        assert_eq!(record.id, 6);
        assert_eq!(record.name, "charizard");
        assert_eq!(record.primary_type, "fire");
        assert_eq!(record.secondary_type.as_deref(), Some("flying"));
        assert_eq!(record.image_url.as_deref(), Some("https://img.example/art/6.png"));
        assert_eq!((record.height, record.weight), (17, 905));
        assert_eq!(record.abilities, vec!["blaze", "solar-power"]);
        assert_eq!(record.stats.special_attack, 109);
        assert_eq!(record.stats.total(), 534);
    }

    #[test]
    fn test_parse_rejects_short_stats() {
        let body = r#"{
            "id": 1, "species": { "name": "bulbasaur" }, "height": 7, "weight": 69,
            "types": [{ "slot": 1, "type": { "name": "grass" } }],
            "stats": [{ "base_stat": 45 }],
            "abilities": [], "sprites": {}
        }"#;
        let err = parse_pokemon(body.as_bytes()).unwrap_err();
        assert!(matches!(err, ApiError::Malformed { id: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_missing_types() {
        let body = r#"{
            "id": 2, "species": { "name": "ivysaur" }, "height": 10, "weight": 130,
            "types": [],
            "stats": [{ "base_stat": 1 }, { "base_stat": 1 }, { "base_stat": 1 },
                      { "base_stat": 1 }, { "base_stat": 1 }, { "base_stat": 1 }],
            "abilities": [], "sprites": { "other": {} }
        }"#;
        let err = parse_pokemon(body.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "pokemon #2 is malformed: no types");
    }

    #[test]
    fn test_missing_artwork_is_none() {
        let body = CHARIZARD.replace("https://img.example/art/6.png", "");
        let body = body.replace(r#""front_default": """#, r#""front_default": null"#);
        let record = parse_pokemon(body.as_bytes()).unwrap();
        assert_eq!(record.image_url, None);
    }

    #[test]
    fn test_outcome_error_names_first_failure() {
        let outcome = BatchOutcome {
            records: Vec::new(),
            failures: vec![FetchFailure {
                id: 31,
                error: "HTTP 500".into(),
            }],
        };
        assert_eq!(outcome.error().as_deref(), Some("#31: HTTP 500"));
    }
}
