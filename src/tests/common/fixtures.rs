//! Test Fixtures

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::dex::{
    AbilityCache, AbilitySlot, BaseStat, DatasetSource, DatasetStore, DexService, LoadError,
    Pokemon, Sprites, StatKind,
};

// =============================================================================
// Record Fixtures
// =============================================================================

/// Build a record with six flat stats and one visible ability.
pub fn pokemon(id: u32, name: &str, types: &[&str]) -> Pokemon {
    Pokemon {
        id,
        name: name.to_string(),
        height: 7,
        weight: 69,
        base_experience: Some(64),
        types: types.iter().map(|t| t.to_string()).collect(),
        abilities: vec![AbilitySlot {
            name: format!("{name}-ability"),
            url: format!("https://pokeapi.co/api/v2/ability/{id}/"),
            is_hidden: false,
            slot: 1,
        }],
        stats: StatKind::ALL
            .iter()
            .map(|&name| BaseStat {
                name,
                base_stat: 50,
                effort: 0,
            })
            .collect(),
        sprites: Sprites {
            front_default: Some(format!(
                "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{id}.png"
            )),
            ..Sprites::default()
        },
    }
}

/// Ten records in ascending id order. The "fire" set and the "char" name set
/// overlap without being equal (ponyta is fire, charjabug is not).
pub fn starter_records() -> Vec<Pokemon> {
    vec![
        pokemon(1, "bulbasaur", &["grass", "poison"]),
        pokemon(4, "charmander", &["fire"]),
        pokemon(5, "charmeleon", &["fire"]),
        pokemon(6, "charizard", &["fire", "flying"]),
        pokemon(7, "squirtle", &["water"]),
        pokemon(25, "pikachu", &["electric"]),
        pokemon(77, "ponyta", &["fire"]),
        pokemon(152, "chikorita", &["grass"]),
        pokemon(158, "totodile", &["water"]),
        pokemon(737, "charjabug", &["bug", "electric"]),
    ]
}

/// Serialize records into the keyed-by-id source format.
pub fn dataset_json(records: &[Pokemon]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = records
        .iter()
        .map(|r| {
            (
                r.id.to_string(),
                serde_json::to_value(r).expect("record serializes"),
            )
        })
        .collect();
    serde_json::to_string_pretty(&serde_json::Value::Object(map)).expect("dataset serializes")
}

// =============================================================================
// Dataset Sources
// =============================================================================

/// In-memory source that counts reads. `None` text behaves like a missing file.
pub struct StaticSource {
    text: Option<String>,
    delay: Duration,
    reads: AtomicUsize,
}

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            delay: Duration::ZERO,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn missing() -> Self {
        Self {
            text: None,
            delay: Duration::ZERO,
            reads: AtomicUsize::new(0),
        }
    }

    /// Hold each read open for `delay` so concurrent callers pile up.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    fn name(&self) -> String {
        "static".to_string()
    }

    async fn read(&self) -> Result<String, LoadError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.text
            .clone()
            .ok_or_else(|| LoadError::SourceNotFound {
                path: "static://missing".into(),
            })
    }
}

// =============================================================================
// Service Fixtures
// =============================================================================

/// Ability cache with a short timeout for tests.
pub fn test_ability_cache() -> AbilityCache {
    AbilityCache::new(Duration::from_secs(2), "en")
}

/// Service over `records`, plus the source so tests can count reads.
pub fn service_with(records: &[Pokemon]) -> (DexService, Arc<StaticSource>) {
    let source = Arc::new(StaticSource::new(dataset_json(records)));
    let service = DexService::new(DatasetStore::new(source.clone()), test_ability_cache());
    (service, source)
}

/// Service whose dataset source does not exist.
pub fn service_without_dataset() -> (DexService, Arc<StaticSource>) {
    let source = Arc::new(StaticSource::missing());
    let service = DexService::new(DatasetStore::new(source.clone()), test_ability_cache());
    (service, source)
}
