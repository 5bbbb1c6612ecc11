//! Pokédex data layer.
//!
//! - [`store`]: exactly-once loading of the bulk dataset
//! - [`generation`]: fixed id ranges per generation
//! - [`query`]: name/type substring filters
//! - [`ability`]: cached upstream ability descriptions
//! - [`service`]: validated caller-facing operations over all of the above

pub mod ability;
pub mod error;
pub mod generation;
pub mod query;
pub mod service;
pub mod source;
pub mod store;
pub mod types;

pub use ability::{AbilityCache, CacheStats};
pub use error::{AbilityError, DexError, LoadError, Result};
pub use generation::GenerationRange;
pub use service::DexService;
pub use source::{DatasetSource, FileSource};
pub use store::{Dataset, DatasetStore};
pub use types::{AbilityDescription, AbilitySlot, BaseStat, Pokemon, Sprites, StatKind};
