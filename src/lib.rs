/// dexserve - Pokédex reference-data service
///
/// Serves creature records from a dataset loaded once into memory, with
/// generation and substring queries, and resolves ability text from the
/// upstream API through a process-wide cache.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
