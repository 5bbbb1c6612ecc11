pub mod dex;
pub mod logging;
pub mod server;
