mod config;
mod server;
mod storage;

pub use config::Config;
pub use server::ServerConfig;
pub use storage::StorageConfig;
