pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_lookup};
pub use schema::{Config, ConfigOverrides};
