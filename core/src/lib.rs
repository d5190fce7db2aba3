pub mod config;
pub mod params;
pub mod store;
pub mod telemetry;

pub use config::{AppConfig, ConfigError};
pub use params::Params;
pub use store::Store;

pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::params::Params;
    pub use crate::store::Store;
}
