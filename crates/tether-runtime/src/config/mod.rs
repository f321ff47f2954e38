//! Host configuration.
//!
//! Settings come from defaults, `tether.toml` / `tether.yaml` files and
//! `TETHER_*` environment variables, layered by [`ConfigLoader`].

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config};
pub use schema::{
    FailurePolicy, HostSettings, LogFormat, LogLevel, LogOutput, LoggingConfig, SpanEventConfig,
    TetherConfig,
};
