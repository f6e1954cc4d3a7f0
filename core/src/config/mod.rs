//! Layered client configuration.
//!
//! 1. Defaults (from code)
//! 2. Config file (`srenity.toml`)
//! 3. Environment variables (`SRENITY_` prefix, `__` between nested keys)
//!
//! ```no_run
//! use srenity_core::config::ConfigLoader;
//!
//! let config = ConfigLoader::load_default()?;
//! println!("{}", config.backend.base_url);
//! # Ok::<(), srenity_core::config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;

pub use error::ConfigError;
pub use error::Result;
pub use loader::AppConfig;
pub use loader::BackendConfig;
pub use loader::ConfigLoader;
pub use loader::DisplayConfig;
