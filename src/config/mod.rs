//! Configuration system
//!
//! - `macros.rs`: `config_struct!` for struct + defaults in one declaration
//! - `schemas.rs`: every config section
//! - `utils.rs`: global `CONFIG`, loading and accessors

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{BrandingConfig, CatalogConfig, Config, EpicConfig, LockerConfig, TelegramConfig};
pub use utils::{
    get_config_clone, load_config, load_config_from_path, parse_config, reload_config,
    reload_config_from_path, with_config, BOT_TOKEN_ENV, CONFIG,
};
