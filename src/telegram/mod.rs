//! Telegram front-end
//!
//! ```text
//! telegram/
//! ├── mod.rs           # This file - public API
//! ├── bot.rs           # Bot instance, dispatcher, command handling
//! ├── logins.rs        # One running login per chat, cancellation tokens
//! └── formatters.rs    # HTML message formatters
//! ```
//!
//! The bot only glues commands to `LoginFlow`; all protocol and aggregation
//! work lives outside this module.

pub mod bot;
pub mod formatters;
pub mod logins;

pub use bot::{Command, TelegramBot};
pub use formatters::html_escape;
pub use logins::{ActiveLogins, LoginSlot};
