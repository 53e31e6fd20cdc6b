/// Subsystem tags; each maps to a `--debug-<key>` flag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Http,
    Auth,
    Account,
    Profile,
    Catalog,
    Locker,
    Login,
    Telegram,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used by `--debug-<key>` / `--verbose-<key>`
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Http => "http".to_string(),
            LogTag::Auth => "auth".to_string(),
            LogTag::Account => "account".to_string(),
            LogTag::Profile => "profile".to_string(),
            LogTag::Catalog => "catalog".to_string(),
            LogTag::Locker => "locker".to_string(),
            LogTag::Login => "login".to_string(),
            LogTag::Telegram => "telegram".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(name) => name.to_lowercase(),
        }
    }

    /// Uncolored label for the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::Other(name) => name.to_uppercase(),
            tag => tag.to_debug_key().to_uppercase(),
        }
    }

    /// Tag for a `log` facade target: `teloxide::dispatching` -> `TELOXIDE`
    pub fn from_target(target: &str) -> Self {
        let crate_name = target.split("::").next().unwrap_or(target);
        LogTag::Other(crate_name.to_string())
    }
}
