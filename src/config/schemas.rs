//! Configuration schemas - every config structure defined once with defaults
//!
//! Each struct is declared through `config_struct!`, so the TOML file may omit
//! any field and still deserialize.
use crate::config_struct;

// ============================================================================
// TELEGRAM CONFIGURATION
// ============================================================================

config_struct! {
    /// Telegram bot front-end
    pub struct TelegramConfig {
        /// Bot token from @BotFather (SKINCHECK_BOT_TOKEN overrides it)
        bot_token: String = String::new(),

        /// Ignore commands sent from groups and channels
        private_chats_only: bool = true,
    }
}

// ============================================================================
// EPIC GAMES CONFIGURATION
// ============================================================================

config_struct! {
    /// Epic Games account service settings
    ///
    /// The client tokens are pre-encoded `basic` credentials. Epic revokes
    /// public client ids from time to time; replace them here when the
    /// service token request starts failing with 400/401.
    pub struct EpicConfig {
        /// Client used for client_credentials and device_code grants
        switch_client_token: String = "OThmN2U0MmMyZTNhNGY4NmE3NGViNDNmYmI0MWVkMzk6MGEyNDQ5YTItMDAxYS00NTFlLWFmZWMtM2U4MTI5MDFjNGQ3".to_string(),

        /// Client used for the final exchange_code grant
        ios_client_token: String = "M2Y2OWU1NmM3NjQ5NDkyYzhjYzI5ZjFhZjA4YThhMTI6YjUxZWU5Y2IxMjIzNGY1MGE2OWVmYTY3ZWY1MzgxMmU=".to_string(),

        /// Delay between device code token attempts
        poll_interval_secs: u64 = 10,

        /// Per-request timeout for every Epic endpoint
        request_timeout_secs: u64 = 30,

        /// Empty = DeviceAuthGenerator/<os>/<arch>
        user_agent: String = String::new(),
    }
}

// ============================================================================
// COSMETICS CATALOG CONFIGURATION
// ============================================================================

config_struct! {
    /// External cosmetics catalog (fortnite-api.com compatible)
    pub struct CatalogConfig {
        base_url: String = "https://fortnite-api.com".to_string(),

        /// Maximum ids per search request
        batch_size: usize = 50,

        timeout_secs: u64 = 15,

        /// 0 disables the client-side limiter
        rate_limit_per_minute: usize = 0,

        language: String = "en".to_string(),
    }
}

// ============================================================================
// LOCKER CONFIGURATION
// ============================================================================

config_struct! {
    /// Locker aggregation reference data
    pub struct LockerConfig {
        /// One cosmetic id per line; order is the presentation order of the exclusive bucket
        exclusive_list_path: String = "exclusive.txt".to_string(),

        /// One cosmetic id per line; feeds the popular bucket
        popular_list_path: String = "most_wanted.txt".to_string(),

        /// Exclusives listed in the one-line account summary
        summary_exclusive_limit: usize = 10,
    }
}

// ============================================================================
// BRANDING CONFIGURATION
// ============================================================================

config_struct! {
    /// Texts that differ between branded deployments of the same bot
    pub struct BrandingConfig {
        bot_name: String = "Skin Checker".to_string(),

        /// Appended to the final message of every check (HTML allowed)
        footer: String = String::new(),
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sub-configurations
    pub struct Config {
        telegram: TelegramConfig = TelegramConfig::default(),
        epic: EpicConfig = EpicConfig::default(),
        catalog: CatalogConfig = CatalogConfig::default(),
        locker: LockerConfig = LockerConfig::default(),
        branding: BrandingConfig = BrandingConfig::default(),
    }
}
