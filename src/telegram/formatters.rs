//! HTML message formatters
//!
//! Pure builders for every message the bot sends. All upstream strings are
//! escaped before they reach Telegram's HTML parser.

use crate::config::BrandingConfig;
use crate::epic::{AccountMetadata, DeviceCodeChallenge, PublicAccountInfo};
use crate::errors::EpicError;
use crate::locker::{
    LockerSnapshot, BACKPACKS, EMOTES, EXCLUSIVE_BUCKET, GLIDERS, OUTFITS, PICKAXES,
    POPULAR_BUCKET,
};
use crate::profile::{PurchaseSummary, SeasonSummary};

const RULE: &str = "━━━━━━━━━━━";

// ============================================================================
// HELPERS
// ============================================================================

/// Escape HTML special characters
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `johndoe@mail.com` → `j*****e@mail.com`
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    let chars: Vec<char> = local.chars().collect();
    let masked: String = match chars.len() {
        0 | 1 => local.to_string(),
        2 => format!("{}*", chars[0]),
        n => format!("{}{}{}", chars[0], "*".repeat(n - 2), chars[n - 1]),
    };
    format!("{}@{}", masked, domain)
}

/// Keeps the first and last two characters
pub fn mask_account_id(account_id: &str) -> String {
    let chars: Vec<char> = account_id.chars().collect();
    if chars.len() <= 4 {
        return account_id.to_string();
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 4), tail)
}

/// ISO 3166 alpha-2 code as regional indicator symbols; anything else unchanged
pub fn country_to_flag(country_code: &str) -> String {
    let code = country_code.to_ascii_uppercase();
    if code.chars().count() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return country_code.to_string();
    }
    code.chars()
        .filter_map(|c| char::from_u32(c as u32 + 127_397))
        .collect()
}

pub fn bool_to_emoji(value: bool) -> &'static str {
    if value {
        "✅"
    } else {
        "❌"
    }
}

fn section(title: &str) -> String {
    format!("{}\n<b>{}</b>\n{}\n", RULE, title, RULE)
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        html_escape(value)
    }
}

// ============================================================================
// BOT MESSAGES
// ============================================================================

pub fn welcome_message(branding: &BrandingConfig, commands: &str) -> String {
    format!(
        "👋 Welcome to <b>{}</b>!\n\n\
         Check your Fortnite locker and account details by logging in with \
         your Epic Games account. Login happens on Epic's own website; the bot \
         never sees your password and keeps nothing after the check.\n\n{}",
        html_escape(&branding.bot_name),
        html_escape(commands)
    )
}

pub fn help_message(branding: &BrandingConfig, commands: &str) -> String {
    format!(
        "ℹ️ <b>{}</b>\n\n\
         /login sends you an Epic Games activation link. Open it, approve the \
         login and the bot reports your account, purchases, seasons and locker.\n\
         /cancel stops a login that is still waiting for you.\n\n{}",
        html_escape(&branding.bot_name),
        html_escape(commands)
    )
}

pub fn login_link_message(challenge: &DeviceCodeChallenge) -> String {
    format!(
        "🔗 Open <a href=\"{}\">this link</a> to log in to your account.\n\
         Code: <code>{}</code>\n\
         ⏳ Valid for {} minutes. Use /cancel to abort.",
        html_escape(&challenge.verification_url),
        html_escape(&challenge.user_code),
        (challenge.expires_in.as_secs() / 60).max(1)
    )
}

pub fn logged_in_message(display_name: &str) -> String {
    format!(
        "✅ Logged in account <b>{}</b>\n⏳ Loading account data...",
        or_placeholder(display_name, "HIDDEN_ID_ACCOUNT")
    )
}

pub fn account_message(account: &AccountMetadata) -> String {
    let full_name = format!("{} {}", account.name, account.last_name);
    let country = if account.country.is_empty() {
        "US"
    } else {
        account.country.as_str()
    };

    format!(
        "{}\
         #️⃣ Account ID: <code>{}</code>\n\
         📧 Email: {}\n\
         🧑 Display Name: {}\n\
         📛 Full Name: {}\n\
         🌐 Country: {} {}\n\
         🔐 Email Verified: {}\n\
         🔒 Mandatory 2FA Security: {}",
        section("Account Information"),
        html_escape(&mask_account_id(&account.id)),
        html_escape(&mask_email(&account.email)),
        or_placeholder(&account.display_name, "DeletedUser"),
        html_escape(full_name.trim()),
        html_escape(country),
        country_to_flag(country),
        bool_to_emoji(account.email_verified),
        bool_to_emoji(account.tfa_enabled)
    )
}

pub fn connections_message(info: &PublicAccountInfo) -> String {
    let mut message = section("Connected Accounts");

    if let Some(error) = &info.error {
        message.push_str(&format!("⚠️ {}", html_escape(error)));
        return message;
    }
    if info.external_auths.is_empty() {
        message.push_str("No connected accounts.");
        return message;
    }

    for auth in &info.external_auths {
        message.push_str(&format!(
            "\nConnection Type: {}\nExternal Display Name: {}\nDate of Connection: {}\n",
            or_placeholder(&auth.auth_type.to_uppercase(), "?"),
            or_placeholder(&auth.external_display_name, "?"),
            auth.date_added_display()
        ));
    }
    message
}

pub fn activity_message(account: &AccountMetadata, info: &PublicAccountInfo) -> String {
    format!(
        "{}\
         👪 Parental Control: {}\n\
         🏷 Registration Date: {}\n\
         🤯 Headless: {}\n\
         ✏️ Display Name Changes: {}\n\
         ✏️ Display Name Changeable: {}\n\
         #️⃣ Hashed email: {}",
        section("Activity Information"),
        bool_to_emoji(account.minor_verified),
        or_placeholder(&info.creation_date, "?"),
        bool_to_emoji(account.headless),
        account.number_of_display_name_changes,
        bool_to_emoji(account.can_update_display_name),
        bool_to_emoji(account.has_hashed_email)
    )
}

pub fn purchases_message(purchases: &PurchaseSummary) -> String {
    let mut message = format!(
        "{}\
         💰 VBucks: {}\n\
         🎟 Refunds Used: {}\n\
         🎟 Refund Tickets: {}\n\n\
         {}\
         #️⃣ Receipts: {}\n",
        section("Purchases Information"),
        purchases.current_vbucks,
        purchases.refunds_used,
        purchases.refund_credits,
        section("VBucks Purchases"),
        purchases.receipts
    );

    for (value, count) in purchases.packs() {
        message.push_str(&format!("💰 {} VBucks Packs: {}\n", value, count));
    }

    message.push_str(&format!(
        "\n💰 Total VBucks Purchased: {}\n\n\
         {}\
         🎁 Pending Gifts: {}\n\
         🎁 Gifts Sent: {}\n\
         🎁 Gifts Received: {}",
        purchases.total_vbucks_bought,
        section("Gifts Information"),
        purchases.pending_gifts,
        purchases.gifts_sent,
        purchases.gifts_received
    ));
    message
}

pub fn seasons_message(seasons: &SeasonSummary) -> String {
    let mut message = format!(
        "{}\
         🏆 Career Wins: {}\n\
         🎮 Career Matches: {}\n\
         📅 Seasons Played: {}\n\
         ⭐ Account Level: {}\n",
        section("Season History"),
        seasons.career_wins,
        seasons.career_matches,
        seasons.seasons_played,
        seasons.account_level
    );

    if let Some(current) = &seasons.current_season {
        message.push_str(&format!(
            "🎟 Current Season {}: level {}, battle pass {}\n",
            current.season_number,
            current.level,
            bool_to_emoji(current.battle_pass_purchased)
        ));
    }

    if !seasons.seasons.is_empty() {
        message.push('\n');
    }
    for season in &seasons.seasons {
        message.push_str(&format!(
            "Season {}: level {} | BP {} | {} wins | {} matches\n",
            season.season_number,
            season.level,
            bool_to_emoji(season.battle_pass_purchased),
            season.wins,
            season.matches
        ));
    }
    message.trim_end().to_string()
}

pub fn locker_message(locker: &LockerSnapshot) -> String {
    let mut message = format!(
        "{}\
         🧍 Outfits: {}\n\
         🎒 Backpacks: {}\n\
         ⛏️ Pickaxes: {}\n\
         🕺 Emotes: {}\n\
         ✈️ Gliders: {}\n\
         ⭐ Most Wanted Cosmetics: {}\n\
         🌟 Exclusives: {}",
        section("Locker Information"),
        locker.count(OUTFITS),
        locker.count(BACKPACKS),
        locker.count(PICKAXES),
        locker.count(EMOTES),
        locker.count(GLIDERS),
        locker.count(POPULAR_BUCKET),
        locker.count(EXCLUSIVE_BUCKET)
    );

    if !locker.is_complete() {
        message.push_str("\n\n⚠️ Part of the locker could not be loaded, counts may be low.");
    }
    message
}

/// `<outfits> + <first N exclusives joined by " + "> + <vbucks>VB`
pub fn summary_line(locker: &LockerSnapshot, purchases: &PurchaseSummary, limit: usize) -> String {
    let mut parts = vec![locker.count(OUTFITS).to_string()];
    parts.extend(
        locker
            .bucket(EXCLUSIVE_BUCKET)
            .iter()
            .take(limit)
            .map(|record| html_escape(&record.display_name)),
    );
    parts.push(format!("{}VB", purchases.current_vbucks));
    parts.join(" + ")
}

pub fn farewell_message(branding: &BrandingConfig) -> String {
    let mut message = format!("🙏 Thanks for using <b>{}</b>!", html_escape(&branding.bot_name));
    if !branding.footer.is_empty() {
        message.push_str("\n\n");
        message.push_str(&branding.footer);
    }
    message
}

/// Text shown to the user when a login ends without a report
pub fn login_error_message(error: &EpicError) -> String {
    match error {
        EpicError::Cancelled => "🛑 Login cancelled.".to_string(),
        e if e.is_user_facing() => format!("❌ {}", e.user_message()),
        _ => "❌ Something went wrong while checking the account, please try again later."
            .to_string(),
    }
}
