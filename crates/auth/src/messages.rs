//! User-facing login messages

use crate::error::LoginError;
use serde::{Deserialize, Serialize};

/// Language of the messages shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "zh-CN", alias = "zh")]
    ZhCn,
    #[serde(rename = "en", alias = "en-US")]
    En,
}

/// Generic message for a login that failed without a server explanation
pub const fn login_failed(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhCn => "登录失败",
        Locale::En => "Login failed",
    }
}

/// Message to show for a failed login
///
/// The server's own message wins; the localized generic string covers
/// everything else.
pub fn user_facing_message(error: &LoginError, locale: Locale) -> String {
    error
        .server_message()
        .unwrap_or_else(|| login_failed(locale).to_string())
}
