use crate::error::ConfigError;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;

const ACCOUNT_SID_VAR: &str = "TWILIO_ACCOUNT_SID";
const AUTH_TOKEN_VAR: &str = "TWILIO_AUTH_TOKEN";
const FROM_WHATSAPP_VAR: &str = "FROM_WHATSAPP";
const TO_WHATSAPP_VAR: &str = "TO_WHATSAPP";
const API_BASE_VAR: &str = "TWILIO_API_BASE";
const LOG_FILE_VAR: &str = "WHATSAPP_LOG_FILE";

pub const DEFAULT_FROM_WHATSAPP: &str = "whatsapp:+14155238886";
pub const DEFAULT_TO_WHATSAPP: &str = "whatsapp:+919999999999";
const DEFAULT_API_BASE: &str = "https://api.twilio.com";
const DEFAULT_LOG_FILE: &str = "whatsapp_notifier.log";

#[derive(Clone)]
pub struct Config {
    pub account_sid: String,
    pub auth_token: String,
    pub from_whatsapp: String,
    /// Recipient for authority alerts.
    pub to_whatsapp: String,
    pub api_base: Url,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::MissingVar(name));

        let account_sid = required(ACCOUNT_SID_VAR)?;
        let auth_token = required(AUTH_TOKEN_VAR)?;
        let from_whatsapp =
            var(FROM_WHATSAPP_VAR).unwrap_or_else(|| DEFAULT_FROM_WHATSAPP.to_string());
        let to_whatsapp = var(TO_WHATSAPP_VAR).unwrap_or_else(|| DEFAULT_TO_WHATSAPP.to_string());

        let api_base = var(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(&api_base).map_err(|e| ConfigError::InvalidUrl {
            name: API_BASE_VAR,
            value: api_base.clone(),
            reason: e.to_string(),
        })?;

        Ok(Config {
            account_sid,
            auth_token,
            from_whatsapp,
            to_whatsapp,
            api_base,
        })
    }

    /// The provider's message-creation endpoint for this account.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.as_str().trim_end_matches('/'),
            self.account_sid
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_whatsapp", &self.from_whatsapp)
            .field("to_whatsapp", &self.to_whatsapp)
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

/// Where log lines are appended. `None` when the file sink is switched off.
pub fn log_file() -> Option<PathBuf> {
    match std::env::var(LOG_FILE_VAR) {
        Ok(path) if path.trim().is_empty() => None,
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => Some(PathBuf::from(DEFAULT_LOG_FILE)),
    }
}

/// Credentials `AC123`/`secret` against a provider at `api_base`.
#[cfg(test)]
pub fn test_config(api_base: &str) -> Config {
    let api_base = api_base.to_string();
    Config::from_lookup(move |name| match name {
        ACCOUNT_SID_VAR => Some("AC123".to_string()),
        AUTH_TOKEN_VAR => Some("secret".to_string()),
        API_BASE_VAR => Some(api_base.clone()),
        _ => None,
    })
    .unwrap()
}
