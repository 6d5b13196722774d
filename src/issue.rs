use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A reported problem, as submitted by the frontend. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, deserialize_with = "loose_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub email: Option<String>,
}

impl IssueRecord {
    /// The user record the CLI confirmation flow sends to: the given phone number plus
    /// whatever reporter details the issue carries.
    pub fn reporter(&self, phone_number: &str) -> UserRecord {
        UserRecord {
            phone_number: present(phone_number),
            display_name: self.user_name.clone(),
            email: self.user_email.clone(),
        }
    }
}

fn present(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// Frontends send ids as numbers as often as strings; null and blank mean "not given".
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    Ok(match value {
        Value::String(s) => present(&s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}
