use crate::notify::Outcome;
use crate::whatsapp::SendResult;
use chrono::SecondsFormat;
use serde_json::{json, Map, Value};

pub fn send_result(result: &SendResult) -> Value {
    match result {
        SendResult::Sent(delivery) => json!({
            "success": true,
            "messageSid": delivery.message_sid,
            "status": delivery.status,
            "to": delivery.to,
            "timestamp": delivery.timestamp.to_rfc3339_opts(SecondsFormat::Millis, false),
        }),
        SendResult::Failed(failure) => {
            let mut value = json!({
                "success": false,
                "errorKind": failure.kind.as_str(),
                "error": failure.detail,
                "to": failure.to,
                "timestamp": failure.timestamp.to_rfc3339_opts(SecondsFormat::Millis, false),
            });

            if let Some(code) = failure.status_code {
                value["statusCode"] = json!(code);
            }
            if let Some(response) = &failure.response {
                value["response"] = json!(response);
            }

            value
        }
    }
}

pub fn outcome(outcome: &Outcome) -> Value {
    let (message, error, details) = match outcome {
        Outcome::Delivered { message, details } => (message, None, details),
        Outcome::NotDelivered {
            message,
            error,
            details,
        } => (message, error.as_ref(), details),
    };

    let mut body = Map::new();
    body.insert("success".into(), json!(outcome.whatsapp_sent()));
    if let Some(error) = error {
        body.insert("error".into(), json!(error));
    }
    body.insert("message".into(), json!(message));
    body.insert("whatsappSent".into(), json!(outcome.whatsapp_sent()));
    if let Some(details) = details {
        body.insert("details".into(), send_result(details));
    }

    Value::Object(body)
}

/// The envelope printed when an action could not even attempt a send.
pub fn error(error: &dyn std::fmt::Display, message: &str) -> Value {
    json!({
        "success": false,
        "error": error.to_string(),
        "message": message,
    })
}

pub fn render(value: &Value) -> String {
    // A `Value` always serializes.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatsapp::{Delivery, Failure, FailureKind};
    use chrono::Local;

    fn delivery() -> SendResult {
        SendResult::Sent(Delivery {
            message_sid: Some("SM123".to_string()),
            status: Some("queued".to_string()),
            to: "whatsapp:+15550001111".to_string(),
            timestamp: Local::now(),
        })
    }

    fn http_failure() -> SendResult {
        SendResult::Failed(Failure {
            kind: FailureKind::HttpError,
            detail: "HTTP 500".to_string(),
            status_code: Some(500),
            response: Some("oops".to_string()),
            to: "whatsapp:+15550001111".to_string(),
            timestamp: Local::now(),
        })
    }

    #[test]
    fn test_delivered_outcome_shape() {
        let value = outcome(&Outcome::Delivered {
            message: "Issue confirmation sent to +15550001111".to_string(),
            details: Some(delivery()),
        });

        assert_eq!(value["success"], true);
        assert_eq!(value["whatsappSent"], true);
        assert_eq!(value["details"]["success"], true);
        assert_eq!(value["details"]["messageSid"], "SM123");
        assert_eq!(value["details"]["status"], "queued");
        assert_eq!(value["details"]["to"], "whatsapp:+15550001111");
        assert!(value["details"]["timestamp"].is_string());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_alert_success_has_no_details() {
        let value = outcome(&Outcome::Delivered {
            message: "Alert sent to authorities".to_string(),
            details: None,
        });

        assert!(value.get("details").is_none());
        assert_eq!(value["message"], "Alert sent to authorities");
    }

    #[test]
    fn test_http_failure_carries_status_code() {
        let value = outcome(&Outcome::NotDelivered {
            message: "Failed to send alert: HTTP 500".to_string(),
            error: None,
            details: Some(http_failure()),
        });

        assert_eq!(value["success"], false);
        assert_eq!(value["whatsappSent"], false);
        assert_eq!(value["details"]["errorKind"], "http-error");
        assert_eq!(value["details"]["statusCode"], 500);
        assert_eq!(value["details"]["response"], "oops");
    }

    #[test]
    fn test_error_envelope() {
        let value = error(&"File not found: x.json", "Failed to send authority alert");

        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "File not found: x.json",
                "message": "Failed to send authority alert"
            })
        );
    }

    #[test]
    fn test_render_is_indented() {
        let rendered = render(&json!({ "success": true }));
        assert_eq!(rendered, "{\n  \"success\": true\n}");
    }
}
