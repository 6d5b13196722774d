use crate::config::Config;
use crate::issue::{IssueRecord, UserRecord};
use crate::log::Logger;
use crate::message;
use crate::whatsapp::{SendResult, WhatsAppClient};

/// What a flow reports back to its caller. `Delivered` means WhatsApp accepted the message.
#[derive(Debug, Clone)]
pub enum Outcome {
    Delivered {
        message: String,
        details: Option<SendResult>,
    },
    NotDelivered {
        message: String,
        error: Option<String>,
        details: Option<SendResult>,
    },
}

impl Outcome {
    pub fn whatsapp_sent(&self) -> bool {
        matches!(self, Outcome::Delivered { .. })
    }
}

pub struct Notifier<'a> {
    config: &'a Config,
    log: &'a dyn Logger,
}

impl<'a> Notifier<'a> {
    pub fn new(config: &'a Config, log: &'a dyn Logger) -> Self {
        Self { config, log }
    }

    fn client(&self) -> WhatsAppClient<'a> {
        WhatsAppClient::new(self.config, self.log)
    }

    /// Tells the reporter their issue was received. Needs `user.phone_number`.
    pub fn send_issue_confirmation(&self, issue: &IssueRecord, user: &UserRecord) -> Outcome {
        let Some(phone_number) = user.phone_number.as_deref() else {
            self.log
                .warning("No phone number provided for WhatsApp confirmation");

            return Outcome::NotDelivered {
                message: "Phone number is required for WhatsApp confirmation".to_string(),
                error: Some("No phone number provided".to_string()),
                details: None,
            };
        };

        let text = message::confirmation(issue, user);
        let result = self.client().send(phone_number, &text);

        match &result {
            SendResult::Sent(_) => {
                self.log.info(&format!(
                    "Issue confirmation sent successfully to {}",
                    phone_number
                ));

                Outcome::Delivered {
                    message: format!("Issue confirmation sent to {}", phone_number),
                    details: Some(result),
                }
            }
            SendResult::Failed(failure) => {
                self.log.error(&format!(
                    "Failed to send issue confirmation to {}: {}",
                    phone_number,
                    failure.detail
                ));

                Outcome::NotDelivered {
                    message: format!(
                        "Failed to send WhatsApp confirmation: {}",
                        failure.detail
                    ),
                    error: None,
                    details: Some(result),
                }
            }
        }
    }

    /// Alerts the configured authority number about a new issue.
    pub fn send_authority_alert(&self, issue: &IssueRecord) -> Outcome {
        let text = message::authority_alert(issue);
        let result = self.client().send(&self.config.to_whatsapp, &text);

        match &result {
            SendResult::Sent(_) => {
                self.log.info("Issue alert sent successfully to authorities");

                Outcome::Delivered {
                    message: "Alert sent to authorities".to_string(),
                    details: None,
                }
            }
            SendResult::Failed(failure) => {
                self.log.error(&format!(
                    "Failed to send alert to authorities: {}",
                    failure.detail
                ));

                Outcome::NotDelivered {
                    message: format!("Failed to send alert: {}", failure.detail),
                    error: None,
                    details: Some(result),
                }
            }
        }
    }
}
