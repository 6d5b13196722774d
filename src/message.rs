use crate::issue::{IssueRecord, UserRecord};
use chrono::{Local, NaiveDateTime};

const TIMESTAMP_FORMAT: &str = "%d %B %Y at %I:%M %p";

const NOT_AVAILABLE: &str = "N/A";
const NO_DESCRIPTION: &str = "No description provided";
const ANONYMOUS: &str = "Anonymous";

pub fn confirmation(issue: &IssueRecord, user: &UserRecord) -> String {
    format_confirmation(issue, user, Local::now().naive_local())
}

pub fn authority_alert(issue: &IssueRecord) -> String {
    format_authority_alert(issue, Local::now().naive_local())
}

/// The message a reporter receives once their issue has been submitted.
pub fn format_confirmation(issue: &IssueRecord, user: &UserRecord, at: NaiveDateTime) -> String {
    let reporter = user
        .display_name
        .as_deref()
        .or(user.email.as_deref())
        .unwrap_or(ANONYMOUS);

    format!(
        "✅ *Issue Submitted Successfully!*

*Issue ID:* #{}
*Location:* {}

*Description:*
{}

*Reported by:* {}
*Reported on:* {}

We have received your report and will review it shortly. You'll receive updates on the progress via WhatsApp.

*CityPulse Team* 🏙️",
        issue_id(issue),
        location(issue),
        description(issue),
        reporter,
        at.format(TIMESTAMP_FORMAT),
    )
}

/// The message the configured municipal authority receives for a new issue.
pub fn format_authority_alert(issue: &IssueRecord, at: NaiveDateTime) -> String {
    format!(
        "🚨 *New Issue Reported*

*Issue ID:* #{}
*Location:* {}

*Description:*
{}

*Reported by:* {}
*Reported on:* {}

Please review and take appropriate action.

*CityPulse System* 🏙️",
        issue_id(issue),
        location(issue),
        description(issue),
        issue.user_name.as_deref().unwrap_or(ANONYMOUS),
        at.format(TIMESTAMP_FORMAT),
    )
}

fn issue_id(issue: &IssueRecord) -> &str {
    issue.id.as_deref().unwrap_or(NOT_AVAILABLE)
}

fn location(issue: &IssueRecord) -> &str {
    issue
        .address
        .as_deref()
        .or(issue.area.as_deref())
        .unwrap_or(NOT_AVAILABLE)
}

fn description(issue: &IssueRecord) -> &str {
    issue.description.as_deref().unwrap_or(NO_DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 0)
            .unwrap()
    }

    fn line_after<'a>(message: &'a str, label: &str) -> &'a str {
        message
            .lines()
            .find_map(|l| l.strip_prefix(label))
            .unwrap_or_else(|| panic!("no line starting with {label:?} in {message}"))
    }

    fn description_of(message: &str) -> &str {
        let mut lines = message.lines().skip_while(|l| *l != "*Description:*");
        lines.next();
        lines.next().unwrap()
    }

    fn sample_issue() -> IssueRecord {
        IssueRecord {
            id: Some("TEST-001".to_string()),
            address: Some("Bandra West, Mumbai, Maharashtra".to_string()),
            area: Some("Bandra".to_string()),
            description: Some("Broken street light near the station".to_string()),
            user_name: Some("Test User".to_string()),
            user_email: Some("test@example.com".to_string()),
        }
    }

    #[test]
    fn test_confirmation_renders_every_field() {
        let user = UserRecord {
            phone_number: Some("+919923410767".to_string()),
            display_name: Some("Test User".to_string()),
            email: Some("test@example.com".to_string()),
        };

        let message = format_confirmation(&sample_issue(), &user, at());

        assert!(message.starts_with("✅ *Issue Submitted Successfully!*"));
        assert_eq!(line_after(&message, "*Issue ID:* "), "#TEST-001");
        assert_eq!(
            line_after(&message, "*Location:* "),
            "Bandra West, Mumbai, Maharashtra"
        );
        assert_eq!(
            description_of(&message),
            "Broken street light near the station"
        );
        assert_eq!(line_after(&message, "*Reported by:* "), "Test User");
        assert_eq!(
            line_after(&message, "*Reported on:* "),
            "05 March 2024 at 02:07 PM"
        );
        assert!(message.ends_with("*CityPulse Team* 🏙️"));
    }

    #[test]
    fn test_location_falls_back_to_area_then_placeholder() {
        let mut issue = sample_issue();
        issue.address = None;
        let alert = format_authority_alert(&issue, at());
        assert_eq!(line_after(&alert, "*Location:* "), "Bandra");

        issue.area = None;
        let alert = format_authority_alert(&issue, at());
        assert_eq!(line_after(&alert, "*Location:* "), "N/A");
    }

    #[test]
    fn test_missing_description_uses_fallback() {
        let issue = IssueRecord {
            description: None,
            ..sample_issue()
        };

        let confirmation = format_confirmation(&issue, &UserRecord::default(), at());
        let alert = format_authority_alert(&issue, at());

        assert_eq!(description_of(&confirmation), "No description provided");
        assert_eq!(description_of(&alert), "No description provided");
    }

    #[test]
    fn test_confirmation_reporter_prefers_display_name_then_email() {
        let issue = sample_issue();

        let user = UserRecord {
            email: Some("test@example.com".to_string()),
            ..Default::default()
        };
        let message = format_confirmation(&issue, &user, at());
        assert_eq!(line_after(&message, "*Reported by:* "), "test@example.com");

        let message = format_confirmation(&issue, &UserRecord::default(), at());
        assert_eq!(line_after(&message, "*Reported by:* "), "Anonymous");
    }

    #[test]
    fn test_alert_reporter_uses_issue_user_name() {
        let alert = format_authority_alert(&sample_issue(), at());
        assert_eq!(line_after(&alert, "*Reported by:* "), "Test User");

        let alert = format_authority_alert(&IssueRecord::default(), at());
        assert_eq!(line_after(&alert, "*Reported by:* "), "Anonymous");
    }

    #[test]
    fn test_empty_issue_renders_placeholders() {
        let message = format_confirmation(&IssueRecord::default(), &UserRecord::default(), at());

        assert_eq!(line_after(&message, "*Issue ID:* "), "#N/A");
        assert_eq!(line_after(&message, "*Location:* "), "N/A");
    }

    #[test]
    fn test_formatting_is_deterministic_for_a_fixed_time() {
        let issue = sample_issue();
        let user = issue.reporter("+15550001111");

        assert_eq!(
            format_confirmation(&issue, &user, at()),
            format_confirmation(&issue, &user, at())
        );
        assert_eq!(
            format_authority_alert(&issue, at()),
            format_authority_alert(&issue, at())
        );
    }

    #[test]
    fn test_field_contents_pass_through_verbatim() {
        let issue = IssueRecord {
            description: Some("<b>*pothole*</b> & \"water\"".to_string()),
            ..Default::default()
        };

        let alert = format_authority_alert(&issue, at());

        assert_eq!(description_of(&alert), "<b>*pothole*</b> & \"water\"");
    }

    #[test]
    fn test_cli_reporter_without_user_name_shows_email() {
        let issue = IssueRecord {
            user_email: Some("citizen@example.com".to_string()),
            ..Default::default()
        };

        let message = format_confirmation(&issue, &issue.reporter("+15550001111"), at());

        assert_eq!(line_after(&message, "*Reported by:* "), "citizen@example.com");
    }
}
