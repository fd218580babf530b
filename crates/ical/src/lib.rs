//! RFC5545 calendar rendering.

use chrono::{TimeZone, Utc};

/// Everything the projector needs about one materialized event; callers
/// (the gateway) assemble this by joining `oncall_store::Tables`.
pub struct CalendarEvent {
    pub event_id: i64,
    pub team_name: String,
    pub role_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub start: i64,
    pub end: i64,
    /// `(mode, destination)` contact lines, only rendered when `contact`.
    pub contacts: Vec<(String, String)>,
}

fn fold_utc(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y%m%dT%H%M%SZ").to_string())
        .unwrap_or_else(|| "19700101T000000Z".to_string())
}

fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

fn render_vevent(event: &CalendarEvent, contact: bool) -> String {
    let summary = format!(
        "{} {} shift: {}",
        event.team_name, event.role_name, event.full_name
    );
    let mut description = event.full_name.clone();
    if contact {
        for (mode, destination) in &event.contacts {
            description.push('\n');
            description.push_str(&format!("{mode}: {destination}"));
        }
    }

    let mut lines = vec![
        "BEGIN:VEVENT".to_string(),
        format!("UID:event-{}@oncall", event.event_id),
        format!("DTSTART:{}", fold_utc(event.start)),
        format!("DTEND:{}", fold_utc(event.end)),
        format!("SUMMARY:{}", escape_text(&summary)),
        format!("DESCRIPTION:{}", escape_text(&description)),
        "TRANSP:TRANSPARENT".to_string(),
    ];
    if let Some(email) = &event.email {
        lines.push(format!(
            "ATTENDEE;CN={}:MAILTO:{}",
            escape_text(&event.full_name),
            email
        ));
    }
    lines.push("END:VEVENT".to_string());
    lines.join("\r\n")
}

/// Render a full `VCALENDAR` for the given events. `contact` controls
/// whether contact lines appear in each event's description — public
/// `ical_key` endpoints always pass `false`.
pub fn render_calendar(calendar_name: &str, events: &[CalendarEvent], contact: bool) -> String {
    let mut out = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Oncall//Calendar//EN".to_string(),
        format!("X-WR-CALNAME:{}", escape_text(calendar_name)),
    ];
    for event in events {
        out.push(render_vevent(event, contact));
    }
    out.push("END:VCALENDAR".to_string());
    out.join("\r\n") + "\r\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CalendarEvent {
        CalendarEvent {
            event_id: 42,
            team_name: "sre".to_string(),
            role_name: "primary".to_string(),
            full_name: "Jane Doe".to_string(),
            email: Some("jane@example.com".to_string()),
            start: 0,
            end: 3600,
            contacts: vec![("call".to_string(), "+15555550100".to_string())],
        }
    }

    #[test]
    fn renders_uid_and_summary() {
        let cal = render_calendar("sre", &[sample()], false);
        assert!(cal.contains("UID:event-42@oncall"));
        assert!(cal.contains("SUMMARY:sre primary shift: Jane Doe"));
        assert!(cal.contains("DTSTART:19700101T000000Z"));
    }

    #[test]
    fn omits_contact_lines_when_disabled() {
        let cal = render_calendar("sre", &[sample()], false);
        assert!(!cal.contains("call: +15555550100"));
    }

    #[test]
    fn includes_contact_lines_when_enabled() {
        let cal = render_calendar("sre", &[sample()], true);
        assert!(cal.contains("call: +15555550100"));
    }
}
