//! iCalendar (RFC 5545) export of hearings.
//!
//! The export is a pure transformation: apart from the event uid and the
//! `DTSTAMP` timestamp, identical hearings produce identical files.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::domain::hearing::{Hearing, HearingStatus, HearingType};

/// Length assumed for every hearing.
pub const EVENT_DURATION_HOURS: i64 = 2;

const PRODID: &str = "-//lexsite//Audiencias//PT";
const MAX_LINE_OCTETS: usize = 75;
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Fields of a hearing that end up in the calendar entry.
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEvent<'a> {
    pub hearing_type: HearingType,
    pub case_number: &'a str,
    pub court: &'a str,
    pub description: &'a str,
    pub notes: &'a str,
    pub location: &'a str,
    pub start: NaiveDateTime,
    pub status: HearingStatus,
}

impl<'a> From<&'a Hearing> for CalendarEvent<'a> {
    fn from(hearing: &'a Hearing) -> Self {
        Self {
            hearing_type: hearing.hearing_type,
            case_number: hearing.case_number.as_str(),
            court: hearing.court.as_str(),
            description: hearing.description.as_str(),
            notes: hearing.notes.as_str(),
            location: hearing.location.as_str(),
            start: hearing.scheduled_at,
            status: hearing.status,
        }
    }
}

impl CalendarEvent<'_> {
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::hours(EVENT_DURATION_HOURS)
    }

    pub fn summary(&self) -> String {
        format!(
            "Audiência de {} - Processo {}",
            self.hearing_type.label(),
            self.case_number
        )
    }

    /// VEVENT `STATUS` value for the hearing status.
    pub fn event_status(&self) -> &'static str {
        match self.status {
            HearingStatus::Scheduled | HearingStatus::Held => "CONFIRMED",
            HearingStatus::Postponed => "TENTATIVE",
            HearingStatus::Cancelled => "CANCELLED",
        }
    }

    fn details(&self) -> String {
        let mut text = format!("Processo: {}\nVara/Tribunal: {}", self.case_number, self.court);
        if !self.description.trim().is_empty() {
            text.push_str("\n\n");
            text.push_str(self.description.trim());
        }
        if !self.notes.trim().is_empty() {
            text.push_str("\n\nObservações: ");
            text.push_str(self.notes.trim());
        }
        text
    }
}

/// Downloadable calendar artifact.
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarFile {
    pub filename: String,
    pub content: String,
}

impl CalendarFile {
    pub const CONTENT_TYPE: &'static str = "text/calendar; charset=utf-8";
}

/// Escapes a TEXT value (RFC 5545 §3.3.11).
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Folds a content line at 75 octets without splitting UTF-8 sequences.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            folded.push_str("\r\n ");
            width = 1;
        }
        folded.push(ch);
        width += len;
    }
    folded
}

/// Renders the calendar text for `event`.
pub fn render(event: &CalendarEvent<'_>, uid: &str, now: DateTime<Utc>) -> String {
    let summary = escape_text(&event.summary());
    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{uid}"),
        format!("DTSTAMP:{}", now.format(UTC_FORMAT)),
        format!("DTSTART:{}", event.start.format(LOCAL_FORMAT)),
        format!("DTEND:{}", event.end().format(LOCAL_FORMAT)),
        format!("SUMMARY:{summary}"),
        format!("DESCRIPTION:{}", escape_text(&event.details())),
        format!("LOCATION:{}", escape_text(event.location)),
        format!("STATUS:{}", event.event_status()),
        "BEGIN:VALARM".to_string(),
        "TRIGGER:-P1D".to_string(),
        "ACTION:DISPLAY".to_string(),
        format!("DESCRIPTION:{}", escape_text("Lembrete: audiência amanhã")),
        "END:VALARM".to_string(),
        "BEGIN:VALARM".to_string(),
        "TRIGGER:-PT2H".to_string(),
        "ACTION:DISPLAY".to_string(),
        format!("DESCRIPTION:{}", escape_text("Lembrete: audiência em 2 horas")),
        "END:VALARM".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut out = String::new();
    for line in lines {
        out.push_str(&fold_line(&line));
        out.push_str("\r\n");
    }
    out
}

/// File name offered for download, derived from the case number.
pub fn filename_for(case_number: &str) -> String {
    let mut slug = String::with_capacity(case_number.len());
    for ch in case_number.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "audiencia.ics".to_string()
    } else {
        format!("audiencia-{slug}.ics")
    }
}

/// Builds the downloadable calendar file for a hearing.
pub fn export_hearing(hearing: &Hearing, uid_domain: &str) -> CalendarFile {
    let uid = format!("{}@{}", Uuid::new_v4(), uid_domain);
    let event = CalendarEvent::from(hearing);
    CalendarFile {
        filename: filename_for(hearing.case_number.as_str()),
        content: render(&event, &uid, Utc::now()),
    }
}
