//! Minimal iCalendar (RFC 5545) codec for the plan export and the course
//! import. Only the VEVENT subset the tool exchanges is supported: SUMMARY,
//! DTSTART, DTEND and DESCRIPTION, with text escaping and 75-octet line
//! folding. The writer emits no wall-clock metadata, so identical input
//! always produces byte-identical output.

use chrono::NaiveDateTime;
use std::fmt;

use crate::event::SourceEvent;
use crate::session::ReviewSession;

const PRODID: &str = "-//revision-tool//Planning de révisions//FR";
const FOLD_LIMIT: usize = 75;
const DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    InvalidUtf8,
    NotACalendar,
    MalformedLine(String),
    UnexpectedEnd { expected: String, found: String },
    UnterminatedComponent(String),
    MissingField { event_index: usize, field: &'static str },
    EmptyField { event_index: usize, field: &'static str },
    DateOnlyStart { event_index: usize, value: String },
    InvalidDateTime { event_index: usize, value: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidUtf8 => write!(f, "calendar data is not valid UTF-8"),
            ParseError::NotACalendar => {
                write!(f, "input does not start with a BEGIN:VCALENDAR component")
            }
            ParseError::MalformedLine(line) => {
                write!(f, "malformed content line '{line}' (missing ':')")
            }
            ParseError::UnexpectedEnd { expected, found } => {
                write!(f, "END:{found} closes component {expected}")
            }
            ParseError::UnterminatedComponent(name) => {
                write!(f, "component {name} is never closed")
            }
            ParseError::MissingField { event_index, field } => {
                write!(f, "VEVENT {event_index} is missing {field}")
            }
            ParseError::EmptyField { event_index, field } => {
                write!(f, "VEVENT {event_index} has an empty {field}")
            }
            ParseError::DateOnlyStart { event_index, value } => {
                write!(
                    f,
                    "VEVENT {event_index} has a date-only DTSTART '{value}' (a time is required)"
                )
            }
            ParseError::InvalidDateTime { event_index, value } => {
                write!(f, "VEVENT {event_index} has an invalid DTSTART '{value}'")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Encode the session sequence as an importable .ics file, one VEVENT per
/// session, in sequence order.
pub fn write_calendar(sessions: &[ReviewSession]) -> Vec<u8> {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{PRODID}"));
    for (idx, session) in sessions.iter().enumerate() {
        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:revision-{}@revision-tool", idx + 1));
        push_line(
            &mut out,
            &format!(
                "SUMMARY:{}",
                escape_text(&format!("Révision : {}", session.source_title))
            ),
        );
        push_line(
            &mut out,
            &format!("DTSTART:{}", session.scheduled_at.format(DATETIME_FORMAT)),
        );
        push_line(
            &mut out,
            &format!("DTEND:{}", session.end_time().format(DATETIME_FORMAT)),
        );
        push_line(
            &mut out,
            &format!(
                "DESCRIPTION:{}",
                escape_text(&format!("Méthode : {}", session.method.display_name()))
            ),
        );
        push_line(&mut out, "END:VEVENT");
    }
    push_line(&mut out, "END:VCALENDAR");
    out.into_bytes()
}

/// Decode a calendar file into source events, preserving file order.
///
/// The whole parse aborts on the first structural problem or on a VEVENT
/// missing DTSTART or SUMMARY; entries are never silently skipped or given
/// fabricated defaults. Properties of nested components (VALARM, VTIMEZONE)
/// never leak into an event. DTSTART is accepted in floating and UTC basic
/// forms; a trailing `Z` is dropped and the time treated as naive local time.
pub fn parse_calendar(bytes: &[u8]) -> Result<Vec<SourceEvent>, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ParseError::InvalidUtf8)?;
    let lines = unfold_lines(text);

    let mut stack: Vec<String> = Vec::new();
    let mut events = Vec::new();
    let mut event_index = 0usize;
    let mut dtstart: Option<NaiveDateTime> = None;
    let mut summary: Option<String> = None;
    let mut seen_calendar = false;

    for line in &lines {
        let Some((name_part, value)) = line.split_once(':') else {
            if !seen_calendar {
                return Err(ParseError::NotACalendar);
            }
            return Err(ParseError::MalformedLine(line.clone()));
        };
        let name = name_part
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_uppercase();

        if !seen_calendar {
            if name == "BEGIN" && value.trim().eq_ignore_ascii_case("VCALENDAR") {
                seen_calendar = true;
                stack.push("VCALENDAR".to_string());
                continue;
            }
            return Err(ParseError::NotACalendar);
        }

        match name.as_str() {
            "BEGIN" => {
                let component = value.trim().to_ascii_uppercase();
                if component == "VEVENT" && stack == ["VCALENDAR"] {
                    event_index += 1;
                    dtstart = None;
                    summary = None;
                }
                stack.push(component);
            }
            "END" => {
                let component = value.trim().to_ascii_uppercase();
                let Some(open) = stack.pop() else {
                    return Err(ParseError::NotACalendar);
                };
                if open != component {
                    return Err(ParseError::UnexpectedEnd {
                        expected: open,
                        found: component,
                    });
                }
                if component == "VEVENT" && stack == ["VCALENDAR"] {
                    let start = dtstart.take().ok_or(ParseError::MissingField {
                        event_index,
                        field: "DTSTART",
                    })?;
                    let title = summary.take().ok_or(ParseError::MissingField {
                        event_index,
                        field: "SUMMARY",
                    })?;
                    if title.trim().is_empty() {
                        return Err(ParseError::EmptyField {
                            event_index,
                            field: "SUMMARY",
                        });
                    }
                    events.push(SourceEvent::new(start, title));
                }
            }
            // Properties are only read at VEVENT depth; anything inside a
            // nested component is ignored.
            "DTSTART" if stack == ["VCALENDAR", "VEVENT"] => {
                dtstart = Some(parse_datetime_value(value.trim(), event_index)?);
            }
            "SUMMARY" if stack == ["VCALENDAR", "VEVENT"] => {
                summary = Some(unescape_text(value));
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::UnterminatedComponent(open.clone()));
    }
    if !seen_calendar {
        return Err(ParseError::NotACalendar);
    }
    Ok(events)
}

fn parse_datetime_value(value: &str, event_index: usize) -> Result<NaiveDateTime, ParseError> {
    if !value.contains('T') {
        return Err(ParseError::DateOnlyStart {
            event_index,
            value: value.to_string(),
        });
    }
    let trimmed = value.strip_suffix('Z').unwrap_or(value);
    NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT).map_err(|_| {
        ParseError::InvalidDateTime {
            event_index,
            value: value.to_string(),
        }
    })
}

/// Join folded physical lines into logical content lines. A physical line
/// starting with a space or tab continues the previous one.
fn unfold_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.split('\n') {
        let physical = raw.strip_suffix('\r').unwrap_or(raw);
        if physical.is_empty() {
            continue;
        }
        if let Some(rest) = physical
            .strip_prefix(' ')
            .or_else(|| physical.strip_prefix('\t'))
        {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        lines.push(physical.to_string());
    }
    lines
}

/// Write one logical line with CRLF ending, folded so no physical line
/// exceeds 75 octets. Folds land on UTF-8 character boundaries.
fn push_line(out: &mut String, line: &str) {
    let mut remaining = line;
    let mut budget = FOLD_LIMIT;
    let mut continuation = false;
    while remaining.len() > budget {
        let mut split = budget;
        while !remaining.is_char_boundary(split) {
            split -= 1;
        }
        if continuation {
            out.push(' ');
        }
        out.push_str(&remaining[..split]);
        out.push_str("\r\n");
        remaining = &remaining[split..];
        continuation = true;
        budget = FOLD_LIMIT - 1;
    }
    if continuation {
        out.push(' ');
    }
    out.push_str(remaining);
    out.push_str("\r\n");
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
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

fn unescape_text(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            unescaped.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => unescaped.push('\n'),
            Some(other) => unescaped.push(other),
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
