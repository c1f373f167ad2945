use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use revision_tool::{
    RevisionMethod, SchedulingWindow, SourceEvent, WindowValidationError, generate_schedule,
    generate_schedule_with_summary,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dt(y: i32, m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, 0).unwrap()
}

fn t(h: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, min, 0).unwrap()
}

fn window(start: NaiveDate, end: NaiveDate) -> SchedulingWindow {
    SchedulingWindow {
        range_start: start,
        range_end: end,
        ..SchedulingWindow::default()
    }
}

#[test]
fn leitner_expands_one_event_into_five_consecutive_days() {
    let events = vec![SourceEvent::new(dt(2024, 3, 1, 10, 0), "Anatomie")];
    let sessions = generate_schedule(
        &events,
        RevisionMethod::Leitner,
        &window(d(2024, 3, 1), d(2024, 3, 31)),
    )
    .unwrap();

    let expected: Vec<NaiveDateTime> = (2..=6).map(|day| dt(2024, 3, day, 10, 0)).collect();
    let actual: Vec<NaiveDateTime> = sessions.iter().map(|s| s.scheduled_at).collect();
    assert_eq!(actual, expected);
    for session in &sessions {
        assert_eq!(session.source_title, "Anatomie");
        assert_eq!(session.method, RevisionMethod::Leitner);
        assert_eq!(session.duration_minutes, 30);
    }
}

#[test]
fn lunch_break_drops_every_repetition_of_a_13h_event() {
    // Offsets shift the date only, so every candidate keeps the 13:00 clock
    // time and lands inside the lunch break.
    let events = vec![SourceEvent::new(dt(2024, 3, 1, 13, 0), "Physiologie")];
    let (sessions, summary) = generate_schedule_with_summary(
        &events,
        RevisionMethod::FixedInterval,
        &window(d(2024, 3, 1), d(2024, 3, 31)),
    )
    .unwrap();
    assert!(sessions.is_empty());
    assert_eq!(summary.candidate_count, 5);
    assert_eq!(summary.during_lunch_break, 5);
}

#[test]
fn spaced_square_truncated_by_range_end() {
    // Squares land on Jan 2, 5, 10, 17, 26; the range admits the first three.
    let events = vec![SourceEvent::new(dt(2024, 1, 1, 9, 0), "Biochimie")];
    let (sessions, summary) = generate_schedule_with_summary(
        &events,
        RevisionMethod::SpacedSquare,
        &window(d(2024, 1, 1), d(2024, 1, 10)),
    )
    .unwrap();

    let actual: Vec<NaiveDateTime> = sessions.iter().map(|s| s.scheduled_at).collect();
    assert_eq!(
        actual,
        vec![dt(2024, 1, 2, 9, 0), dt(2024, 1, 5, 9, 0), dt(2024, 1, 10, 9, 0)]
    );
    assert_eq!(summary.outside_date_range, 2);
}

#[test]
fn output_follows_event_order_then_repetition_order() {
    // The later event comes first in the input, so its sessions come first in
    // the output even though they are chronologically later.
    let events = vec![
        SourceEvent::new(dt(2024, 3, 10, 10, 0), "Pharmacologie"),
        SourceEvent::new(dt(2024, 3, 1, 10, 0), "Anatomie"),
    ];
    let sessions = generate_schedule(
        &events,
        RevisionMethod::Leitner,
        &window(d(2024, 3, 1), d(2024, 3, 31)),
    )
    .unwrap();

    assert_eq!(sessions.len(), 10);
    for session in &sessions[..5] {
        assert_eq!(session.source_title, "Pharmacologie");
    }
    for session in &sessions[5..] {
        assert_eq!(session.source_title, "Anatomie");
    }
    assert!(sessions[0].scheduled_at > sessions[5].scheduled_at);
}

#[test]
fn generation_is_deterministic() {
    let events = vec![
        SourceEvent::new(dt(2024, 3, 1, 10, 0), "Anatomie"),
        SourceEvent::new(dt(2024, 3, 2, 15, 30), "Physiologie"),
    ];
    let w = window(d(2024, 3, 1), d(2024, 3, 31));
    let first = generate_schedule(&events, RevisionMethod::SpacedSquare, &w).unwrap();
    let second = generate_schedule(&events, RevisionMethod::SpacedSquare, &w).unwrap();
    assert_eq!(first, second);
}

#[test]
fn no_events_produces_empty_plan() {
    let (sessions, summary) = generate_schedule_with_summary(
        &[],
        RevisionMethod::Leitner,
        &window(d(2024, 3, 1), d(2024, 3, 31)),
    )
    .unwrap();
    assert!(sessions.is_empty());
    assert_eq!(summary.event_count, 0);
    assert_eq!(summary.candidate_count, 0);
}

#[test]
fn inverted_date_range_is_an_error() {
    let events = vec![SourceEvent::new(dt(2024, 3, 1, 10, 0), "Anatomie")];
    let err = generate_schedule(
        &events,
        RevisionMethod::Leitner,
        &window(d(2024, 3, 31), d(2024, 3, 1)),
    )
    .unwrap_err();
    assert!(matches!(err, WindowValidationError::StartAfterEnd { .. }));
    assert!(err.to_string().contains("must be on or before"));
}

#[test]
fn inverted_daily_hours_admit_nothing_without_error() {
    let events = vec![SourceEvent::new(dt(2024, 3, 1, 10, 0), "Anatomie")];
    let mut w = window(d(2024, 3, 1), d(2024, 3, 31));
    w.day_start = t(20, 0);
    w.day_end = t(8, 0);
    let (sessions, summary) =
        generate_schedule_with_summary(&events, RevisionMethod::Leitner, &w).unwrap();
    assert!(sessions.is_empty());
    assert_eq!(summary.outside_daily_hours, 5);
}

#[test]
fn daily_hour_boundaries_are_inclusive() {
    let events = vec![
        SourceEvent::new(dt(2024, 3, 1, 8, 0), "Anatomie"),
        SourceEvent::new(dt(2024, 3, 1, 20, 0), "Physiologie"),
    ];
    let sessions = generate_schedule(
        &events,
        RevisionMethod::Leitner,
        &window(d(2024, 3, 1), d(2024, 3, 31)),
    )
    .unwrap();
    assert_eq!(sessions.len(), 10);
}

#[test]
fn lunch_boundaries_are_half_open() {
    // 12:00 is inside the break, 14:00 is not.
    let events = vec![
        SourceEvent::new(dt(2024, 3, 1, 12, 0), "Anatomie"),
        SourceEvent::new(dt(2024, 3, 1, 14, 0), "Physiologie"),
    ];
    let (sessions, summary) = generate_schedule_with_summary(
        &events,
        RevisionMethod::Leitner,
        &window(d(2024, 3, 1), d(2024, 3, 31)),
    )
    .unwrap();
    assert_eq!(summary.during_lunch_break, 5);
    assert_eq!(sessions.len(), 5);
    assert!(sessions.iter().all(|s| s.source_title == "Physiologie"));
}

#[test]
fn sessions_carry_the_window_duration() {
    let events = vec![SourceEvent::new(dt(2024, 3, 1, 10, 0), "Anatomie")];
    let mut w = window(d(2024, 3, 1), d(2024, 3, 31));
    w.session_duration_minutes = 45;
    let sessions = generate_schedule(&events, RevisionMethod::Leitner, &w).unwrap();
    assert!(sessions.iter().all(|s| s.duration_minutes == 45));
    assert_eq!(sessions[0].end_time(), dt(2024, 3, 2, 10, 45));
}
