use chrono::{NaiveDate, NaiveDateTime};
use revision_tool::{
    PersistenceError, ReviewSession, RevisionMethod, RevisionPlan, SourceEvent,
    load_events_from_ics, load_plan_from_json, load_sessions_from_csv, save_plan_to_csv,
    save_plan_to_ics, save_plan_to_json, sessions_to_csv_bytes,
};
use std::fs;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dt(y: i32, m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, 0).unwrap()
}

fn generated_plan() -> RevisionPlan {
    let mut plan = RevisionPlan::new();
    plan.set_date_range(d(2024, 3, 1), d(2024, 3, 31)).unwrap();
    plan.set_method(RevisionMethod::Leitner);
    plan.set_events(vec![SourceEvent::new(dt(2024, 3, 1, 10, 0), "Anatomie")]);
    plan.generate().unwrap();
    plan
}

#[test]
fn csv_header_matches_the_exported_table() {
    let sessions = vec![ReviewSession::new(
        dt(2024, 3, 2, 10, 0),
        "Anatomie",
        RevisionMethod::Leitner,
        30,
    )];
    let bytes = sessions_to_csv_bytes(&sessions).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, "Date,Cours,Méthode,Durée (minutes)");
    assert!(text.lines().nth(1).unwrap().starts_with("2024-03-02 10:00:00,"));
}

#[test]
fn csv_save_and_load_round_trips_sessions() {
    let plan = generated_plan();
    let tmp = NamedTempFile::new().expect("create temp file");
    save_plan_to_csv(&plan, tmp.path()).unwrap();

    let loaded = load_sessions_from_csv(tmp.path()).unwrap();
    assert_eq!(loaded, plan.sessions().unwrap());
}

#[test]
fn csv_load_rejects_unknown_method() {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(
        tmp.path(),
        "Date,Cours,Méthode,Durée (minutes)\n2024-03-02 10:00:00,Anatomie,Bachotage,30\n",
    )
    .unwrap();
    let err = load_sessions_from_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
    assert!(err.to_string().contains("unknown revision method"));
}

#[test]
fn csv_load_rejects_out_of_bounds_duration() {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(
        tmp.path(),
        "Date,Cours,Méthode,Durée (minutes)\n2024-03-02 10:00:00,Anatomie,Leitner,5\n",
    )
    .unwrap();
    let err = load_sessions_from_csv(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("duration"));
}

#[test]
fn csv_load_accepts_method_keys_as_well_as_display_names() {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(
        tmp.path(),
        "Date,Cours,Méthode,Durée (minutes)\n2024-03-02 10:00:00,Anatomie,spaced_square,30\n",
    )
    .unwrap();
    let loaded = load_sessions_from_csv(tmp.path()).unwrap();
    assert_eq!(loaded[0].method, RevisionMethod::SpacedSquare);
}

#[test]
fn json_snapshot_round_trips_the_whole_plan() {
    let plan = generated_plan();
    let tmp = NamedTempFile::new().expect("create temp file");
    save_plan_to_json(&plan, tmp.path()).unwrap();

    let loaded = load_plan_from_json(tmp.path()).unwrap();
    assert_eq!(loaded.window(), plan.window());
    assert_eq!(loaded.method(), plan.method());
    assert_eq!(loaded.events(), plan.events());
    assert_eq!(loaded.sessions().unwrap(), plan.sessions().unwrap());
}

#[test]
fn json_load_rejects_invalid_window() {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(
        tmp.path(),
        r#"{"window":{"range_start":"2024-03-31","range_end":"2024-03-01"},"method":"leitner","events":[],"sessions":[]}"#,
    )
    .unwrap();
    let err = load_plan_from_json(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
    assert!(err.to_string().contains("must be on or before"));
}

#[test]
fn ics_export_parses_back_with_revision_summaries() {
    let plan = generated_plan();
    let tmp = NamedTempFile::new().expect("create temp file");
    save_plan_to_ics(&plan, tmp.path()).unwrap();

    let events = load_events_from_ics(tmp.path()).unwrap();
    assert_eq!(events.len(), 5);
    assert!(events.iter().all(|e| e.summary == "Révision : Anatomie"));
    assert_eq!(events[0].start, dt(2024, 3, 2, 10, 0));
}

#[test]
fn ics_import_rejects_broken_calendars() {
    let tmp = NamedTempFile::new().expect("create temp file");
    fs::write(tmp.path(), "not a calendar at all").unwrap();
    let err = load_events_from_ics(tmp.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}
