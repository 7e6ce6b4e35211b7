#![forbid(unsafe_code)]
use chrono::{NaiveDate, TimeZone, Utc, Weekday};
use releve::{
    io, prepare_handoff_notice, ClockTime, JsonStorage, Member, RotationSchedule, RotationType,
    ScheduleLayer, Storage, TextNotice, UserId,
};
use tempfile::tempdir;

fn ct(s: &str) -> ClockTime {
    s.parse().unwrap()
}

fn sample_schedule() -> RotationSchedule {
    let mut schedule = RotationSchedule::new("ops");
    schedule.layers.push(ScheduleLayer::new(
        "primaire",
        RotationType::Weekly,
        ct("09:00"),
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        vec![UserId::new("alice"), UserId::new("bob")],
    ));
    schedule.layers.push(
        ScheduleLayer::new(
            "bureau",
            RotationType::Days(3),
            ct("00:00"),
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            vec![UserId::new("carol")],
        )
        .restrict(Weekday::Mon, ct("09:00"), ct("17:00"))
        .with_precedence(5),
    );
    schedule.members = vec![Member::new("alice", "Alice"), Member::new("bob", "Bob")];
    schedule
}

#[test]
fn save_and_load_schedule_roundtrip() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("schedule.json")).unwrap();
    let schedule = sample_schedule();
    storage.save(&schedule).unwrap();

    let loaded = storage.load().unwrap();
    assert_eq!(loaded.id, schedule.id);
    assert_eq!(loaded.layers, schedule.layers);
    assert_eq!(loaded.members, schedule.members);
}

#[test]
fn layer_json_shape() {
    let schedule = sample_schedule();
    let value = serde_json::to_value(&schedule.layers[1]).unwrap();
    assert_eq!(value["rotation"], serde_json::json!({ "days": 3 }));
    assert_eq!(value["handoff_time"], "00:00");
    assert_eq!(value["restrictions"]["Mon"], serde_json::json!([["09:00", "17:00"]]));

    let primary = serde_json::to_value(&schedule.layers[0]).unwrap();
    assert_eq!(primary["rotation"], "weekly");
    assert!(primary.get("restrictions").is_none());
}

#[test]
fn invalid_clock_time_in_json_is_rejected() {
    let raw = r#"{
        "id": "l1",
        "name": "cassé",
        "rotation": "biweekly",
        "handoff_time": "25:00",
        "start_date": "2025-01-06",
        "user_ids": ["alice"]
    }"#;
    let err = serde_json::from_str::<ScheduleLayer>(raw).unwrap_err();
    assert!(err.to_string().contains("invalid clock time"));

    let ok = raw.replace("25:00", "24:00");
    let layer: ScheduleLayer = serde_json::from_str(&ok).unwrap();
    assert_eq!(layer.rotation, RotationType::Fortnightly);
    assert!(layer.handoff_time.is_end_of_day());
}

#[test]
fn import_members_from_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("members.csv");
    std::fs::write(&path, "user_id,display_name\nalice,Alice Martin\nbob, Bob Leroy \n").unwrap();

    let members = io::import_members_csv(&path).unwrap();
    assert_eq!(members, vec![Member::new("alice", "Alice Martin"), Member::new("bob", "Bob Leroy")]);

    std::fs::write(&path, "user_id,display_name\n,nobody\n").unwrap();
    assert!(io::import_members_csv(&path).is_err());
}

#[test]
fn export_periods_csv_and_json() {
    let dir = tempdir().unwrap();
    let schedule = sample_schedule();
    let start = Utc.with_ymd_and_hms(2025, 1, 7, 0, 0, 0).unwrap();
    let periods = schedule.periods_between(start, start).unwrap();

    let csv_path = dir.path().join("periods.csv");
    io::export_periods_csv(&csv_path, &periods, &schedule).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "start_time,end_time,user_id,display_name");
    insta::assert_snapshot!(lines[1], @"2025-01-06T09:00:00+00:00,2025-01-07T00:00:00+00:00,alice,Alice");
    // membre absent de l'annuaire : l'identifiant sert de libellé
    assert_eq!(
        lines[2],
        "2025-01-07T00:00:00+00:00,2025-01-09T00:00:00+00:00,carol,carol"
    );
    assert_eq!(lines.len(), 4);

    let json_path = dir.path().join("periods.json");
    io::export_periods_json(&json_path, &periods).unwrap();
    let back: Vec<releve::RotationPeriod> =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(back, periods);
}

#[test]
fn handoff_notice_for_next_rotation() {
    let mut schedule = sample_schedule();
    schedule.layers.truncate(1);
    let now = Utc.with_ymd_and_hms(2025, 1, 8, 12, 0, 0).unwrap();
    let notice =
        prepare_handoff_notice(&schedule, &UserId::new("bob"), 2, now, &TextNotice).unwrap();

    assert_eq!(notice.period.start_time, Utc.with_ymd_and_hms(2025, 1, 13, 9, 0, 0).unwrap());
    assert_eq!(notice.notice_at, Utc.with_ymd_and_hms(2025, 1, 11, 9, 0, 0).unwrap());
    let lines: Vec<&str> = notice.content.lines().collect();
    assert_eq!(lines[0], "Bonjour Bob,");
    insta::assert_snapshot!(lines[2], @r#"Tu prends la relève sur le planning "ops" du 2025-01-13T09:00:00+00:00 au 2025-01-20T09:00:00+00:00."#);
}

#[test]
fn handoff_notice_errors() {
    let schedule = sample_schedule();
    let now = Utc.with_ymd_and_hms(2025, 1, 8, 12, 0, 0).unwrap();
    assert!(prepare_handoff_notice(&schedule, &UserId::new("zoe"), 2, now, &TextNotice).is_err());
    assert!(prepare_handoff_notice(&schedule, &UserId::new("bob"), -1, now, &TextNotice).is_err());
}
