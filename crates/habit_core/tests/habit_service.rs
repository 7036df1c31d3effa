use chrono::NaiveDate;
use habit_core::db::open_db_in_memory;
use habit_core::{
    FixedClock, HabitService, HabitValidationError, ServiceError, SqliteHabitRepository,
    ToggleOutcome,
};
use rusqlite::Connection;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date should be a valid calendar day")
}

fn service_on(
    conn: &mut Connection,
    today: NaiveDate,
) -> HabitService<SqliteHabitRepository<'_>, FixedClock> {
    HabitService::new(SqliteHabitRepository::new(conn), FixedClock(today))
}

#[test]
fn read_habit_walkthrough_on_a_wednesday() {
    let wednesday = date(2026, 10, 14);
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    let mut service = service_on(&mut conn, wednesday);

    let habit = service.create_habit("Read", &[1, 3, 5]).expect("habit creation should succeed");
    assert_eq!(habit.created_at, wednesday);

    let view = service.day_view(wednesday).expect("day view should load");
    assert_eq!(view.available_habits, vec![habit.clone()]);
    assert!(view.completed_habits.is_empty());

    assert_eq!(
        service.toggle_today(habit.id).expect("toggle should succeed"),
        ToggleOutcome::Completed
    );
    assert_eq!(
        service.day_view(wednesday).expect("day view should load").completed_habits,
        vec![habit.id]
    );

    assert_eq!(service.toggle_today(habit.id).expect("toggle should succeed"), ToggleOutcome::Cleared);
    assert!(service
        .day_view(wednesday)
        .expect("day view should load")
        .completed_habits
        .is_empty());
}

#[test]
fn habit_is_never_available_before_its_creation_day() {
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    let mut service = service_on(&mut conn, date(2026, 10, 14));
    service.create_habit("Read", &[3]).expect("habit creation should succeed");

    let view = service.day_view(date(2026, 10, 7)).expect("day view should load");
    assert!(view.available_habits.is_empty());
}

#[test]
fn dates_outside_four_digit_years_are_rejected() {
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    let mut service = service_on(&mut conn, date(2026, 10, 14));
    service.create_habit("Read", &[0, 1, 2, 3, 4, 5, 6]).expect("habit creation should succeed");

    let last_day = service.day_view(date(9999, 12, 31)).expect("day view should load");
    assert_eq!(last_day.available_habits.len(), 1);

    let err = service.day_view(date(10000, 1, 1)).expect_err("day view should fail");
    assert!(matches!(
        err,
        ServiceError::Validation(HabitValidationError::DateOutOfRange(_))
    ));
}

#[test]
fn clock_outside_four_digit_years_is_refused_for_writes() {
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    let mut service = service_on(&mut conn, date(10000, 1, 1));

    let err = service.create_habit("Read", &[1]).expect_err("habit creation should fail");
    assert!(matches!(
        err,
        ServiceError::Validation(HabitValidationError::DateOutOfRange(_))
    ));
    let err = service.toggle_today(Uuid::new_v4()).expect_err("toggle should fail");
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[test]
fn day_view_does_not_materialize_days() {
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    {
        let mut service = service_on(&mut conn, date(2026, 10, 14));
        service.create_habit("Read", &[3]).expect("habit creation should succeed");
        service.day_view(date(2026, 10, 14)).expect("day view should load");
        service.day_view(date(2026, 10, 21)).expect("day view should load");
        assert!(service.summary().expect("summary should load").is_empty());
    }

    let days: i64 = conn
        .query_row("SELECT COUNT(*) FROM days;", [], |row| row.get(0))
        .expect("count query should succeed");
    assert_eq!(days, 0);
}

#[test]
fn create_habit_rejects_invalid_input_before_persistence() {
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    {
        let mut service = service_on(&mut conn, date(2026, 10, 14));
        let err = service.create_habit("", &[1]).expect_err("habit creation should fail");
        assert!(matches!(
            err,
            ServiceError::Validation(HabitValidationError::EmptyTitle)
        ));
        let err = service.create_habit("Read", &[7]).expect_err("habit creation should fail");
        assert!(matches!(
            err,
            ServiceError::Validation(HabitValidationError::WeekDayOutOfRange(7))
        ));
    }

    let habits: i64 = conn
        .query_row("SELECT COUNT(*) FROM habits;", [], |row| row.get(0))
        .expect("count query should succeed");
    assert_eq!(habits, 0);
}

#[test]
fn duplicate_week_days_collapse_into_one_rule() {
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    let habit_id = {
        let mut service = service_on(&mut conn, date(2026, 10, 14));
        service.create_habit("Read", &[3, 3, 3]).expect("habit creation should succeed").id
    };

    let rules: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM habit_week_days WHERE habit_id = ?1;",
            [habit_id.to_string()],
            |row| row.get(0),
        )
        .expect("count query should succeed");
    assert_eq!(rules, 1);
}

#[test]
fn toggle_unknown_habit_returns_not_found() {
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    let mut service = service_on(&mut conn, date(2026, 10, 14));

    let missing = Uuid::new_v4();
    let err = service.toggle_today(missing).expect_err("toggle should fail");
    assert!(matches!(err, ServiceError::HabitNotFound(id) if id == missing));
    assert!(service.summary().expect("summary should load").is_empty());
}

#[test]
fn summary_counts_completed_and_available_per_materialized_day() {
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    let monday = date(2026, 10, 12);
    let wednesday = date(2026, 10, 14);

    let (read, stretch) = {
        let mut service = service_on(&mut conn, monday);
        let read = service.create_habit("Read", &[1, 3]).expect("habit creation should succeed");
        let stretch = service.create_habit("Stretch", &[1]).expect("habit creation should succeed");
        service.toggle_today(read.id).expect("toggle should succeed");
        (read, stretch)
    };

    {
        let mut service = service_on(&mut conn, wednesday);
        // Created on Wednesday: counts for Wednesday, not for the earlier Monday.
        service.create_habit("Walk", &[1, 3]).expect("habit creation should succeed");
        service.toggle_today(read.id).expect("toggle should succeed");

        let summary = service.summary().expect("summary should load");
        assert_eq!(summary.len(), 2);

        assert_eq!(summary[0].date, monday);
        assert_eq!(summary[0].completed, 1);
        assert_eq!(summary[0].available, 2);

        assert_eq!(summary[1].date, wednesday);
        assert_eq!(summary[1].completed, 1);
        assert_eq!(summary[1].available, 2);

        assert!(service.get_habit(stretch.id).expect("habit lookup should succeed").is_some());
    }
}

#[test]
fn summary_reflects_toggle_and_untoggle() {
    let wednesday = date(2026, 10, 14);
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    let mut service = service_on(&mut conn, wednesday);
    let habit = service.create_habit("Read", &[3]).expect("habit creation should succeed");

    service.toggle_today(habit.id).expect("toggle should succeed");
    assert_eq!(service.summary().expect("summary should load")[0].completed, 1);

    service.toggle_today(habit.id).expect("toggle should succeed");
    let summary = service.summary().expect("summary should load");
    // The day stays materialized once created.
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].completed, 0);
    assert_eq!(summary[0].available, 1);
}

#[test]
fn day_view_serializes_with_camel_case_keys() {
    let wednesday = date(2026, 10, 14);
    let mut conn = open_db_in_memory().expect("in-memory database should open");
    let mut service = service_on(&mut conn, wednesday);
    let habit = service.create_habit("Read", &[3]).expect("habit creation should succeed");
    service.toggle_today(habit.id).expect("toggle should succeed");

    let json = serde_json::to_value(service.day_view(wednesday).expect("day view should load"))
        .expect("day view should serialize");
    assert_eq!(json["availableHabits"][0]["title"], "Read");
    assert_eq!(json["availableHabits"][0]["created_at"], "2026-10-14");
    assert_eq!(json["completedHabits"][0], habit.id.to_string());
}
