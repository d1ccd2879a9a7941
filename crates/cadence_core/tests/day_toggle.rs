use cadence_core::db::open_db_in_memory;
use cadence_core::{
    DayRepository, DayService, Habit, HabitService, RepoError, SqliteDayRepository,
    SqliteHabitRepository, ToggleOutcome, WeekDay,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn toggle_creates_day_row_lazily_and_completes() {
    let mut conn = open_db_in_memory().unwrap();
    let habit = create_habit(&mut conn, "Exercise", date(2023, 1, 9), &[1]);
    assert_eq!(day_row_count(&conn), 0);

    {
        let mut repo = SqliteDayRepository::try_new(&mut conn).unwrap();
        let outcome = repo.toggle_completion(habit.id, date(2023, 1, 9)).unwrap();
        assert_eq!(outcome, ToggleOutcome::Completed);

        let status = repo.day_status(date(2023, 1, 9)).unwrap();
        assert_eq!(status.completed_habit_ids, vec![habit.id]);
    }

    assert_eq!(day_row_count(&conn), 1);
    assert_eq!(completion_row_count(&conn), 1);
}

#[test]
fn toggle_twice_removes_completion_but_keeps_day_row() {
    let mut conn = open_db_in_memory().unwrap();
    let habit = create_habit(&mut conn, "Exercise", date(2023, 1, 9), &[1]);

    {
        let mut repo = SqliteDayRepository::try_new(&mut conn).unwrap();
        repo.toggle_completion(habit.id, date(2023, 1, 9)).unwrap();
        let outcome = repo.toggle_completion(habit.id, date(2023, 1, 9)).unwrap();
        assert_eq!(outcome, ToggleOutcome::Uncompleted);

        let status = repo.day_status(date(2023, 1, 9)).unwrap();
        assert!(status.completed_habit_ids.is_empty());
    }

    assert_eq!(day_row_count(&conn), 1);
    assert_eq!(completion_row_count(&conn), 0);
}

#[test]
fn toggle_unknown_habit_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteDayRepository::try_new(&mut conn).unwrap();

    let missing_id = Uuid::new_v4();
    let err = repo
        .toggle_completion(missing_id, date(2023, 1, 9))
        .unwrap_err();
    assert!(matches!(err, RepoError::HabitNotFound(id) if id == missing_id));
}

#[test]
fn toggle_on_unscheduled_week_day_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let habit = create_habit(&mut conn, "Monday only", date(2023, 1, 9), &[1]);

    {
        let mut repo = SqliteDayRepository::try_new(&mut conn).unwrap();
        let err = repo
            .toggle_completion(habit.id, date(2023, 1, 10))
            .unwrap_err();
        match err {
            RepoError::NotScheduled { habit_id, date } => {
                assert_eq!(habit_id, habit.id);
                assert_eq!(date.to_string(), "2023-01-10");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(day_row_count(&conn), 0);
}

#[test]
fn toggle_before_creation_date_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let habit = create_habit(&mut conn, "Starts next week", date(2023, 1, 16), &[1]);

    {
        let mut repo = SqliteDayRepository::try_new(&mut conn).unwrap();
        let err = repo
            .toggle_completion(habit.id, date(2023, 1, 9))
            .unwrap_err();
        assert!(matches!(err, RepoError::NotScheduled { .. }));
    }

    assert_eq!(day_row_count(&conn), 0);
}

#[test]
fn day_status_lists_possible_habits_for_the_date() {
    let mut conn = open_db_in_memory().unwrap();
    let habit_daily = create_habit(
        &mut conn,
        "Daily",
        date(2023, 1, 2),
        &[0, 1, 2, 3, 4, 5, 6],
    );
    let habit_monday = create_habit(&mut conn, "Monday only", date(2023, 1, 9), &[1]);
    create_habit(&mut conn, "Starts next week", date(2023, 1, 16), &[1]);

    let mut repo = SqliteDayRepository::try_new(&mut conn).unwrap();

    let monday = repo.day_status(date(2023, 1, 9)).unwrap();
    let possible_ids: Vec<Uuid> = monday.possible_habits.iter().map(|habit| habit.id).collect();
    assert_eq!(possible_ids, vec![habit_daily.id, habit_monday.id]);
    assert!(monday.completed_habit_ids.is_empty());

    let tuesday = repo.day_status(date(2023, 1, 10)).unwrap();
    let possible_ids: Vec<Uuid> = tuesday
        .possible_habits
        .iter()
        .map(|habit| habit.id)
        .collect();
    assert_eq!(possible_ids, vec![habit_daily.id]);

    repo.toggle_completion(habit_monday.id, date(2023, 1, 9))
        .unwrap();
    let monday_after = repo.day_status(date(2023, 1, 9)).unwrap();
    assert_eq!(monday_after.completed_habit_ids, vec![habit_monday.id]);
}

#[test]
fn day_status_reports_completions_for_that_date_only() {
    let mut conn = open_db_in_memory().unwrap();
    let habit = create_habit(&mut conn, "Daily", date(2023, 1, 2), &[0, 1, 2, 3, 4, 5, 6]);

    let mut repo = SqliteDayRepository::try_new(&mut conn).unwrap();
    repo.toggle_completion(habit.id, date(2023, 1, 9)).unwrap();

    let monday = repo.day_status(date(2023, 1, 9)).unwrap();
    assert_eq!(monday.completed_habit_ids, vec![habit.id]);

    let tuesday = repo.day_status(date(2023, 1, 10)).unwrap();
    assert!(tuesday.completed_habit_ids.is_empty());
}

#[test]
fn day_status_loads_full_habits_with_week_days() {
    let mut conn = open_db_in_memory().unwrap();
    let habit = create_habit(&mut conn, "Monday only", date(2023, 1, 9), &[1]);

    let repo = SqliteDayRepository::try_new(&mut conn).unwrap();
    let status = repo.day_status(date(2023, 1, 9)).unwrap();

    assert_eq!(status.date, date(2023, 1, 9));
    assert_eq!(status.possible_habits.len(), 1);
    let loaded = &status.possible_habits[0];
    assert_eq!(loaded.title, "Monday only");
    assert_eq!(loaded.week_days, habit.week_days);
}

#[test]
fn day_service_wraps_repository_calls() {
    let mut conn = open_db_in_memory().unwrap();
    let habit = create_habit(&mut conn, "Exercise", date(2023, 1, 9), &[1]);

    let repo = SqliteDayRepository::try_new(&mut conn).unwrap();
    let mut service = DayService::new(repo);

    let outcome = service.toggle(habit.id, date(2023, 1, 9)).unwrap();
    assert_eq!(outcome, ToggleOutcome::Completed);

    let status = service.status_for(date(2023, 1, 9)).unwrap();
    assert_eq!(status.completed_habit_ids, vec![habit.id]);

    let summary = service.summary().unwrap();
    assert_eq!(summary.len(), 1);
}

fn create_habit(
    conn: &mut Connection,
    title: &str,
    created_on: NaiveDate,
    week_days: &[u8],
) -> Habit {
    let repo = SqliteHabitRepository::try_new(conn).unwrap();
    let mut service = HabitService::new(repo);
    let days = week_days.iter().map(|&index| WeekDay::new(index).unwrap());
    service.create_habit(title, created_on, days).unwrap()
}

fn day_row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM days;", [], |row| row.get(0))
        .unwrap()
}

fn completion_row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM day_habits;", [], |row| row.get(0))
        .unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
