//! HTTP handlers and wire DTOs.
//!
//! # Responsibility
//! - Translate between the JSON wire format and core domain types.
//! - Resolve "today" for create/toggle; core operations take explicit dates.
//!
//! # Invariants
//! - Wire field names are camelCase; weekdays cross the wire as `0..=6`
//!   with `0` = Sunday.
//! - Each handler acquires the connection lock once and releases it before
//!   returning.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cadence_core::{
    DayId, DayService, DayStatus, DaySummary, Habit, HabitId, HabitService, SqliteDayRepository,
    SqliteHabitRepository, WeekDay,
};
use chrono::{NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitBody {
    pub title: String,
    pub week_days: Vec<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDto {
    pub id: HabitId,
    pub title: String,
    pub created_at: NaiveDate,
    pub week_days: Vec<u8>,
}

impl From<Habit> for HabitDto {
    fn from(habit: Habit) -> Self {
        Self {
            id: habit.id,
            title: habit.title,
            created_at: habit.created_on,
            week_days: habit.week_days.iter().map(|day| day.index()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayResponse {
    pub possible_habits: Vec<HabitDto>,
    pub completed_habits: Vec<HabitId>,
}

impl From<DayStatus> for DayResponse {
    fn from(status: DayStatus) -> Self {
        Self {
            possible_habits: status
                .possible_habits
                .into_iter()
                .map(HabitDto::from)
                .collect(),
            completed_habits: status.completed_habit_ids,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub id: DayId,
    pub date: NaiveDate,
    pub completed: u32,
    pub possible: u32,
}

impl From<DaySummary> for SummaryRow {
    fn from(entry: DaySummary) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            completed: entry.completed,
            possible: entry.possible,
        }
    }
}

pub async fn ping_handler() -> &'static str {
    cadence_core::ping()
}

pub async fn create_habit_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateHabitBody>,
) -> Result<(StatusCode, Json<HabitDto>), ApiError> {
    let week_days = parse_week_days(&body.week_days)?;
    let today = Utc::now().date_naive();

    let mut conn = lock_db(&state)?;
    let repo = SqliteHabitRepository::try_new(&mut conn)?;
    let mut service = HabitService::new(repo);
    let habit = service.create_habit(body.title, today, week_days)?;

    info!(
        "event=habit_create module=server status=ok habit_id={} week_days={}",
        habit.id,
        habit.week_days.len()
    );
    Ok((StatusCode::CREATED, Json(HabitDto::from(habit))))
}

pub async fn list_habits_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<HabitDto>>, ApiError> {
    let mut conn = lock_db(&state)?;
    let repo = SqliteHabitRepository::try_new(&mut conn)?;
    let service = HabitService::new(repo);

    let habits = service.list_habits()?;
    Ok(Json(habits.into_iter().map(HabitDto::from).collect()))
}

pub async fn day_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DayResponse>, ApiError> {
    let mut conn = lock_db(&state)?;
    let repo = SqliteDayRepository::try_new(&mut conn)?;
    let service = DayService::new(repo);

    let status = service.status_for(query.date)?;
    Ok(Json(DayResponse::from(status)))
}

pub async fn toggle_habit_handler(
    State(state): State<Arc<AppState>>,
    Path(habit_id): Path<HabitId>,
) -> Result<StatusCode, ApiError> {
    let today = Utc::now().date_naive();

    let mut conn = lock_db(&state)?;
    let repo = SqliteDayRepository::try_new(&mut conn)?;
    let mut service = DayService::new(repo);
    let outcome = service.toggle(habit_id, today)?;

    info!(
        "event=habit_toggle module=server status=ok habit_id={habit_id} date={today} outcome={outcome}"
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SummaryRow>>, ApiError> {
    let mut conn = lock_db(&state)?;
    let repo = SqliteDayRepository::try_new(&mut conn)?;
    let service = DayService::new(repo);

    let entries = service.summary()?;
    Ok(Json(entries.into_iter().map(SummaryRow::from).collect()))
}

fn lock_db(state: &AppState) -> Result<std::sync::MutexGuard<'_, rusqlite::Connection>, ApiError> {
    state
        .db
        .lock()
        .map_err(|_| ApiError::Internal("database mutex poisoned".to_string()))
}

fn parse_week_days(indexes: &[u8]) -> Result<Vec<WeekDay>, ApiError> {
    indexes
        .iter()
        .map(|&index| {
            WeekDay::new(index).ok_or_else(|| {
                ApiError::InvalidRequest(format!("weekday index {index} is outside 0..=6"))
            })
        })
        .collect()
}
