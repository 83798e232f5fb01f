//! Upcoming-alerts handler: merges due checkup reminders and scheduled
//! vaccinations into one chronological list.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_WINDOW_DAYS: i64 = 30;
const MAX_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub(super) struct AlertsQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct AlertItem {
    /// `"checkup"` or `"vaccination"`.
    pub kind: &'static str,
    pub source_id: i64,
    pub pet_id: i64,
    pub pet_name: String,
    pub title: String,
    pub due_date: DateTime<Utc>,
    /// `"upcoming"` when the due date is still ahead, `"overdue"` otherwise.
    pub status: &'static str,
}

fn status_for(due_date: DateTime<Utc>, now: DateTime<Utc>) -> &'static str {
    if due_date < now {
        "overdue"
    } else {
        "upcoming"
    }
}

/// GET /api/v1/upcoming-alerts?days=
pub(super) async fn upcoming_alerts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<ApiResponse<Vec<AlertItem>>>, ApiError> {
    let days = query
        .days
        .unwrap_or(DEFAULT_WINDOW_DAYS)
        .clamp(1, MAX_WINDOW_DAYS);
    let now = Utc::now();
    let until = now + Duration::days(days);

    let reminders = pawkeep_db::list_due_reminders(&state.pool, user.0, until)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let vaccinations = pawkeep_db::list_scheduled_vaccinations_due(&state.pool, user.0, until)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let mut alerts: Vec<AlertItem> = reminders
        .into_iter()
        .map(|(reminder, pet_name)| AlertItem {
            kind: "checkup",
            source_id: reminder.id,
            pet_id: reminder.pet_id,
            pet_name,
            title: reminder.title,
            due_date: reminder.due_date,
            status: status_for(reminder.due_date, now),
        })
        .collect();

    alerts.extend(vaccinations.into_iter().filter_map(|(vaccination, pet_name)| {
        let due_date = vaccination.scheduled_date?;
        Some(AlertItem {
            kind: "vaccination",
            source_id: vaccination.id,
            pet_id: vaccination.pet_id,
            pet_name,
            title: vaccination.vaccine_name,
            due_date,
            status: status_for(due_date, now),
        })
    }));

    alerts.sort_by_key(|a| a.due_date);

    Ok(Json(ApiResponse {
        data: alerts,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reflects_due_date_side_of_now() {
        let now = Utc::now();
        assert_eq!(status_for(now + Duration::hours(1), now), "upcoming");
        assert_eq!(status_for(now - Duration::hours(1), now), "overdue");
    }
}
