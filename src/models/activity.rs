use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{dates::parse_timestamp, require_text, trip::Trip},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: Uuid,
    #[serde(skip)]
    pub trip_id: Uuid,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

impl NewActivity {
    pub fn new(title: &str, occurs_at: &str) -> Result<Self, AppError> {
        Ok(Self {
            title: require_text("title", title)?,
            occurs_at: parse_timestamp("occurs_at", occurs_at)?,
        })
    }

    pub fn into_activity(self, trip_id: Uuid) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            trip_id,
            title: self.title,
            occurs_at: self.occurs_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
}

/// One entry per calendar day (UTC) of the trip, each holding that day's
/// activities in chronological order. Activities outside the trip's days are
/// left out.
pub fn plan_days(trip: &Trip, mut activities: Vec<Activity>) -> Vec<DayPlan> {
    activities.sort_by_key(|activity| activity.occurs_at);

    let first = trip.starts_at.date_naive();
    let last = trip.ends_at.date_naive();
    let mut days = Vec::new();
    let mut day = first;
    while day <= last {
        days.push(DayPlan {
            date: day,
            activities: Vec::new(),
        });
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }

    for activity in activities {
        let offset = (activity.occurs_at.date_naive() - first).num_days();
        let slot = usize::try_from(offset)
            .ok()
            .and_then(|index| days.get_mut(index));
        if let Some(slot) = slot {
            slot.activities.push(activity);
        }
    }
    days
}
