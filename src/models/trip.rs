use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{dates::parse_timestamp, email::Email, normalize_optional},
};

const MIN_DESTINATION_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub id: Uuid,
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_confirmed: bool,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

impl Trip {
    pub fn planned(plan: TripPlan, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            destination: plan.destination,
            starts_at: plan.starts_at,
            ends_at: plan.ends_at,
            is_confirmed: false,
            created_at: now,
        }
    }

    pub fn reschedule(&mut self, plan: TripPlan) {
        self.destination = plan.destination;
        self.starts_at = plan.starts_at;
        self.ends_at = plan.ends_at;
    }

    pub fn covers(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.starts_at && ts <= self.ends_at
    }
}

/// Destination and date range of a trip, as submitted by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl TripPlan {
    pub fn parse(destination: &str, starts_at: &str, ends_at: &str) -> Result<Self, AppError> {
        let destination = destination.trim();
        if destination.chars().count() < MIN_DESTINATION_LEN {
            return Err(AppError::validation(format!(
                "destination must have at least {MIN_DESTINATION_LEN} characters"
            )));
        }
        Ok(Self {
            destination: destination.to_string(),
            starts_at: parse_timestamp("starts_at", starts_at)?,
            ends_at: parse_timestamp("ends_at", ends_at)?,
        })
    }

    pub fn check_schedule(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.starts_at < now {
            return Err(AppError::invalid_dates("trip cannot start in the past"));
        }
        if self.ends_at < self.starts_at {
            return Err(AppError::invalid_dates("trip cannot end before it starts"));
        }
        Ok(())
    }
}

/// Everything needed to open a trip: the plan, its owner and the first invitees.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub plan: TripPlan,
    pub owner_name: Option<String>,
    pub owner_email: Email,
    pub invitees: Vec<Email>,
}

impl NewTrip {
    pub fn new(
        plan: TripPlan,
        owner_name: &str,
        owner_email: &str,
        invitees: &[String],
    ) -> Result<Self, AppError> {
        let invitees = invitees
            .iter()
            .map(|raw| Email::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            plan,
            owner_name: normalize_optional(owner_name),
            owner_email: Email::parse(owner_email)?,
            invitees,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn plan_from_now(start_days: i64, end_days: i64) -> TripPlan {
        let now = Utc::now();
        TripPlan {
            destination: "Paris".into(),
            starts_at: now + Duration::days(start_days),
            ends_at: now + Duration::days(end_days),
        }
    }

    #[test]
    fn short_destinations_are_rejected() {
        let err = TripPlan::parse(" Rio ", "2030-01-01", "2030-01-02").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(TripPlan::parse("Lima", "2030-01-01", "2030-01-02").is_ok());
    }

    #[test]
    fn schedule_must_start_in_the_future_and_end_after_start() {
        let now = Utc::now();
        assert!(plan_from_now(7, 10).check_schedule(now).is_ok());
        assert!(plan_from_now(7, 7).check_schedule(now).is_ok());
        assert!(matches!(
            plan_from_now(-1, 3).check_schedule(now),
            Err(AppError::InvalidDateRange(_))
        ));
        assert!(matches!(
            plan_from_now(7, 6).check_schedule(now),
            Err(AppError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn new_trip_validates_every_address() {
        let plan = plan_from_now(7, 10);
        let ok = NewTrip::new(
            plan.clone(),
            "  ",
            "ana@x.com",
            &["b@x.com".to_string(), "c@x.com".to_string()],
        )
        .unwrap();
        assert_eq!(ok.owner_name, None);
        assert_eq!(ok.invitees.len(), 2);

        let err = NewTrip::new(plan, "Ana", "ana@x.com", &["nope".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
