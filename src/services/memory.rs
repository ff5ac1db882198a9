use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        activity::Activity,
        link::Link,
        participant::{Participant, ParticipantFilter},
        trip::Trip,
    },
    services::store::TripStore,
};

#[derive(Default)]
struct Tables {
    trips: Vec<Trip>,
    participants: Vec<Participant>,
    activities: Vec<Activity>,
    links: Vec<Link>,
}

/// Process-local [`TripStore`], handy for tests and throwaway instances.
#[derive(Clone, Default)]
pub struct MemoryTripStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn trip_count(&self) -> usize {
        self.tables.read().await.trips.len()
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn create_trip(&self, trip: &Trip, participants: &[Participant]) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.trips.push(trip.clone());
        tables.participants.extend(participants.iter().cloned());
        Ok(())
    }

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.trips.iter().find(|trip| trip.id == id).cloned())
    }

    async fn update_trip(&self, trip: &Trip) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .trips
            .iter_mut()
            .find(|stored| stored.id == trip.id)
            .ok_or(AppError::NotFound("trip"))?;
        slot.destination = trip.destination.clone();
        slot.starts_at = trip.starts_at;
        slot.ends_at = trip.ends_at;
        Ok(())
    }

    async fn confirm_trip(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .trips
            .iter_mut()
            .find(|stored| stored.id == id)
            .ok_or(AppError::NotFound("trip"))?;
        Ok(!std::mem::replace(&mut slot.is_confirmed, true))
    }

    async fn list_participants(
        &self,
        trip_id: Uuid,
        filter: ParticipantFilter,
    ) -> Result<Vec<Participant>, AppError> {
        let tables = self.tables.read().await;
        let mut participants: Vec<_> = tables
            .participants
            .iter()
            .filter(|p| p.trip_id == trip_id && filter.matches(p))
            .cloned()
            .collect();
        participants.sort_by_key(|p| !p.is_owner);
        Ok(participants)
    }

    async fn create_participant(&self, participant: &Participant) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .participants
            .push(participant.clone());
        Ok(())
    }

    async fn find_participant(&self, id: Uuid) -> Result<Option<Participant>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.participants.iter().find(|p| p.id == id).cloned())
    }

    async fn confirm_participant(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .participants
            .iter_mut()
            .find(|stored| stored.id == id)
            .ok_or(AppError::NotFound("participant"))?;
        Ok(!std::mem::replace(&mut slot.is_confirmed, true))
    }

    async fn create_activity(&self, activity: &Activity) -> Result<(), AppError> {
        self.tables.write().await.activities.push(activity.clone());
        Ok(())
    }

    async fn list_activities(&self, trip_id: Uuid) -> Result<Vec<Activity>, AppError> {
        let tables = self.tables.read().await;
        let mut activities: Vec<_> = tables
            .activities
            .iter()
            .filter(|a| a.trip_id == trip_id)
            .cloned()
            .collect();
        activities.sort_by_key(|a| a.occurs_at);
        Ok(activities)
    }

    async fn create_link(&self, link: &Link) -> Result<(), AppError> {
        self.tables.write().await.links.push(link.clone());
        Ok(())
    }

    async fn list_links(&self, trip_id: Uuid) -> Result<Vec<Link>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .iter()
            .filter(|l| l.trip_id == trip_id)
            .cloned()
            .collect())
    }
}
