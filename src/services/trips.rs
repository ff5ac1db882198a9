use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        activity::{plan_days, DayPlan, NewActivity},
        email::Email,
        link::{Link, NewLink},
        participant::{Participant, ParticipantConfirmation, ParticipantFilter},
        trip::{NewTrip, Trip, TripPlan},
    },
    services::{mailer::Mailer, notifications::Notifications, store::TripStore},
};

/// How the guest notifications of a trip confirmation went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripConfirmation {
    Confirmed(DispatchReport),
    AlreadyConfirmed,
}

#[derive(Clone)]
pub struct TripService {
    store: Arc<dyn TripStore>,
    mailer: Arc<dyn Mailer>,
    notifications: Notifications,
}

impl TripService {
    pub fn new(
        store: Arc<dyn TripStore>,
        mailer: Arc<dyn Mailer>,
        notifications: Notifications,
    ) -> Self {
        Self {
            store,
            mailer,
            notifications,
        }
    }

    /// Opens a trip with a confirmed owner and unconfirmed invitees, then asks
    /// the owner to confirm it. A failed mail surfaces as [`AppError::Mail`]
    /// but the trip stays stored.
    pub async fn create_trip(&self, new_trip: NewTrip) -> Result<Uuid, AppError> {
        let now = Utc::now();
        new_trip.plan.check_schedule(now)?;

        let trip = Trip::planned(new_trip.plan, now);
        let owner = Participant::owner(trip.id, new_trip.owner_name, new_trip.owner_email);
        let mut participants = Vec::with_capacity(new_trip.invitees.len() + 1);
        participants.push(owner.clone());
        participants.extend(
            new_trip
                .invitees
                .into_iter()
                .map(|email| Participant::invitee(trip.id, email)),
        );

        self.store.create_trip(&trip, &participants).await?;
        info!(trip_id = %trip.id, participants = participants.len(), "trip created");

        let message = self.notifications.trip_confirmation_request(&trip, &owner)?;
        if let Err(err) = self.mailer.send(&message).await {
            warn!(trip_id = %trip.id, email = %owner.email, "confirmation mail failed: {err}");
            return Err(err);
        }
        Ok(trip.id)
    }

    pub async fn update_trip(&self, trip_id: Uuid, plan: TripPlan) -> Result<Uuid, AppError> {
        let mut trip = self.require_trip(trip_id).await?;
        plan.check_schedule(Utc::now())?;
        trip.reschedule(plan);
        self.store.update_trip(&trip).await?;
        info!(trip_id = %trip.id, "trip updated");
        Ok(trip.id)
    }

    /// Confirms the trip and invites every guest. Mails go out concurrently;
    /// a failed one is logged and counted but never undoes the confirmation.
    /// Only the call that flips the flag sends anything.
    pub async fn confirm_trip(&self, trip_id: Uuid) -> Result<TripConfirmation, AppError> {
        let mut trip = self.require_trip(trip_id).await?;
        if trip.is_confirmed || !self.store.confirm_trip(trip.id).await? {
            return Ok(TripConfirmation::AlreadyConfirmed);
        }
        trip.is_confirmed = true;

        let guests = self
            .store
            .list_participants(trip.id, ParticipantFilter::Guests)
            .await?;
        let sends = guests.iter().map(|guest| {
            let trip = &trip;
            async move {
                let message = self.notifications.trip_invitation(trip, guest)?;
                self.mailer.send(&message).await
            }
        });
        let results = join_all(sends).await;

        let mut report = DispatchReport::default();
        for (guest, result) in guests.iter().zip(results) {
            match result {
                Ok(_) => report.delivered += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        participant_id = %guest.id,
                        email = %guest.email,
                        "invitation mail failed: {err}"
                    );
                }
            }
        }
        info!(
            trip_id = %trip.id,
            delivered = report.delivered,
            failed = report.failed,
            "trip confirmed"
        );
        Ok(TripConfirmation::Confirmed(report))
    }

    /// Adds an unconfirmed participant and mails them. Repeated addresses are
    /// not detected.
    pub async fn create_invite(&self, trip_id: Uuid, email: Email) -> Result<Uuid, AppError> {
        let trip = self.require_trip(trip_id).await?;
        let participant = Participant::invitee(trip.id, email);
        self.store.create_participant(&participant).await?;
        info!(trip_id = %trip.id, participant_id = %participant.id, "participant invited");

        let message = self.notifications.trip_invitation(&trip, &participant)?;
        if let Err(err) = self.mailer.send(&message).await {
            warn!(participant_id = %participant.id, email = %participant.email, "invitation mail failed: {err}");
            return Err(err);
        }
        Ok(participant.id)
    }

    pub async fn confirm_participant(
        &self,
        participant_id: Uuid,
    ) -> Result<ParticipantConfirmation, AppError> {
        let participant = self.get_participant(participant_id).await?;
        let trip_id = participant.trip_id;
        if participant.is_confirmed || !self.store.confirm_participant(participant.id).await? {
            return Ok(ParticipantConfirmation::AlreadyConfirmed { trip_id });
        }
        info!(participant_id = %participant.id, "participant confirmed");
        Ok(ParticipantConfirmation::Confirmed { trip_id })
    }

    pub async fn get_participant(&self, participant_id: Uuid) -> Result<Participant, AppError> {
        self.store
            .find_participant(participant_id)
            .await?
            .ok_or(AppError::NotFound("participant"))
    }

    pub async fn get_participants(&self, trip_id: Uuid) -> Result<Vec<Participant>, AppError> {
        let trip = self.require_trip(trip_id).await?;
        self.store
            .list_participants(trip.id, ParticipantFilter::All)
            .await
    }

    pub async fn get_trip_details(&self, trip_id: Uuid) -> Result<Trip, AppError> {
        self.require_trip(trip_id).await
    }

    pub async fn create_activity(
        &self,
        trip_id: Uuid,
        activity: NewActivity,
    ) -> Result<Uuid, AppError> {
        let trip = self.require_trip(trip_id).await?;
        if !trip.covers(activity.occurs_at) {
            return Err(AppError::invalid_dates(
                "activity must take place during the trip",
            ));
        }
        let activity = activity.into_activity(trip.id);
        self.store.create_activity(&activity).await?;
        Ok(activity.id)
    }

    pub async fn get_activities(&self, trip_id: Uuid) -> Result<Vec<DayPlan>, AppError> {
        let trip = self.require_trip(trip_id).await?;
        let activities = self.store.list_activities(trip.id).await?;
        Ok(plan_days(&trip, activities))
    }

    pub async fn create_link(&self, trip_id: Uuid, link: NewLink) -> Result<Uuid, AppError> {
        let trip = self.require_trip(trip_id).await?;
        let link = link.into_link(trip.id);
        self.store.create_link(&link).await?;
        Ok(link.id)
    }

    pub async fn get_links(&self, trip_id: Uuid) -> Result<Vec<Link>, AppError> {
        let trip = self.require_trip(trip_id).await?;
        self.store.list_links(trip.id).await
    }

    async fn require_trip(&self, trip_id: Uuid) -> Result<Trip, AppError> {
        self.store
            .find_trip(trip_id)
            .await?
            .ok_or(AppError::NotFound("trip"))
    }
}
