use serde::Serialize;
use uuid::Uuid;

use crate::models::email::Email;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub id: Uuid,
    #[serde(skip)]
    pub trip_id: Uuid,
    pub name: Option<String>,
    pub email: Email,
    #[serde(skip)]
    pub is_owner: bool,
    pub is_confirmed: bool,
}

impl Participant {
    /// The trip owner starts out confirmed.
    pub fn owner(trip_id: Uuid, name: Option<String>, email: Email) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            name,
            email,
            is_owner: true,
            is_confirmed: true,
        }
    }

    pub fn invitee(trip_id: Uuid, email: Email) -> Self {
        Self {
            id: Uuid::new_v4(),
            trip_id,
            name: None,
            email,
            is_owner: false,
            is_confirmed: false,
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantFilter {
    All,
    Owner,
    Guests,
}

impl ParticipantFilter {
    pub fn matches(self, participant: &Participant) -> bool {
        match self {
            ParticipantFilter::All => true,
            ParticipantFilter::Owner => participant.is_owner,
            ParticipantFilter::Guests => !participant.is_owner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantConfirmation {
    Confirmed { trip_id: Uuid },
    AlreadyConfirmed { trip_id: Uuid },
}

impl ParticipantConfirmation {
    pub fn trip_id(&self) -> Uuid {
        match self {
            ParticipantConfirmation::Confirmed { trip_id }
            | ParticipantConfirmation::AlreadyConfirmed { trip_id } => *trip_id,
        }
    }
}
