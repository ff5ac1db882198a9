use askama::Template;
use url::Url;
use uuid::Uuid;

use crate::{
    config::join_base,
    error::AppError,
    models::{dates::long_date, participant::Participant, trip::Trip},
    services::mailer::{MailMessage, Mailbox},
};

#[derive(Template)]
#[template(path = "mail/trip_confirmation.html")]
struct TripConfirmationMail<'a> {
    destination: &'a str,
    starts_on: &'a str,
    ends_on: &'a str,
    confirmation_link: &'a str,
}

#[derive(Template)]
#[template(path = "mail/trip_invitation.html")]
struct TripInvitationMail<'a> {
    destination: &'a str,
    starts_on: &'a str,
    ends_on: &'a str,
    confirmation_link: &'a str,
}

/// Builds the transactional mails of the trip lifecycle.
#[derive(Debug, Clone)]
pub struct Notifications {
    sender: Mailbox,
    api_base_url: Url,
}

impl Notifications {
    pub fn new(sender: Mailbox, api_base_url: Url) -> Self {
        Self {
            sender,
            api_base_url,
        }
    }

    pub fn trip_confirmation_link(&self, trip_id: Uuid) -> String {
        join_base(&self.api_base_url, &format!("trips/{trip_id}/confirm"))
    }

    pub fn participant_confirmation_link(&self, participant_id: Uuid) -> String {
        join_base(
            &self.api_base_url,
            &format!("participants/{participant_id}/confirm"),
        )
    }

    /// Asks the owner to confirm the trip they just created.
    pub fn trip_confirmation_request(
        &self,
        trip: &Trip,
        owner: &Participant,
    ) -> Result<MailMessage, AppError> {
        let starts_on = long_date(trip.starts_at);
        let ends_on = long_date(trip.ends_at);
        let link = self.trip_confirmation_link(trip.id);
        let html_body = TripConfirmationMail {
            destination: &trip.destination,
            starts_on: &starts_on,
            ends_on: &ends_on,
            confirmation_link: &link,
        }
        .render()?;

        Ok(MailMessage {
            from: self.sender.clone(),
            to: Mailbox::new(owner.name.clone(), owner.email.clone()),
            subject: format!("Confirm your trip to {} on {starts_on}", trip.destination),
            html_body,
        })
    }

    /// Asks a guest to confirm their attendance.
    pub fn trip_invitation(
        &self,
        trip: &Trip,
        guest: &Participant,
    ) -> Result<MailMessage, AppError> {
        let starts_on = long_date(trip.starts_at);
        let ends_on = long_date(trip.ends_at);
        let link = self.participant_confirmation_link(guest.id);
        let html_body = TripInvitationMail {
            destination: &trip.destination,
            starts_on: &starts_on,
            ends_on: &ends_on,
            confirmation_link: &link,
        }
        .render()?;

        Ok(MailMessage {
            from: self.sender.clone(),
            to: Mailbox::new(guest.name.clone(), guest.email.clone()),
            subject: format!(
                "You have been invited to a trip to {} on {starts_on}",
                trip.destination
            ),
            html_body,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::{email::Email, trip::TripPlan};

    fn notifications() -> Notifications {
        Notifications::new(
            Mailbox::new(
                Some("plann.er team".into()),
                Email::parse("hello@plann.er").unwrap(),
            ),
            Url::parse("http://localhost:3333").unwrap(),
        )
    }

    fn trip(destination: &str) -> Trip {
        Trip::planned(
            TripPlan {
                destination: destination.into(),
                starts_at: Utc.with_ymd_and_hms(2030, 10, 18, 9, 0, 0).unwrap(),
                ends_at: Utc.with_ymd_and_hms(2030, 10, 21, 18, 0, 0).unwrap(),
            },
            Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn owner_mail_links_to_trip_confirmation() {
        let trip = trip("Paris");
        let owner = Participant::owner(
            trip.id,
            Some("Ana".into()),
            Email::parse("ana@x.com").unwrap(),
        );

        let mail = notifications()
            .trip_confirmation_request(&trip, &owner)
            .unwrap();

        assert_eq!(mail.subject, "Confirm your trip to Paris on October 18, 2030");
        assert_eq!(mail.to.name.as_deref(), Some("Ana"));
        assert_eq!(mail.from.email.as_str(), "hello@plann.er");
        assert!(mail.html_body.contains(&format!(
            "http://localhost:3333/trips/{}/confirm",
            trip.id
        )));
        assert!(mail.html_body.contains("October 21, 2030"));
    }

    #[test]
    fn guest_mail_links_to_participant_confirmation() {
        let trip = trip("Paris");
        let guest = Participant::invitee(trip.id, Email::parse("b@x.com").unwrap());

        let mail = notifications().trip_invitation(&trip, &guest).unwrap();

        assert_eq!(mail.to.email.as_str(), "b@x.com");
        assert!(mail.subject.starts_with("You have been invited to a trip to Paris"));
        assert!(mail.html_body.contains(&format!(
            "http://localhost:3333/participants/{}/confirm",
            guest.id
        )));
    }

    #[test]
    fn destination_is_escaped_in_the_body() {
        let trip = trip("<b>Oslo</b>");
        let guest = Participant::invitee(trip.id, Email::parse("b@x.com").unwrap());

        let mail = notifications().trip_invitation(&trip, &guest).unwrap();

        assert!(!mail.html_body.contains("<b>Oslo</b>"));
        assert!(mail.html_body.contains("&lt;b&gt;Oslo"));
    }
}
