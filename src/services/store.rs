use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    query::Query,
    sqlite::{Sqlite, SqliteArguments},
    FromRow,
};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        activity::Activity,
        email::Email,
        link::Link,
        participant::{Participant, ParticipantFilter},
        trip::Trip,
    },
};

/// Reads and writes trips and everything hanging off them.
///
/// Lookups by id return `Ok(None)` when nothing matches; writes to a row
/// that does not exist fail with [`AppError::NotFound`].
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Stores the trip together with its initial participants, all or nothing.
    async fn create_trip(&self, trip: &Trip, participants: &[Participant]) -> Result<(), AppError>;
    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError>;
    /// Writes destination and dates only; the confirmation flag is left alone.
    async fn update_trip(&self, trip: &Trip) -> Result<(), AppError>;
    /// Sets the confirmation flag if it is still unset. `Ok(false)` means the
    /// trip was already confirmed.
    async fn confirm_trip(&self, id: Uuid) -> Result<bool, AppError>;

    /// Owner first, then in creation order.
    async fn list_participants(
        &self,
        trip_id: Uuid,
        filter: ParticipantFilter,
    ) -> Result<Vec<Participant>, AppError>;
    async fn create_participant(&self, participant: &Participant) -> Result<(), AppError>;
    async fn find_participant(&self, id: Uuid) -> Result<Option<Participant>, AppError>;
    /// Same contract as [`TripStore::confirm_trip`].
    async fn confirm_participant(&self, id: Uuid) -> Result<bool, AppError>;

    async fn create_activity(&self, activity: &Activity) -> Result<(), AppError>;
    async fn list_activities(&self, trip_id: Uuid) -> Result<Vec<Activity>, AppError>;

    async fn create_link(&self, link: &Link) -> Result<(), AppError>;
    /// In creation order.
    async fn list_links(&self, trip_id: Uuid) -> Result<Vec<Link>, AppError>;
}

#[derive(Clone)]
pub struct SqliteTripStore {
    pool: DbPool,
}

impl SqliteTripStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TripRow {
    id: String,
    destination: String,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    is_confirmed: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<TripRow> for Trip {
    type Error = AppError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        Ok(Trip {
            id: parse_uuid(&row.id)?,
            destination: row.destination,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            is_confirmed: row.is_confirmed,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct ParticipantRow {
    id: String,
    trip_id: String,
    name: Option<String>,
    email: String,
    is_owner: bool,
    is_confirmed: bool,
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = AppError;

    fn try_from(row: ParticipantRow) -> Result<Self, Self::Error> {
        // a bad stored address is our fault, not the caller's
        let email = Email::parse(&row.email)
            .map_err(|err| AppError::Other(anyhow!("participant {}: {err}", row.id)))?;
        Ok(Participant {
            id: parse_uuid(&row.id)?,
            trip_id: parse_uuid(&row.trip_id)?,
            name: row.name,
            email,
            is_owner: row.is_owner,
            is_confirmed: row.is_confirmed,
        })
    }
}

#[derive(FromRow)]
struct ActivityRow {
    id: String,
    trip_id: String,
    title: String,
    occurs_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = AppError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Activity {
            id: parse_uuid(&row.id)?,
            trip_id: parse_uuid(&row.trip_id)?,
            title: row.title,
            occurs_at: row.occurs_at,
        })
    }
}

#[derive(FromRow)]
struct LinkRow {
    id: String,
    trip_id: String,
    title: String,
    url: String,
}

impl TryFrom<LinkRow> for Link {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        Ok(Link {
            id: parse_uuid(&row.id)?,
            trip_id: parse_uuid(&row.trip_id)?,
            title: row.title,
            url: row.url,
        })
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|err| AppError::Other(err.into()))
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

fn insert_participant(participant: &Participant) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(
        "INSERT INTO participants (id, trip_id, name, email, is_owner, is_confirmed) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(participant.id.to_string())
    .bind(participant.trip_id.to_string())
    .bind(participant.name.as_deref())
    .bind(participant.email.as_str())
    .bind(participant.is_owner)
    .bind(participant.is_confirmed)
}

const PARTICIPANT_COLUMNS: &str = "id, trip_id, name, email, is_owner, is_confirmed";

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn create_trip(&self, trip: &Trip, participants: &[Participant]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO trips (id, destination, starts_at, ends_at, is_confirmed, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(trip.id.to_string())
        .bind(&trip.destination)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .bind(trip.is_confirmed)
        .bind(trip.created_at)
        .execute(&mut *tx)
        .await?;
        for participant in participants {
            insert_participant(participant).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, AppError> {
        let row = sqlx::query_as::<_, TripRow>(
            "SELECT id, destination, starts_at, ends_at, is_confirmed, created_at FROM trips WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Trip::try_from).transpose()
    }

    async fn update_trip(&self, trip: &Trip) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE trips SET destination = ?1, starts_at = ?2, ends_at = ?3 WHERE id = ?4",
        )
        .bind(&trip.destination)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .bind(trip.id.to_string())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("trip"));
        }
        Ok(())
    }

    async fn confirm_trip(&self, id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE trips SET is_confirmed = 1 WHERE id = ?1 AND is_confirmed = 0")
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        match self.find_trip(id).await? {
            Some(_) => Ok(false),
            None => Err(AppError::NotFound("trip")),
        }
    }

    async fn list_participants(
        &self,
        trip_id: Uuid,
        filter: ParticipantFilter,
    ) -> Result<Vec<Participant>, AppError> {
        let owner_clause = match filter {
            ParticipantFilter::All => "",
            ParticipantFilter::Owner => " AND is_owner = 1",
            ParticipantFilter::Guests => " AND is_owner = 0",
        };
        let sql = format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE trip_id = ?1{owner_clause} ORDER BY is_owner DESC, rowid ASC"
        );
        let rows = sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(trip_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        convert_all(rows)
    }

    async fn create_participant(&self, participant: &Participant) -> Result<(), AppError> {
        insert_participant(participant).execute(&self.pool).await?;
        Ok(())
    }

    async fn find_participant(&self, id: Uuid) -> Result<Option<Participant>, AppError> {
        let sql = format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = ?1");
        let row = sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Participant::try_from).transpose()
    }

    async fn confirm_participant(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE participants SET is_confirmed = 1 WHERE id = ?1 AND is_confirmed = 0",
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        match self.find_participant(id).await? {
            Some(_) => Ok(false),
            None => Err(AppError::NotFound("participant")),
        }
    }

    async fn create_activity(&self, activity: &Activity) -> Result<(), AppError> {
        sqlx::query("INSERT INTO activities (id, trip_id, title, occurs_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(activity.id.to_string())
            .bind(activity.trip_id.to_string())
            .bind(&activity.title)
            .bind(activity.occurs_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_activities(&self, trip_id: Uuid) -> Result<Vec<Activity>, AppError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            "SELECT id, trip_id, title, occurs_at FROM activities WHERE trip_id = ?1 ORDER BY occurs_at ASC",
        )
        .bind(trip_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn create_link(&self, link: &Link) -> Result<(), AppError> {
        sqlx::query("INSERT INTO links (id, trip_id, title, url) VALUES (?1, ?2, ?3, ?4)")
            .bind(link.id.to_string())
            .bind(link.trip_id.to_string())
            .bind(&link.title)
            .bind(&link.url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_links(&self, trip_id: Uuid) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            "SELECT id, trip_id, title, url FROM links WHERE trip_id = ?1 ORDER BY rowid ASC",
        )
        .bind(trip_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }
}
