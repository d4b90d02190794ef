use crate::database::{model::booking::BookingRow, ConnectionPool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_new::new;
use kernel::model::{
    booking::{
        event::{CreateBooking, DeleteBooking, UpdateBooking},
        Booking,
    },
    id::{BookingId, RoomId, UserId},
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

/// Columns shared by every joined booking query.
const SELECT_BOOKING: &str = r#"
    SELECT
        b.booking_id,
        b.room_id,
        b.user_id,
        b.start_time,
        b.end_time,
        b.description,
        r.name AS room_name,
        r.capacity,
        u.username,
        u.email,
        u.role
    FROM bookings AS b
    INNER JOIN rooms AS r ON b.room_id = r.room_id
    INNER JOIN users AS u ON b.user_id = u.user_id
"#;

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        // The overlap check and the insert must observe the same
        // snapshot, otherwise two concurrent requests for the same
        // room could both pass the check.
        self.set_transaction_serializable(&mut tx).await?;

        let room = sqlx::query("SELECT room_id FROM rooms WHERE room_id = $1")
            .bind(event.room_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        if room.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "room ({}) was not found",
                event.room_id
            )));
        }

        self.ensure_window_free(&mut tx, event.room_id, event.start_time, event.end_time, None)
            .await?;

        let booking_id = BookingId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, room_id, user_id, start_time, end_time, description)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(booking_id)
        .bind(event.room_id)
        .bind(event.booked_by)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.description)
        .execute(&mut *tx)
        .await
        .map_err(map_booking_write_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no booking record has been created".into(),
            ));
        }

        let booking = self.fetch_joined(&mut tx, booking_id).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(booking)
    }

    async fn find_all(&self) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> =
            sqlx::query_as(&format!("{SELECT_BOOKING} ORDER BY b.start_time DESC"))
                .fetch_all(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("{SELECT_BOOKING} WHERE b.booking_id = $1"))
                .bind(booking_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        row.map(Booking::try_from).transpose()
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        self.ensure_window_free(
            &mut tx,
            event.room_id,
            event.start_time,
            event.end_time,
            Some(event.booking_id),
        )
        .await?;

        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET start_time = $1, end_time = $2, description = $3
                WHERE booking_id = $4
            "#,
        )
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.description)
        .bind(event.booking_id)
        .execute(&mut *tx)
        .await
        .map_err(map_booking_write_error)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "booking ({}) was not found",
                event.booking_id
            )));
        }

        let booking = self.fetch_joined(&mut tx, event.booking_id).await?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(booking)
    }

    async fn delete(&self, event: DeleteBooking) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
            .bind(event.booking_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "booking ({}) was not found",
                event.booking_id
            )));
        }

        Ok(())
    }

    async fn find_upcoming_by_user_id(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "{SELECT_BOOKING} WHERE b.user_id = $1 AND b.start_time > $2 ORDER BY b.start_time ASC"
        ))
        .bind(user_id)
        .bind(now)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Booking::try_from).collect()
    }
}

impl BookingRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    /// Overlap test for half-open windows: a candidate [S, E) conflicts
    /// with an existing [S', E') in the same room iff S < E' and S' < E.
    /// Back-to-back bookings (E == S') are allowed. The WHERE clause is
    /// the SQL form of `Booking::overlaps`. On update, the booking
    /// being updated is excluded from the check.
    async fn ensure_window_free(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: RoomId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude: Option<BookingId>,
    ) -> AppResult<()> {
        let conflict = match exclude {
            Some(booking_id) => {
                sqlx::query(
                    r#"
                        SELECT booking_id FROM bookings
                        WHERE room_id = $1
                          AND start_time < $3
                          AND $2 < end_time
                          AND booking_id <> $4
                        LIMIT 1
                    "#,
                )
                .bind(room_id)
                .bind(start_time)
                .bind(end_time)
                .bind(booking_id)
                .fetch_optional(&mut **tx)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                        SELECT booking_id FROM bookings
                        WHERE room_id = $1
                          AND start_time < $3
                          AND $2 < end_time
                        LIMIT 1
                    "#,
                )
                .bind(room_id)
                .bind(start_time)
                .bind(end_time)
                .fetch_optional(&mut **tx)
                .await
            }
        }
        .map_err(AppError::SpecificOperationError)?;

        if conflict.is_some() {
            return Err(AppError::UnprocessableEntity(format!(
                "room ({room_id}) is already booked for this time window"
            )));
        }

        Ok(())
    }

    async fn fetch_joined(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        booking_id: BookingId,
    ) -> AppResult<Booking> {
        let row: BookingRow = sqlx::query_as(&format!("{SELECT_BOOKING} WHERE b.booking_id = $1"))
            .bind(booking_id)
            .fetch_one(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        Booking::try_from(row)
    }
}

/// The bookings table enforces an exclusion constraint on
/// (room_id, tstzrange(start_time, end_time)) and a CHECK that
/// start_time < end_time. Surface both as client errors.
fn map_booking_write_error(e: sqlx::Error) -> AppError {
    if let Some(code) = e.as_database_error().and_then(|db| db.code()) {
        // 23P01: exclusion_violation, 23514: check_violation
        if code == "23P01" {
            return AppError::UnprocessableEntity(
                "room is already booked for this time window".into(),
            );
        }
        if code == "23514" {
            return AppError::UnprocessableEntity(
                "start_time must be earlier than end_time".into(),
            );
        }
    }
    AppError::SpecificOperationError(e)
}
