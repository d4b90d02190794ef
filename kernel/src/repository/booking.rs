use crate::model::{
    booking::{
        event::{CreateBooking, DeleteBooking, UpdateBooking},
        Booking,
    },
    id::{BookingId, UserId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::error::AppResult;

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking after the room-overlap check passes.
    async fn create(&self, event: CreateBooking) -> AppResult<Booking>;
    /// All bookings, newest start time first. Admin view.
    async fn find_all(&self) -> AppResult<Vec<Booking>>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    /// Re-run the overlap check (excluding the booking itself) and
    /// persist the new window and description.
    async fn update(&self, event: UpdateBooking) -> AppResult<Booking>;
    /// Permanently delete a booking.
    async fn delete(&self, event: DeleteBooking) -> AppResult<()>;
    /// Bookings owned by `user_id` starting strictly after `now`,
    /// earliest first.
    async fn find_upcoming_by_user_id(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>>;
}
