use crate::model::id::{BookingId, RoomId, UserId};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(new, Debug)]
pub struct CreateBooking {
    pub room_id: RoomId,
    pub booked_by: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
}

#[derive(new, Debug)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
}

#[derive(new, Debug)]
pub struct DeleteBooking {
    pub booking_id: BookingId,
}
