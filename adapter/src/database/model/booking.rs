use kernel::model::{
    booking::{Booking, BookingRoom},
    id::{BookingId, RoomId, UserId},
    role::Role,
    user::User,
};
use shared::error::AppError;
use sqlx::types::chrono::{DateTime, Utc};
use std::str::FromStr;

/// A booking joined with its room and owning user.
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
    pub room_name: String,
    pub capacity: i32,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            room_id,
            user_id,
            start_time,
            end_time,
            description,
            room_name,
            capacity,
            username,
            email,
            role,
        } = value;
        let role = Role::from_str(&role)
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
        Ok(Booking {
            booking_id,
            booked_by: User {
                user_id,
                username,
                email,
                role,
            },
            start_time,
            end_time,
            description,
            room: BookingRoom {
                room_id,
                name: room_name,
                capacity,
            },
        })
    }
}
