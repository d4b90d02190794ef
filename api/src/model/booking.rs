use crate::model::user::UserResponse;
use chrono::{DateTime, Utc};
use kernel::model::{
    booking::{Booking, BookingRoom},
    id::{BookingId, RoomId, UserId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub room_id: RoomId,
    /// Book on behalf of another user; admin only.
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub booked_by: UserResponse,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
    pub room: BookingRoomResponse,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            booked_by,
            start_time,
            end_time,
            description,
            room,
        } = value;
        Self {
            booking_id,
            booked_by: booked_by.into(),
            start_time,
            end_time,
            description,
            room: room.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingRoomResponse {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
}

impl From<BookingRoom> for BookingRoomResponse {
    fn from(value: BookingRoom) -> Self {
        let BookingRoom {
            room_id,
            name,
            capacity,
        } = value;
        Self {
            room_id,
            name,
            capacity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteBookingResponse {
    pub booking_id: BookingId,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_booking_request_uses_snake_case_fields() {
        let json = r#"{
            "room_id": "3e9c1a9e-9e08-4e0b-8f53-1c6c1c8a0001",
            "start_time": "2024-01-01T10:00:00Z",
            "end_time": "2024-01-01T11:00:00Z"
        }"#;
        let req: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert!(req.user_id.is_none());
        assert!(req.description.is_none());
        assert!(req.start_time < req.end_time);
    }

    #[test]
    fn create_booking_request_accepts_owner_override() {
        let json = r#"{
            "room_id": "3e9c1a9e-9e08-4e0b-8f53-1c6c1c8a0001",
            "user_id": "3e9c1a9e-9e08-4e0b-8f53-1c6c1c8a0002",
            "start_time": "2024-01-01T10:00:00Z",
            "end_time": "2024-01-01T11:00:00Z",
            "description": "weekly sync"
        }"#;
        let req: CreateBookingRequest = serde_json::from_str(json).unwrap();
        assert!(req.user_id.is_some());
        assert_eq!(req.description.as_deref(), Some("weekly sync"));
    }

    #[test]
    fn create_booking_request_rejects_missing_required_fields() {
        let json = r#"{ "room_id": "3e9c1a9e-9e08-4e0b-8f53-1c6c1c8a0001" }"#;
        assert!(serde_json::from_str::<CreateBookingRequest>(json).is_err());
    }
}
