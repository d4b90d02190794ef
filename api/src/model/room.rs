use garde::Validate;
use kernel::model::{
    id::RoomId,
    room::{event::CreateRoom, Room},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(skip)]
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateRoomRequest> for CreateRoom {
    fn from(value: CreateRoomRequest) -> Self {
        let CreateRoomRequest {
            name,
            capacity,
            description,
        } = value;
        CreateRoom {
            name,
            capacity,
            description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub description: Option<String>,
}

impl From<Room> for RoomResponse {
    fn from(value: Room) -> Self {
        let Room {
            room_id,
            name,
            capacity,
            description,
        } = value;
        Self {
            room_id,
            name,
            capacity,
            description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoomsResponse {
    pub items: Vec<RoomResponse>,
}

impl From<Vec<Room>> for RoomsResponse {
    fn from(value: Vec<Room>) -> Self {
        Self {
            items: value.into_iter().map(RoomResponse::from).collect(),
        }
    }
}
