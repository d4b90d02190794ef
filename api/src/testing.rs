//! Shared fixtures for handler tests: a registry backed by mock
//! repositories and a few domain object builders.

use crate::extractor::AuthorizedUser;
use chrono::{DateTime, Duration, Utc};
use kernel::model::{
    auth::AccessToken,
    booking::{Booking, BookingRoom},
    id::{BookingId, RoomId, UserId},
    role::Role,
    user::User,
};
use kernel::repository::{
    auth::{AuthRepository, MockAuthRepository},
    booking::{BookingRepository, MockBookingRepository},
    health::{HealthCheckRepository, MockHealthCheckRepository},
    room::{MockRoomRepository, RoomRepository},
    user::{MockUserRepository, UserRepository},
};
use registry::{AppRegistry, AppRegistryExt};
use std::sync::Arc;

pub struct TestRegistry {
    health: Arc<MockHealthCheckRepository>,
    auth: Arc<MockAuthRepository>,
    user: Arc<MockUserRepository>,
    room: Arc<MockRoomRepository>,
    booking: Arc<MockBookingRepository>,
}

impl TestRegistry {
    /// Registry whose booking repository is the given mock; the other
    /// repositories panic when touched.
    pub fn with_booking(booking: MockBookingRepository) -> AppRegistry {
        Arc::new(Self {
            health: Arc::new(MockHealthCheckRepository::new()),
            auth: Arc::new(MockAuthRepository::new()),
            user: Arc::new(MockUserRepository::new()),
            room: Arc::new(MockRoomRepository::new()),
            booking: Arc::new(booking),
        })
    }
}

impl AppRegistryExt for TestRegistry {
    fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health.clone()
    }

    fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth.clone()
    }

    fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user.clone()
    }

    fn room_repository(&self) -> Arc<dyn RoomRepository> {
        self.room.clone()
    }

    fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking.clone()
    }
}

pub fn authorized_user(role: Role) -> AuthorizedUser {
    AuthorizedUser {
        access_token: AccessToken("test-token".into()),
        user: User {
            user_id: UserId::new(),
            username: "test-user".into(),
            email: "test-user@example.com".into(),
            role,
        },
    }
}

pub fn booking_owned_by(owner: &User, start_time: DateTime<Utc>) -> Booking {
    Booking {
        booking_id: BookingId::new(),
        booked_by: owner.clone(),
        start_time,
        end_time: start_time + Duration::hours(1),
        description: None,
        room: BookingRoom {
            room_id: RoomId::new(),
            name: "Conference Room".into(),
            capacity: 10,
        },
    }
}
