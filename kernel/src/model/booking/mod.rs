use crate::model::{
    id::{BookingId, RoomId},
    user::User,
};
use chrono::{DateTime, Utc};

pub mod event;

/// A reservation of one room by one user for a half-open time window
/// `[start_time, end_time)`, joined with its room and owner summaries.
#[derive(Debug, Clone)]
pub struct Booking {
    pub booking_id: BookingId,
    pub booked_by: User,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: Option<String>,
    pub room: BookingRoom,
}

#[derive(Debug, Clone)]
pub struct BookingRoom {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
}

impl Booking {
    /// True when the booking has not started yet at `now`.
    ///
    /// Non-admin owners may only cancel bookings for which this holds.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }

    /// Half-open overlap test: a candidate window `[start_time,
    /// end_time)` conflicts with this booking iff each window starts
    /// before the other ends. Windows sharing only a boundary instant
    /// do not conflict. The repository's conflict query applies this
    /// same predicate in SQL.
    pub fn overlaps(&self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> bool {
        self.start_time < end_time && start_time < self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{id::UserId, role::Role};
    use chrono::Duration;

    fn booking_starting_at(start_time: DateTime<Utc>) -> Booking {
        Booking {
            booking_id: BookingId::new(),
            booked_by: User {
                user_id: UserId::new(),
                username: "alice".into(),
                email: "alice@example.com".into(),
                role: Role::User,
            },
            start_time,
            end_time: start_time + Duration::hours(1),
            description: None,
            room: BookingRoom {
                room_id: RoomId::new(),
                name: "Meeting Room A".into(),
                capacity: 8,
            },
        }
    }

    #[test]
    fn booking_in_the_future_is_upcoming() {
        let now = Utc::now();
        assert!(booking_starting_at(now + Duration::minutes(1)).is_upcoming(now));
    }

    #[test]
    fn started_or_past_booking_is_not_upcoming() {
        let now = Utc::now();
        // boundary: a booking starting exactly now already counts as ongoing
        assert!(!booking_starting_at(now).is_upcoming(now));
        assert!(!booking_starting_at(now - Duration::hours(2)).is_upcoming(now));
    }

    #[test]
    fn intersecting_windows_overlap() {
        let now = Utc::now();
        // existing window is [now, now + 1h)
        let booking = booking_starting_at(now);
        // straddles the start
        assert!(booking.overlaps(now - Duration::minutes(30), now + Duration::minutes(30)));
        // straddles the end
        assert!(booking.overlaps(now + Duration::minutes(30), now + Duration::minutes(90)));
        // contained within the existing window
        assert!(booking.overlaps(now + Duration::minutes(15), now + Duration::minutes(45)));
        // contains the existing window
        assert!(booking.overlaps(now - Duration::hours(1), now + Duration::hours(2)));
        // identical window
        assert!(booking.overlaps(now, now + Duration::hours(1)));
    }

    #[test]
    fn back_to_back_windows_do_not_overlap() {
        let now = Utc::now();
        let booking = booking_starting_at(now);
        // candidate starts exactly where the existing booking ends
        assert!(!booking.overlaps(now + Duration::hours(1), now + Duration::hours(2)));
        // candidate ends exactly where the existing booking starts
        assert!(!booking.overlaps(now - Duration::hours(1), now));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        let now = Utc::now();
        let booking = booking_starting_at(now);
        assert!(!booking.overlaps(now + Duration::hours(2), now + Duration::hours(3)));
        assert!(!booking.overlaps(now - Duration::hours(3), now - Duration::hours(2)));
    }
}
