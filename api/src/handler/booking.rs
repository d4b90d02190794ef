use crate::{
    extractor::{AuthorizedUser, Json},
    model::booking::{
        BookingResponse, BookingsResponse, CreateBookingRequest, DeleteBookingResponse,
        UpdateBookingRequest,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use kernel::model::{
    booking::event::{CreateBooking, DeleteBooking, UpdateBooking},
    id::BookingId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    // booking on behalf of someone else is an admin-only operation,
    // rejected before any time-window validation
    let booked_by = match req.user_id {
        Some(owner_id) if owner_id != user.id() => {
            if !user.is_admin() {
                return Err(AppError::ForbiddenOperation);
            }
            owner_id
        }
        Some(owner_id) => owner_id,
        None => user.id(),
    };

    validate_window(req.start_time, req.end_time)?;

    let event = CreateBooking::new(
        req.room_id,
        booked_by,
        req.start_time,
        req.end_time,
        req.description,
    );
    let booking = registry.booking_repository().create(event).await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// Admin view over every booking, newest start time first.
pub async fn show_booking_list(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .booking_repository()
        .find_all()
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    _user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    registry
        .booking_repository()
        .find_by_id(booking_id)
        .await
        .and_then(|booking| match booking {
            Some(booking) => Ok(Json(booking.into())),
            None => Err(AppError::EntityNotFound(format!(
                "booking ({booking_id}) was not found"
            ))),
        })
}

pub async fn update_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("booking ({booking_id}) was not found"))
        })?;

    if !user.is_admin() && booking.booked_by.user_id != user.id() {
        return Err(AppError::ForbiddenOperation);
    }

    validate_window(req.start_time, req.end_time)?;

    let event = UpdateBooking::new(
        booking_id,
        booking.room.room_id,
        req.start_time,
        req.end_time,
        req.description,
    );
    registry
        .booking_repository()
        .update(event)
        .await
        .map(BookingResponse::from)
        .map(Json)
}

pub async fn delete_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DeleteBookingResponse>> {
    let booking = registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("booking ({booking_id}) was not found"))
        })?;

    if !user.is_admin() && booking.booked_by.user_id != user.id() {
        return Err(AppError::ForbiddenOperation);
    }

    // owners may only cancel before the booking starts; admins may
    // cancel anything
    if !user.is_admin() && !booking.is_upcoming(Utc::now()) {
        return Err(AppError::UnprocessableEntity(
            "cannot cancel past or ongoing booking".into(),
        ));
    }

    registry
        .booking_repository()
        .delete(DeleteBooking::new(booking_id))
        .await?;

    Ok(Json(DeleteBookingResponse {
        booking_id,
        message: "booking cancelled successfully".into(),
    }))
}

fn validate_window(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> AppResult<()> {
    if start_time >= end_time {
        return Err(AppError::UnprocessableEntity(
            "start_time must be earlier than end_time".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{authorized_user, booking_owned_by, TestRegistry};
    use chrono::Duration;
    use kernel::model::{
        id::{RoomId, UserId},
        role::Role,
        user::User,
    };
    use kernel::repository::booking::MockBookingRepository;

    fn create_request(user_id: Option<UserId>) -> CreateBookingRequest {
        let start_time = Utc::now() + Duration::hours(2);
        CreateBookingRequest {
            room_id: RoomId::new(),
            user_id,
            start_time,
            end_time: start_time + Duration::hours(1),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_for_another_user_requires_admin() {
        let registry = TestRegistry::with_booking(MockBookingRepository::new());
        let user = authorized_user(Role::User);
        let req = create_request(Some(UserId::new()));

        let err = create_booking(user, State(registry), Json(req))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ForbiddenOperation));
    }

    #[tokio::test]
    async fn admin_can_create_for_another_user() {
        let admin = authorized_user(Role::Admin);
        let owner = User {
            user_id: UserId::new(),
            username: "bob".into(),
            email: "bob@example.com".into(),
            role: Role::User,
        };
        let fixture = booking_owned_by(&owner, Utc::now() + Duration::hours(2));
        let expected_id = fixture.booking_id;
        let owner_id = owner.user_id;

        let mut mock = MockBookingRepository::new();
        mock.expect_create()
            .withf(move |event| event.booked_by == owner_id)
            .returning(move |_| Ok(fixture.clone()));

        let req = create_request(Some(owner_id));
        let (status, Json(resp)) =
            create_booking(admin, State(TestRegistry::with_booking(mock)), Json(req))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resp.booking_id, expected_id);
    }

    #[tokio::test]
    async fn create_rejects_inverted_time_window() {
        let registry = TestRegistry::with_booking(MockBookingRepository::new());
        let user = authorized_user(Role::User);
        let mut req = create_request(None);
        std::mem::swap(&mut req.start_time, &mut req.end_time);

        let err = create_booking(user, State(registry), Json(req))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn listing_all_bookings_requires_admin() {
        let registry = TestRegistry::with_booking(MockBookingRepository::new());

        let err = show_booking_list(authorized_user(Role::User), State(registry))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ForbiddenOperation));
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden() {
        let stranger = authorized_user(Role::User);
        let owner = User {
            user_id: UserId::new(),
            username: "bob".into(),
            email: "bob@example.com".into(),
            role: Role::User,
        };
        let fixture = booking_owned_by(&owner, Utc::now() + Duration::hours(2));
        let booking_id = fixture.booking_id;

        let mut mock = MockBookingRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(fixture.clone())));

        let req = UpdateBookingRequest {
            start_time: Utc::now() + Duration::hours(3),
            end_time: Utc::now() + Duration::hours(4),
            description: None,
        };
        let err = update_booking(
            stranger,
            Path(booking_id),
            State(TestRegistry::with_booking(mock)),
            Json(req),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ForbiddenOperation));
    }

    #[tokio::test]
    async fn owner_cannot_cancel_started_booking() {
        let user = authorized_user(Role::User);
        let fixture = booking_owned_by(&user.user, Utc::now() - Duration::hours(1));
        let booking_id = fixture.booking_id;

        let mut mock = MockBookingRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(fixture.clone())));
        // no delete expectation: reaching the store would fail the test

        let err = delete_booking(
            user,
            Path(booking_id),
            State(TestRegistry::with_booking(mock)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn owner_can_cancel_upcoming_booking() {
        let user = authorized_user(Role::User);
        let fixture = booking_owned_by(&user.user, Utc::now() + Duration::hours(1));
        let booking_id = fixture.booking_id;

        let mut mock = MockBookingRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(fixture.clone())));
        mock.expect_delete().returning(|_| Ok(()));

        let Json(resp) = delete_booking(
            user,
            Path(booking_id),
            State(TestRegistry::with_booking(mock)),
        )
        .await
        .unwrap();
        assert_eq!(resp.booking_id, booking_id);
    }

    #[tokio::test]
    async fn admin_can_cancel_past_booking() {
        let admin = authorized_user(Role::Admin);
        let owner = User {
            user_id: UserId::new(),
            username: "bob".into(),
            email: "bob@example.com".into(),
            role: Role::User,
        };
        let fixture = booking_owned_by(&owner, Utc::now() - Duration::days(1));
        let booking_id = fixture.booking_id;

        let mut mock = MockBookingRepository::new();
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(fixture.clone())));
        mock.expect_delete().returning(|_| Ok(()));

        let result = delete_booking(
            admin,
            Path(booking_id),
            State(TestRegistry::with_booking(mock)),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn cancelling_unknown_booking_is_not_found() {
        let user = authorized_user(Role::User);
        let mut mock = MockBookingRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));

        let err = delete_booking(
            user,
            Path(BookingId::new()),
            State(TestRegistry::with_booking(mock)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
    }
}
