use crate::{
    extractor::{AuthorizedUser, Json},
    model::booking::BookingsResponse,
};
use axum::extract::{Path, State};
use chrono::Utc;
use kernel::model::id::UserId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

/// Upcoming bookings of one user, earliest first. Users may only look
/// at their own; admins may look at anyone's.
pub async fn show_user_bookings(
    user: AuthorizedUser,
    Path(user_id): Path<UserId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    if !user.is_admin() && user.id() != user_id {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .booking_repository()
        .find_upcoming_by_user_id(user_id, Utc::now())
        .await
        .map(BookingsResponse::from)
        .map(Json)
}
