use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use kernel::model::{auth::AccessToken, id::UserId, role::Role, user::User};
use registry::AppRegistry;
use serde::Serialize;
use shared::error::AppError;

/// Name of the cookie carrying the access token.
pub const TOKEN_COOKIE_NAME: &str = "token";

/// Verified identity of the requester, resolved from the `token`
/// cookie before any handler runs.
pub struct AuthorizedUser {
    pub access_token: AccessToken,
    pub user: User,
}

impl AuthorizedUser {
    pub fn id(&self) -> UserId {
        self.user.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}

/// JSON body extractor whose rejection renders through [`AppError`]:
/// malformed or incomplete request bodies come back as 400 in the same
/// error-body format as every other client error.
#[derive(Debug)]
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::UnprocessableEntity(rejection.body_text()))?;
        Ok(Self(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppRegistry> for AuthorizedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        registry: &AppRegistry,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, registry)
            .await
            .map_err(|_| AppError::UnauthenticatedError)?;
        let cookie = jar
            .get(TOKEN_COOKIE_NAME)
            .ok_or(AppError::UnauthenticatedError)?;
        let access_token = AccessToken(cookie.value().to_string());

        let user_id = registry
            .auth_repository()
            .fetch_user_id_from_token(&access_token)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        let user = registry
            .user_repository()
            .find_current_user(user_id)
            .await?
            .ok_or(AppError::UnauthenticatedError)?;

        Ok(Self { access_token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::booking::CreateBookingRequest;
    use axum::{body::Body, http::StatusCode};

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn body_missing_required_fields_is_rejected_with_bad_request() {
        let req = json_request(r#"{ "room_id": "3e9c1a9e-9e08-4e0b-8f53-1c6c1c8a0001" }"#);

        let err = Json::<CreateBookingRequest>::from_request(req, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_with_bad_request() {
        let req = json_request("not json");

        let err = Json::<CreateBookingRequest>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
