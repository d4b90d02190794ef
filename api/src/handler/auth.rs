use crate::{
    extractor::{AuthorizedUser, Json, TOKEN_COOKIE_NAME},
    model::{
        auth::{AccessTokenResponse, LoginRequest},
        user::{CreateUserRequest, UserResponse},
    },
};
use axum::{extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use garde::Validate;
use kernel::model::auth::event::CreateToken;
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn register_user(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    req.validate(&())?;

    let user = registry.user_repository().create(req.into()).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(registry): State<AppRegistry>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<AccessTokenResponse>)> {
    req.validate(&())?;

    let user_id = registry
        .auth_repository()
        .verify_user(&req.username, &req.password)
        .await?;
    let access_token = registry
        .auth_repository()
        .create_token(CreateToken::new(user_id))
        .await?;

    let cookie = Cookie::build((TOKEN_COOKIE_NAME, access_token.0.clone()))
        .path("/")
        .http_only(true)
        .build();

    Ok((
        jar.add(cookie),
        Json(AccessTokenResponse {
            user_id,
            access_token: access_token.0,
        }),
    ))
}

pub async fn logout(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    jar: CookieJar,
) -> AppResult<(CookieJar, StatusCode)> {
    registry
        .auth_repository()
        .delete_token(user.access_token)
        .await?;

    let removal = Cookie::build(TOKEN_COOKIE_NAME).path("/").build();
    Ok((jar.remove(removal), StatusCode::NO_CONTENT))
}

pub async fn me(user: AuthorizedUser) -> Json<UserResponse> {
    Json(user.user.into())
}
