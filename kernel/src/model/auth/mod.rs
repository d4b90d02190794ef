pub mod event;

/// Opaque access token delivered to clients in the `token` cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);
