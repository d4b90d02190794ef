use crate::model::{id::UserId, role::Role};

pub mod event;

/// Identity summary attached to every authenticated request and to
/// each booking as its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
}
