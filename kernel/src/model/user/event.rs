use derive_new::new;

#[derive(new, Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
}
