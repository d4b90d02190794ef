use derive_new::new;

#[derive(new, Debug)]
pub struct CreateRoom {
    pub name: String,
    pub capacity: i32,
    pub description: Option<String>,
}
