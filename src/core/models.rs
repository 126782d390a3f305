use serde::{Deserialize, Serialize};

/// The entire on-disk state of the application. All three collections are
/// always present, even when empty; `store::Datastore` repairs missing or
/// malformed collections on read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub students: Vec<Student>,
}

/// An application account. `password_hash` is opaque to this crate; hashing
/// and verification live with the authentication layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub friend_code: String,
    pub active: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub score: f64,
    /// Student ids, no duplicates.
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    /// Text payload of the scanned QR code, unique across the collection.
    pub qr_identifier: String,
    pub group_id: String,
    pub gender: String,
    pub first_name: String,
    pub last_name: String,
    /// ISO-8601 timestamp, immutable after creation.
    pub created_at: String,
}
