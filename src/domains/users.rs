use chrono::Utc;

use crate::core::ids;
use crate::core::models::User;
use crate::errors::RosterError;
use crate::store::Datastore;

/// Input for `create_user`. The password hash is produced by the
/// authentication layer; this crate never sees the plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
}

/// Create an account after email verification succeeded. The account starts
/// inactive; an administrator flips it with [`set_active`].
///
/// # Errors
///
/// Returns `Conflict` when the phone number or email is already registered,
/// or `PersistError` when the document cannot be written.
pub async fn create_user(store: &Datastore, new: NewUser) -> Result<User, RosterError> {
    store
        .update(|doc| {
            if doc
                .users
                .iter()
                .any(|u| u.phone == new.phone || u.email == new.email)
            {
                return Err(RosterError::Conflict(
                    "phone or email already in use".to_string(),
                ));
            }

            // Numeric ids: max existing + 1, starting at 1.
            let id = doc.users.iter().map(|u| u.id).max().map_or(1, |m| m + 1);
            let user = User {
                id,
                first_name: new.first_name,
                last_name: new.last_name,
                phone: new.phone,
                email: new.email,
                password_hash: new.password_hash,
                is_verified: true,
                friend_code: ids::friend_code(),
                active: false,
                created_at: Utc::now().timestamp_millis(),
            };
            doc.users.push(user.clone());
            Ok(user)
        })
        .await
}

pub async fn list_users(store: &Datastore) -> Vec<User> {
    store.read().await.users
}

/// Login lookup; callers verify the password hash and the `active` flag.
pub async fn find_by_phone(store: &Datastore, phone: &str) -> Option<User> {
    store.read().await.users.into_iter().find(|u| u.phone == phone)
}

pub async fn find_by_id(store: &Datastore, id: u64) -> Option<User> {
    store.read().await.users.into_iter().find(|u| u.id == id)
}

/// # Errors
///
/// Returns `NotFound` when no user has the given id.
pub async fn set_active(store: &Datastore, id: u64, active: bool) -> Result<User, RosterError> {
    store
        .update(move |doc| {
            let user = doc
                .users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| RosterError::NotFound(format!("user {id}")))?;
            user.active = active;
            Ok(user.clone())
        })
        .await
}
