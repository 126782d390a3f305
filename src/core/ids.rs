use uuid::Uuid;

/// Random alphanumeric record id of the given length (at most 32 characters).
/// Group ids use 16 characters, student ids 8; collision probability is
/// negligible at roster scale.
#[must_use]
pub fn random_id(len: usize) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..len.min(hex.len())].to_string()
}

/// 8-character uppercase code shown to users for adding friends.
#[must_use]
pub fn friend_code() -> String {
    random_id(8).to_uppercase()
}
