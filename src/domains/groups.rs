use crate::core::ids;
use crate::core::models::Group;
use crate::errors::RosterError;
use crate::store::Datastore;

/// Partial update for a group; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub score: Option<f64>,
}

pub async fn list_groups(store: &Datastore) -> Vec<Group> {
    store.read().await.groups
}

pub async fn find_group(store: &Datastore, id: &str) -> Option<Group> {
    store.read().await.groups.into_iter().find(|g| g.id == id)
}

/// # Errors
///
/// Returns `ValidationError` for an empty name or a non-finite score.
pub async fn create_group(store: &Datastore, name: &str, score: f64) -> Result<Group, RosterError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RosterError::ValidationError(
            "group name must be a non-empty string".to_string(),
        ));
    }
    if !score.is_finite() {
        return Err(RosterError::ValidationError(
            "score must be a valid number".to_string(),
        ));
    }

    store
        .update(|doc| {
            let group = Group {
                id: ids::random_id(16),
                name: name.to_string(),
                score,
                members: Vec::new(),
            };
            doc.groups.push(group.clone());
            Ok(group)
        })
        .await
}

/// # Errors
///
/// Returns `NotFound` when the group does not exist, or `ValidationError`
/// for an empty replacement name or a non-finite score.
pub async fn update_group(
    store: &Datastore,
    id: &str,
    patch: GroupPatch,
) -> Result<Group, RosterError> {
    let name = match patch.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(RosterError::ValidationError(
                    "group name must be a non-empty string".to_string(),
                ));
            }
            Some(name)
        }
        None => None,
    };
    if let Some(score) = patch.score {
        if !score.is_finite() {
            return Err(RosterError::ValidationError(
                "score must be a valid number".to_string(),
            ));
        }
    }

    store
        .update(move |doc| {
            let group = doc
                .groups
                .iter_mut()
                .find(|g| g.id == id)
                .ok_or_else(|| RosterError::NotFound(format!("group {id}")))?;
            if let Some(name) = name {
                group.name = name;
            }
            if let Some(score) = patch.score {
                group.score = score;
            }
            Ok(group.clone())
        })
        .await
}

/// Add a student id to the group's member list; adding an id that is already
/// present is a no-op.
///
/// # Errors
///
/// Returns `NotFound` when the group does not exist.
pub async fn add_member(
    store: &Datastore,
    id: &str,
    member_id: &str,
) -> Result<Group, RosterError> {
    store
        .update(move |doc| {
            let group = doc
                .groups
                .iter_mut()
                .find(|g| g.id == id)
                .ok_or_else(|| RosterError::NotFound(format!("group {id}")))?;
            if !group.members.iter().any(|m| m == member_id) {
                group.members.push(member_id.to_string());
            }
            Ok(group.clone())
        })
        .await
}

/// # Errors
///
/// Returns `NotFound` when the group does not exist.
pub async fn remove_member(
    store: &Datastore,
    id: &str,
    member_id: &str,
) -> Result<Group, RosterError> {
    store
        .update(move |doc| {
            let group = doc
                .groups
                .iter_mut()
                .find(|g| g.id == id)
                .ok_or_else(|| RosterError::NotFound(format!("group {id}")))?;
            group.members.retain(|m| m != member_id);
            Ok(group.clone())
        })
        .await
}

/// # Errors
///
/// Returns `NotFound` when the group does not exist.
pub async fn delete_group(store: &Datastore, id: &str) -> Result<(), RosterError> {
    store
        .update(move |doc| {
            let before = doc.groups.len();
            doc.groups.retain(|g| g.id != id);
            if doc.groups.len() == before {
                return Err(RosterError::NotFound(format!("group {id}")));
            }
            Ok(())
        })
        .await
}
