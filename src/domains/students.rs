use chrono::{SecondsFormat, Utc};

use crate::core::ids;
use crate::core::models::Student;
use crate::errors::RosterError;
use crate::store::Datastore;

/// Input for `create_student`, typically filled from a QR scan plus the
/// enrollment form.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub qr_identifier: String,
    pub group_id: String,
    pub gender: String,
    pub first_name: String,
    pub last_name: String,
}

/// Partial update for a student; `None` fields are left untouched. `id` and
/// `created_at` can never change.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub qr_identifier: Option<String>,
    pub group_id: Option<String>,
    pub gender: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn list_students(store: &Datastore) -> Vec<Student> {
    store.read().await.students
}

pub async fn find_student(store: &Datastore, id: &str) -> Option<Student> {
    store.read().await.students.into_iter().find(|s| s.id == id)
}

pub async fn find_by_group(store: &Datastore, group_id: &str) -> Vec<Student> {
    store
        .read()
        .await
        .students
        .into_iter()
        .filter(|s| s.group_id == group_id)
        .collect()
}

/// Scan lookup: resolve a QR payload to the student it was registered for.
pub async fn find_by_qr(store: &Datastore, qr_identifier: &str) -> Option<Student> {
    store
        .read()
        .await
        .students
        .into_iter()
        .find(|s| s.qr_identifier == qr_identifier)
}

/// Enroll a student and add them to their group's member list in one
/// datastore update.
///
/// # Errors
///
/// Returns `Conflict` when the QR identifier is already registered (across
/// all groups), or `NotFound` when the referenced group does not exist.
pub async fn create_student(store: &Datastore, new: NewStudent) -> Result<Student, RosterError> {
    store
        .update(|doc| {
            if doc
                .students
                .iter()
                .any(|s| s.qr_identifier == new.qr_identifier)
            {
                return Err(RosterError::Conflict(
                    "QR identifier already registered".to_string(),
                ));
            }
            let group = doc
                .groups
                .iter_mut()
                .find(|g| g.id == new.group_id)
                .ok_or_else(|| RosterError::NotFound(format!("group {}", new.group_id)))?;

            let student = Student {
                id: ids::random_id(8),
                qr_identifier: new.qr_identifier,
                group_id: new.group_id,
                gender: new.gender,
                first_name: new.first_name,
                last_name: new.last_name,
                created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            };
            group.members.push(student.id.clone());
            doc.students.push(student.clone());
            Ok(student)
        })
        .await
}

/// Update a student; a changed `group_id` moves the membership entry from the
/// old group to the new one.
///
/// # Errors
///
/// Returns `NotFound` when the student (or a new target group) does not
/// exist, or `Conflict` when the new QR identifier belongs to another
/// student.
pub async fn update_student(
    store: &Datastore,
    id: &str,
    patch: StudentPatch,
) -> Result<Student, RosterError> {
    store
        .update(move |doc| {
            let idx = doc
                .students
                .iter()
                .position(|s| s.id == id)
                .ok_or_else(|| RosterError::NotFound(format!("student {id}")))?;

            if let Some(qr) = &patch.qr_identifier {
                let duplicate = doc
                    .students
                    .iter()
                    .any(|s| s.qr_identifier == *qr && s.id != id);
                if duplicate {
                    return Err(RosterError::Conflict(
                        "QR identifier already registered".to_string(),
                    ));
                }
            }

            let old_group_id = doc.students[idx].group_id.clone();
            if let Some(new_group_id) = &patch.group_id {
                if *new_group_id != old_group_id {
                    if !doc.groups.iter().any(|g| g.id == *new_group_id) {
                        return Err(RosterError::NotFound(format!("group {new_group_id}")));
                    }
                    for group in &mut doc.groups {
                        if group.id == old_group_id {
                            group.members.retain(|m| m != id);
                        } else if group.id == *new_group_id && !group.members.iter().any(|m| m == id)
                        {
                            group.members.push(id.to_string());
                        }
                    }
                }
            }

            let student = &mut doc.students[idx];
            if let Some(qr) = patch.qr_identifier {
                student.qr_identifier = qr;
            }
            if let Some(group_id) = patch.group_id {
                student.group_id = group_id;
            }
            if let Some(gender) = patch.gender {
                student.gender = gender;
            }
            if let Some(first_name) = patch.first_name {
                student.first_name = first_name;
            }
            if let Some(last_name) = patch.last_name {
                student.last_name = last_name;
            }
            Ok(student.clone())
        })
        .await
}

/// Delete a student and drop their id from every group member list.
///
/// # Errors
///
/// Returns `NotFound` when no student has the given id.
pub async fn delete_student(store: &Datastore, id: &str) -> Result<(), RosterError> {
    store
        .update(move |doc| {
            let before = doc.students.len();
            doc.students.retain(|s| s.id != id);
            if doc.students.len() == before {
                return Err(RosterError::NotFound(format!("student {id}")));
            }
            for group in &mut doc.groups {
                group.members.retain(|m| m != id);
            }
            Ok(())
        })
        .await
}
