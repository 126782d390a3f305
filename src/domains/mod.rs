/// Roster domain operations over the datastore.
///
/// This module contains the application-level record logic the HTTP handlers
/// call into: user accounts, groups with member lists, and students enrolled
/// via QR scan. Cross-collection checks (a student's group must exist, a
/// QR identifier is registered once) live here, not in the datastore.
pub mod groups;
pub mod students;
pub mod users;
