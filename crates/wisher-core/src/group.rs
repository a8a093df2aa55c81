//! Groups and the memberships that tie users to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  id::{GroupId, GroupMembershipId, UserId},
  lifecycle::Lifecycle,
  user::User,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub id:          GroupId,
  pub owner:       UserId,
  pub name:        String,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub lifecycle:   Lifecycle,
}

/// Links a user to a group. Disabling the row revokes everything the user
/// could see through the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
  pub id:         GroupMembershipId,
  pub group:      GroupId,
  pub member:     UserId,
  pub created_at: DateTime<Utc>,
  pub lifecycle:  Lifecycle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGroup {
  pub name:        String,
  #[serde(default)]
  pub description: String,
}

/// A group as returned to one of its members.
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
  pub group:   Group,
  /// Always redacted.
  pub owner:   User,
  pub members: Vec<MemberView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
  pub membership: GroupMembership,
  /// Always redacted.
  pub user:       User,
}
