/// Role identifier used for RBAC.
///
/// The role set is closed: role ids are persisted as small integers, but they
/// are not dynamic data. Anything outside this set is treated as "no role"
/// and flows through the deny path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    SubAdmin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::SubAdmin];

    /// Stable integer id as stored in the `role` table.
    pub fn id(&self) -> i16 {
        match self {
            Role::Admin => 1,
            Role::SubAdmin => 2,
        }
    }

    /// Map a stored role id back to a role; unknown ids are `None`, never an
    /// error or a panic.
    pub fn from_id(id: i16) -> Option<Role> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::SubAdmin),
            _ => None,
        }
    }

    /// Display label for API responses.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::SubAdmin => "SUB ADMIN",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}
