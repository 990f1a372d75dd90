use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a procedure reads or changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Mutation => f.write_str("mutation"),
        }
    }
}

/// Every remote procedure the user API exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Procedure {
    GetUsers,
    GetUserById,
    CreateUser,
    DeleteUser,
}

impl Procedure {
    pub const ALL: [Procedure; 4] = [
        Self::GetUsers,
        Self::GetUserById,
        Self::CreateUser,
        Self::DeleteUser,
    ];

    /// Wire name, as it appears in the RPC path.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetUsers => "getUsers",
            Self::GetUserById => "getUserById",
            Self::CreateUser => "createUser",
            Self::DeleteUser => "deleteUser",
        }
    }

    pub fn kind(&self) -> ProcedureKind {
        match self {
            Self::GetUsers | Self::GetUserById => ProcedureKind::Query,
            Self::CreateUser | Self::DeleteUser => ProcedureKind::Mutation,
        }
    }

    /// Short description of the accepted input.
    pub fn input_shape(&self) -> &'static str {
        match self {
            Self::GetUsers => "none",
            Self::GetUserById | Self::DeleteUser => "string (id)",
            Self::CreateUser => "{name, email}",
        }
    }

    pub fn output_shape(&self) -> &'static str {
        match self {
            Self::GetUsers => "list of User",
            _ => "User",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_wire_name() {
        for p in Procedure::ALL {
            assert_eq!(Procedure::from_name(p.name()), Some(p));
        }
        assert_eq!(Procedure::from_name("updateUser"), None);
        assert_eq!(Procedure::from_name("getusers"), None);
    }

    #[test]
    fn kinds() {
        assert_eq!(Procedure::GetUsers.kind(), ProcedureKind::Query);
        assert_eq!(Procedure::GetUserById.kind(), ProcedureKind::Query);
        assert_eq!(Procedure::CreateUser.kind(), ProcedureKind::Mutation);
        assert_eq!(Procedure::DeleteUser.kind(), ProcedureKind::Mutation);
        assert_eq!(ProcedureKind::Mutation.to_string(), "mutation");
    }
}
