use std::fmt;

use super::user::AccountType;

/// Which of the two front ends is running. Each portal keeps its own session
/// under its own storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Portal {
    Employer,
    Talent,
}

impl Portal {
    pub fn account_type(self) -> AccountType {
        match self {
            Portal::Employer => AccountType::Employer,
            Portal::Talent => AccountType::Talent,
        }
    }

    /// Storage key of the bearer token
    pub fn token_key(self) -> &'static str {
        match self {
            Portal::Employer => "token",
            Portal::Talent => "authToken",
        }
    }

    /// Storage key of the serialized identity record
    pub fn identity_key(self) -> &'static str {
        match self {
            Portal::Employer => "user",
            Portal::Talent => "authUser",
        }
    }

    /// Base name of the portal's storage file
    pub fn storage_name(self) -> &'static str {
        match self {
            Portal::Employer => "employer",
            Portal::Talent => "talent",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Portal::Employer => "GoodJob Employer",
            Portal::Talent => "GoodJob Talent",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_name())
    }
}
