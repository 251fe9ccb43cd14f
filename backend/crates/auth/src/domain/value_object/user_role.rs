use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Closed set of user types issued by the backend.
///
/// Wire codes are the backend's `user_type` strings and are matched
/// exactly; there is no case folding and no fallback variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "BLOOD_BANK")]
    BloodBank,
    #[serde(rename = "STAFF")]
    Staff,
    #[serde(rename = "DONOR")]
    Donor,
    #[serde(rename = "CONSUMERS")]
    Consumer,
    #[serde(rename = "HOSPITAL")]
    Hospital,
    #[serde(rename = "CUSTOMER")]
    Customer,
}

impl UserRole {
    pub const ALL: [UserRole; 7] = [
        UserRole::Admin,
        UserRole::BloodBank,
        UserRole::Staff,
        UserRole::Donor,
        UserRole::Consumer,
        UserRole::Hospital,
        UserRole::Customer,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Admin => "ADMIN",
            BloodBank => "BLOOD_BANK",
            Staff => "STAFF",
            Donor => "DONOR",
            Consumer => "CONSUMERS",
            Hospital => "HOSPITAL",
            Customer => "CUSTOMER",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, AuthError> {
        use UserRole::*;
        match code {
            "ADMIN" => Ok(Admin),
            "BLOOD_BANK" => Ok(BloodBank),
            "STAFF" => Ok(Staff),
            "DONOR" => Ok(Donor),
            "CONSUMERS" => Ok(Consumer),
            "HOSPITAL" => Ok(Hospital),
            "CUSTOMER" => Ok(Customer),
            _ => Err(AuthError::InvalidRole(code.to_string())),
        }
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
