use std::str::FromStr;

use crate::AuthError;

/// Grant type paired with the token request field that carries the code.
const GRANT_FIELDS: &[(GrantType, &str)] = &[
    (GrantType::ExchangeCode, "exchange_code"),
    (GrantType::AuthorizationCode, "code"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    AuthorizationCode,
    ExchangeCode,
}

impl GrantType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::ExchangeCode => "exchange_code",
        }
    }
}

impl FromStr for GrantType {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lookup(value).map(|(grant, _)| grant)
    }
}

/// Looks up the form field for `grant_type`, rejecting names outside the table.
pub fn code_field(grant_type: &str) -> Result<&'static str, AuthError> {
    lookup(grant_type).map(|(_, field)| field)
}

fn lookup(grant_type: &str) -> Result<(GrantType, &'static str), AuthError> {
    GRANT_FIELDS
        .iter()
        .copied()
        .find(|(grant, _)| grant.as_str() == grant_type)
        .ok_or_else(|| AuthError::UnsupportedGrantType(grant_type.to_string()))
}
