use std::fmt;

use platform::crypto::random_token;

/// Random bytes behind each id.
const ID_BYTES: usize = 32;
/// URL-safe base64 length of `ID_BYTES` without padding.
const ID_LEN: usize = 43;

/// Opaque id carried in the session cookie. One per browser client.
///
/// Only server-generated ids are ever registered; `parse` checks the shape
/// of a cookie value and nothing more.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(random_token(ID_BYTES))
    }

    pub fn parse(value: &str) -> Option<Self> {
        let well_formed = value.len() == ID_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        well_formed.then(|| Self(value.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(***)")
    }
}
