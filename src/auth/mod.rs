//! Authorization header construction.

use std::io::Write;

use base64::prelude::BASE64_STANDARD;
use base64::write::EncoderWriter;
use http::HeaderValue;

use crate::error::EncodeError;

/// Build a `Basic` Authorization header value from credentials.
///
/// The value is marked sensitive so it is not echoed by `Debug` output.
pub fn basic_auth<U, P>(username: U, password: Option<P>) -> Result<HeaderValue, EncodeError>
where
    U: std::fmt::Display,
    P: std::fmt::Display,
{
    let mut buf = b"Basic ".to_vec();
    {
        let mut encoder = EncoderWriter::new(&mut buf, &BASE64_STANDARD);
        let _ = write!(encoder, "{username}:");
        if let Some(password) = password {
            let _ = write!(encoder, "{password}");
        }
    }
    let mut header = HeaderValue::from_bytes(&buf).map_err(|e| EncodeError::InvalidHeader {
        reason: e.to_string(),
    })?;
    header.set_sensitive(true);
    Ok(header)
}

/// Build a `Bearer` Authorization header value from a token.
pub fn bearer_auth<T: std::fmt::Display>(token: T) -> Result<HeaderValue, EncodeError> {
    let mut header =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| EncodeError::InvalidHeader {
            reason: e.to_string(),
        })?;
    header.set_sensitive(true);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_encodes_user_and_password() {
        let header = basic_auth("user", Some("password")).unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic dXNlcjpwYXNzd29yZA==");
        assert!(header.is_sensitive());
    }

    #[test]
    fn basic_auth_without_password_keeps_the_colon() {
        let header = basic_auth::<_, &str>("user", None).unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic dXNlcjo=");
    }

    #[test]
    fn bearer_auth_prefixes_the_token() {
        let header = bearer_auth("abc123").unwrap();
        assert_eq!(header.to_str().unwrap(), "Bearer abc123");
    }

    #[test]
    fn control_bytes_in_token_are_rejected() {
        assert!(bearer_auth("bad\ntoken").is_err());
    }
}
