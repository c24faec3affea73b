//! Access credential and its cache-file codec

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone};

use crate::constants::{CACHE_FIELD_SEPARATOR, CACHE_TIMESTAMP_FORMAT};
use crate::errors::{NotifyError, Result};

/// Bearer token granting send permission, with its absolute expiry.
///
/// A credential is never mutated; renewal replaces it wholesale.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: DateTime<Local>,
}

impl Credential {
    /// Create a credential with an explicit expiry instant.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: DateTime<Local>) -> Self {
        Self { token: token.into(), expires_at }
    }

    /// Create a credential issued at `issued_at` with a server-supplied TTL.
    ///
    /// # Errors
    /// Returns `NotifyError::Decode` if the TTL does not fit a timestamp.
    pub fn issued(
        token: impl Into<String>,
        issued_at: DateTime<Local>,
        ttl_seconds: i64,
    ) -> Result<Self> {
        let expires_at = TimeDelta::try_seconds(ttl_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                NotifyError::Decode(format!("expires_in out of range: {ttl_seconds}"))
            })?;

        Ok(Self::new(token, expires_at))
    }

    /// The opaque token string.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Absolute expiry instant.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Local> {
        self.expires_at
    }

    /// `true` once `now` is strictly after the expiry instant.
    ///
    /// The expiry instant itself still counts as valid.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Local>) -> bool {
        now > self.expires_at
    }

    /// Whole seconds until expiry (negative once expired).
    #[must_use]
    pub fn seconds_until_expiry_at(&self, now: DateTime<Local>) -> i64 {
        (self.expires_at - now).num_seconds()
    }

    /// Encode as a cache-file line: `token,YYYY-MM-DD HH:MM:SS` in local time.
    #[must_use]
    pub fn to_cache_line(&self) -> String {
        format!(
            "{}{}{}",
            self.token,
            CACHE_FIELD_SEPARATOR,
            self.expires_at.format(CACHE_TIMESTAMP_FORMAT)
        )
    }

    /// Decode a cache-file line produced by [`Credential::to_cache_line`].
    ///
    /// Surrounding whitespace (including a trailing newline) is ignored.
    ///
    /// # Errors
    /// Returns `NotifyError::Decode` if the line is not two fields, the token
    /// is empty, or the timestamp does not parse as a local time.
    pub fn from_cache_line(line: &str) -> Result<Self> {
        let line = line.trim();
        let (token, timestamp) = line.rsplit_once(CACHE_FIELD_SEPARATOR).ok_or_else(|| {
            NotifyError::Decode("credential cache line has no field separator".to_string())
        })?;

        let token = token.trim();
        if token.is_empty() {
            return Err(NotifyError::Decode("credential cache line has an empty token".into()));
        }

        let naive = NaiveDateTime::parse_from_str(timestamp.trim(), CACHE_TIMESTAMP_FORMAT)
            .map_err(|e| NotifyError::Decode(format!("invalid cache timestamp: {e}")))?;

        // Ambiguous local times (DST fold) resolve to the earlier instant.
        let expires_at = Local.from_local_datetime(&naive).earliest().ok_or_else(|| {
            NotifyError::Decode(format!("cache timestamp does not exist locally: {naive}"))
        })?;

        Ok(Self::new(token, expires_at))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Local> {
        let naive = NaiveDateTime::parse_from_str(s, CACHE_TIMESTAMP_FORMAT).unwrap();
        Local.from_local_datetime(&naive).earliest().unwrap()
    }

    #[test]
    fn issued_derives_expiry_from_ttl() {
        let issued_at = at("2026-03-01 10:00:00");
        let credential = Credential::issued("tok", issued_at, 7200).unwrap();

        assert_eq!(credential.expires_at(), at("2026-03-01 12:00:00"));
        assert_eq!(credential.token(), "tok");
    }

    #[test]
    fn issued_rejects_unrepresentable_ttl() {
        let result = Credential::issued("tok", at("2026-03-01 10:00:00"), i64::MAX);
        assert!(matches!(result, Err(NotifyError::Decode(_))));
    }

    #[test]
    fn expiry_boundary_is_not_expired() {
        let expires_at = at("2026-03-01 12:00:00");
        let credential = Credential::new("tok", expires_at);

        assert!(!credential.is_expired_at(expires_at - TimeDelta::seconds(1)));
        assert!(!credential.is_expired_at(expires_at));
        assert!(credential.is_expired_at(expires_at + TimeDelta::milliseconds(1)));
    }

    #[test]
    fn seconds_until_expiry_goes_negative() {
        let credential = Credential::new("tok", at("2026-03-01 12:00:00"));

        assert_eq!(credential.seconds_until_expiry_at(at("2026-03-01 11:59:00")), 60);
        assert_eq!(credential.seconds_until_expiry_at(at("2026-03-01 12:00:30")), -30);
    }

    #[test]
    fn cache_line_format() {
        let credential = Credential::new("abc-123", at("2026-03-01 12:34:56"));
        assert_eq!(credential.to_cache_line(), "abc-123,2026-03-01 12:34:56");
    }

    #[test]
    fn cache_line_round_trip_keeps_second_precision() {
        let original = Credential::new(
            "abc-123",
            at("2026-03-01 12:34:56") + TimeDelta::milliseconds(789),
        );

        let reloaded = Credential::from_cache_line(&original.to_cache_line()).unwrap();

        assert_eq!(reloaded.token(), original.token());
        assert_eq!(reloaded.expires_at().timestamp(), original.expires_at().timestamp());
    }

    #[test]
    fn cache_line_tolerates_trailing_newline() {
        let credential = Credential::from_cache_line("tok,2026-03-01 12:34:56\n").unwrap();
        assert_eq!(credential.token(), "tok");
        assert_eq!(credential.expires_at(), at("2026-03-01 12:34:56"));
    }

    #[test]
    fn malformed_cache_lines_are_decode_errors() {
        for line in ["", "no-separator", ",2026-03-01 12:34:56", "tok,yesterday", "tok,"] {
            assert!(
                matches!(Credential::from_cache_line(line), Err(NotifyError::Decode(_))),
                "expected decode error for {line:?}"
            );
        }
    }

    #[test]
    fn debug_redacts_token() {
        let credential = Credential::new("super-secret", at("2026-03-01 12:34:56"));
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("redacted"));
    }
}
