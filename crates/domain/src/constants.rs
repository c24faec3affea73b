//! Service constants
//!
//! Endpoint paths, wire sentinels and defaults shared by every crate in the
//! workspace.

// Endpoints
pub const DEFAULT_BASE_URL: &str = "https://qyapi.weixin.qq.com";
pub const TOKEN_PATH: &str = "/cgi-bin/gettoken";
pub const MESSAGE_SEND_PATH: &str = "/cgi-bin/message/send";

// Wire sentinels
pub const BROADCAST_RECIPIENT: &str = "@all";
pub const MSGTYPE_TEXTCARD: &str = "textcard";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const ERRCODE_OK: i64 = 0;

/// Invalid access token.
pub const ERRCODE_INVALID_TOKEN: i64 = 40014;
/// Access token expired.
pub const ERRCODE_TOKEN_EXPIRED: i64 = 42001;
pub const DEFAULT_AUTH_ERROR_CODES: [i64; 2] = [ERRCODE_INVALID_TOKEN, ERRCODE_TOKEN_EXPIRED];

// Credential cache file
pub const CACHE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const CACHE_FIELD_SEPARATOR: char = ',';

// Transport
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
