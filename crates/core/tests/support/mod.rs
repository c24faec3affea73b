//! Shared test helpers for `wecom-core` integration tests.
//!
//! These helpers provide scripted transports, an in-memory credential store
//! and a controllable clock so tests can focus on behaviour instead of
//! boilerplate.
#![allow(dead_code)]

pub mod clock;
pub mod store;
pub mod transport;

use chrono::{DateTime, Local, TimeZone};
use serde_json::json;
use wecom_domain::{ClientIdentity, TransportResponse};

pub use clock::MockClock;
pub use store::MemoryCredentialStore;
pub use transport::{MockTransport, RecordedRequest};

pub const CORP_ID: &str = "ww-test-corp";
pub const APP_SECRET: &str = "test-secret";
pub const AGENT_ID: i64 = 1000002;

pub fn identity() -> ClientIdentity {
    ClientIdentity::new(CORP_ID, APP_SECRET, AGENT_ID)
}

/// Fixed local instant used as "now" in most tests.
pub fn t0() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).single().unwrap()
}

/// Successful token endpoint answer.
pub fn token_ok(token: &str, expires_in: i64) -> TransportResponse {
    json_response(json!({
        "errcode": 0,
        "errmsg": "ok",
        "access_token": token,
        "expires_in": expires_in,
    }))
}

/// Token endpoint answer with a non-zero `errcode`.
pub fn token_error(code: i64, message: &str) -> TransportResponse {
    json_response(json!({ "errcode": code, "errmsg": message }))
}

/// Send endpoint answer.
pub fn send_result(code: i64, message: &str) -> TransportResponse {
    json_response(json!({ "errcode": code, "errmsg": message }))
}

pub fn json_response(body: serde_json::Value) -> TransportResponse {
    TransportResponse::new(200, body.to_string())
}
