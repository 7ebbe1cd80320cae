//! Canned answers to CD-key requests.
//!
//! No key is actually checked: every challenge, activation, auth and
//! validation succeeds with fixed tokens. Each token is sent as a binary
//! whose content is itself an encoded binary value, which is what clients
//! expect to unwrap.

use gameservice_protocol::{Value, value};

use crate::message::{PlayerStatus, Request, RequestType};

const CHALLENGE_HASH: [u8; 20] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
    0x01, 0x02, 0x03, 0x04,
];
const ACTIVATION_ID: [u8; 11] = [0x33; 11];
const ACTIVATION_BUFFER: [u8; 11] = [0x44; 11];
const AUTH_ID: [u8; 15] = [0x55; 15];
const VALIDATION_BUFFER: [u8; 11] = [0x66; 11];

/// Builds the reply value list for `request`, or `None` if the request
/// gets no answer.
pub fn respond(request: &Request) -> Option<Vec<Value>> {
    let Some(kind) = request.kind() else {
        tracing::warn!(request_type = request.request_type, "unknown cd-key request");
        return None;
    };

    let results = match kind {
        RequestType::Challenge => vec![token(&CHALLENGE_HASH)],
        RequestType::Activation => vec![token(&ACTIVATION_ID), token(&ACTIVATION_BUFFER)],
        RequestType::Auth => vec![token(&AUTH_ID)],
        RequestType::Validation => vec![
            Value::String((PlayerStatus::Valid as u8).to_string()),
            token(&VALIDATION_BUFFER),
        ],
        RequestType::StillAlive => return None,
        RequestType::PlayerStatus | RequestType::DisconnectUser => {
            tracing::warn!(request_type = request.request_type, "unsupported cd-key request");
            return None;
        }
    };
    Some(request.success(results))
}

fn token(bytes: &[u8]) -> Value {
    Value::Binary(value::encode(&[Value::Binary(bytes.to_vec())]))
}
