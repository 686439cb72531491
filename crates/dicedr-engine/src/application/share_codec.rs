//! Share tokens: URL-safe, reversible encoding of a method and its state.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use dicedr_core::state::MethodState;
use serde::{Deserialize, Serialize};

/// What a share token carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    /// The method to open.
    pub method_id: String,
    /// The state to open it with.
    pub method_state: MethodState,
}

/// Encoder/decoder for share tokens (base64url over JSON, unpadded).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareCodec;

impl ShareCodec {
    /// Encodes `payload` into a token.
    ///
    /// # Panics
    ///
    /// Never in practice: the payload is plain JSON data with string keys.
    #[must_use]
    pub fn encode(payload: &SharePayload) -> String {
        // Serialization of a string-keyed JSON structure is infallible.
        let json = serde_json::to_vec(payload).expect("share payload serializes to JSON");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decodes a token. Returns `None` for anything that is not a valid token;
    /// callers keep their current state in that case.
    ///
    /// Padded tokens and the standard base64 alphabet are accepted as well.
    #[must_use]
    pub fn decode(token: &str) -> Option<SharePayload> {
        let trimmed = token.trim().trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(trimmed)
            .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
            .ok()?;
        let payload: SharePayload = serde_json::from_slice(&bytes).ok()?;
        (!payload.method_id.is_empty()).then_some(payload)
    }

    /// The method-scoped URL fragment carrying `token`.
    #[must_use]
    pub fn fragment(method_id: &str, token: &str) -> String {
        format!("method/{method_id}?state={token}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(method_id: &str, inputs: serde_json::Value) -> SharePayload {
        SharePayload {
            method_id: method_id.to_owned(),
            method_state: MethodState::new(inputs, json!({"noRepeat": true, "count": 2})),
        }
    }

    #[test]
    fn test_decode_inverts_encode() {
        let samples = [
            payload("wheel", json!(["Pizza", "Sushi", "Çay", "🍣 & <tags>?"])),
            payload("dice", json!({"preset": "custom", "min": -999, "max": 999})),
            payload("coin", json!({"a": "Yazı", "b": "Tura"})),
        ];

        for sample in samples {
            assert_eq!(ShareCodec::decode(&ShareCodec::encode(&sample)), Some(sample));
        }
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = ShareCodec::encode(&payload("wheel", json!(["??>>", "~~~", "ÿÿÿ"])));

        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_standard_padded_tokens_are_accepted() {
        let sample = payload("slot", json!(["a", "b"]));
        let json = serde_json::to_vec(&sample).unwrap();
        let legacy = base64::engine::general_purpose::STANDARD.encode(json);

        assert_eq!(ShareCodec::decode(&legacy), Some(sample));
    }

    #[test]
    fn test_malformed_tokens_decode_to_none() {
        let not_json = URL_SAFE_NO_PAD.encode("not json");
        let wrong_shape = URL_SAFE_NO_PAD.encode(r#"{"methodId": "dice", "methodState": 3}"#);
        let empty_id = URL_SAFE_NO_PAD.encode(r#"{"methodId": "", "methodState": {}}"#);

        for token in ["", "%%%", "a", not_json.as_str(), wrong_shape.as_str(), empty_id.as_str()] {
            assert_eq!(ShareCodec::decode(token), None, "token {token:?}");
        }
    }

    #[test]
    fn test_fragment_is_method_scoped() {
        assert_eq!(ShareCodec::fragment("dice", "abc"), "method/dice?state=abc");
    }
}
