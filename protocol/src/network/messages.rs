//! # Websocket API Messages
//!
//! Request and response shapes for the ledger's websocket API. Only the
//! `submit` command is modelled; responses are parsed just far enough to
//! route them by `id` and pull out the engine result.
//!
//! ```text
//! -> {"id":1,"command":"submit","tx_blob":"1200..."}
//! <- {"id":1,"type":"response","status":"success",
//!     "result":{"engine_result":"tesSUCCESS","engine_result_code":0,
//!               "engine_result_message":"The transaction was applied.", ...}}
//! ```

use serde::{Deserialize, Serialize};

/// A `submit` command carrying a signed blob.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest<'a> {
    pub id: u64,
    pub command: &'static str,
    /// Upper-case hex of the signed transaction.
    pub tx_blob: &'a str,
}

impl<'a> SubmitRequest<'a> {
    pub fn new(id: u64, tx_blob: &'a str) -> Self {
        Self {
            id,
            command: "submit",
            tx_blob,
        }
    }
}

/// Any message the server sends.
///
/// Responses to our requests carry our `id`; unsolicited stream messages
/// (ledger closes and the like) don't and are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub result: Option<serde_json::Value>,

    /// Error token for failed requests, e.g. `invalidParams`.
    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub error_message: Option<String>,
}

impl ServerMessage {
    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.status.as_deref() == Some("error")
    }
}

/// The transaction engine's preliminary verdict on a submitted blob.
///
/// `engine_result` is the ledger's result token (`tesSUCCESS`,
/// `tecUNFUNDED_PAYMENT`, `temBAD_AMOUNT`, ...). A non-success result is
/// still a successful submission: the server answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub engine_result: String,
    pub engine_result_code: i64,
    pub engine_result_message: String,
}

impl SubmitResult {
    /// `tesSUCCESS`: applied to the open ledger.
    pub fn is_success(&self) -> bool {
        self.engine_result == "tesSUCCESS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let json = serde_json::to_value(SubmitRequest::new(7, "ABCD")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "command": "submit", "tx_blob": "ABCD"})
        );
    }

    #[test]
    fn success_response_parses() {
        let raw = r#"{"id":1,"type":"response","status":"success","result":{
            "engine_result":"tesSUCCESS","engine_result_code":0,
            "engine_result_message":"The transaction was applied.","tx_blob":"12"}}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.id, Some(1));
        assert!(!msg.is_error());

        let result: SubmitResult = serde_json::from_value(msg.result.unwrap()).unwrap();
        assert!(result.is_success());
        assert_eq!(result.engine_result_code, 0);
    }

    #[test]
    fn error_response_parses() {
        let raw = r#"{"id":2,"status":"error","type":"response","error":"invalidTransaction",
            "error_message":"fails local checks"}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        assert!(msg.is_error());
        assert_eq!(msg.error.as_deref(), Some("invalidTransaction"));
    }

    #[test]
    fn stream_messages_have_no_id() {
        let raw = r#"{"type":"ledgerClosed","ledger_index":100}"#;
        let msg: ServerMessage = serde_json::from_str(raw).unwrap();
        assert!(msg.id.is_none());
        assert_eq!(msg.kind.as_deref(), Some("ledgerClosed"));
    }

    #[test]
    fn rejection_is_not_success() {
        let result = SubmitResult {
            engine_result: "tecUNFUNDED_PAYMENT".to_string(),
            engine_result_code: 104,
            engine_result_message: "Insufficient XRP balance to send.".to_string(),
        };
        assert!(!result.is_success());
    }
}
