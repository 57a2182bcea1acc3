//! Rendering a signed payment to stdout.
//!
//! | flags              | output                                   |
//! |--------------------|------------------------------------------|
//! | (none)             | `Hash: ..`, `Raw: ..`, then the JSON line |
//! | `--json`           | JSON line                                |
//! | `--binary`         | raw blob bytes, nothing else             |
//! | `--json --binary`  | JSON line, then raw bytes                |

use std::io::{self, Write};

use rtx_protocol::network::SubmitResult;
use rtx_protocol::transaction::SignedPayment;

/// Which renderings to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputMode {
    pub json: bool,
    pub binary: bool,
}

impl OutputMode {
    fn text(&self) -> bool {
        !self.json && !self.binary
    }

    fn json_line(&self) -> bool {
        self.json || !self.binary
    }
}

/// Writes `signed` to `out` according to `mode`.
pub fn write_signed<W: Write>(
    out: &mut W,
    signed: &SignedPayment,
    mode: OutputMode,
) -> io::Result<()> {
    if mode.text() {
        writeln!(out, "Hash: {}", signed.hash())?;
        writeln!(out, "Raw: {}", signed.blob_hex())?;
    }
    if mode.json_line() {
        serde_json::to_writer(&mut *out, signed)?;
        writeln!(out)?;
    }
    if mode.binary {
        out.write_all(signed.blob())?;
    }
    out.flush()
}

/// One line: `<engine_result>: <engine_result_message>`.
pub fn write_submit_result<W: Write>(out: &mut W, result: &SubmitResult) -> io::Result<()> {
    writeln!(
        out,
        "{}: {}",
        result.engine_result, result.engine_result_message
    )?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtx_protocol::crypto::derive_key;
    use rtx_protocol::transaction::{build_payment, sign_payment, PaymentFields, SigningParams};

    fn signed() -> SignedPayment {
        let key = derive_key("snoPBrXtMeMyMHUVTgbuqAfg1SUTb", 1).unwrap();
        let payment = build_payment(&PaymentFields {
            destination: "rrrrrrrrrrrrrrrrrrrrrhoLvTp".to_string(),
            amount: "1000000".to_string(),
            ..Default::default()
        })
        .unwrap();
        let params = SigningParams {
            sequence: 1,
            fee: 10,
            last_ledger_sequence: None,
        };
        sign_payment(payment, &key, &params).unwrap()
    }

    fn render(mode: OutputMode) -> Vec<u8> {
        let mut out = Vec::new();
        write_signed(&mut out, &signed(), mode).unwrap();
        out
    }

    #[test]
    fn default_prints_hash_raw_and_json() {
        let s = signed();
        let text = String::from_utf8(render(OutputMode::default())).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("Hash: {}", s.hash()));
        assert_eq!(lines[1], format!("Raw: {}", s.blob_hex()));
        assert!(lines[2].contains(r#""TransactionType":"Payment""#));
    }

    #[test]
    fn json_only() {
        let mode = OutputMode {
            json: true,
            binary: false,
        };
        let text = String::from_utf8(render(mode)).unwrap();
        assert_eq!(text.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["Sequence"], 1);
    }

    #[test]
    fn binary_is_exactly_the_blob() {
        let mode = OutputMode {
            json: false,
            binary: true,
        };
        assert_eq!(render(mode), signed().blob());
    }

    #[test]
    fn json_and_binary_is_json_then_bytes() {
        let mode = OutputMode {
            json: true,
            binary: true,
        };
        let out = render(mode);
        let blob = signed().blob().to_vec();
        assert!(out.ends_with(&blob));
        let json_part = &out[..out.len() - blob.len()];
        assert!(json_part.ends_with(b"\n"));
        serde_json::from_slice::<serde_json::Value>(json_part).unwrap();
    }

    #[test]
    fn submit_result_line() {
        let result = SubmitResult {
            engine_result: "tecNO_DST_INSUF_XRP".to_string(),
            engine_result_code: 125,
            engine_result_message: "Destination does not exist.".to_string(),
        };
        let mut out = Vec::new();
        write_submit_result(&mut out, &result).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "tecNO_DST_INSUF_XRP: Destination does not exist.\n"
        );
    }
}
