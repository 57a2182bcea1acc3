//! # Protocol Configuration & Constants
//!
//! Every magic number the signer depends on lives here: address version
//! bytes, hash prefixes, flag bits, defaults. If you're hardcoding one of
//! these somewhere else, move it here.
//!
//! These values are dictated by the ledger network, not by us. Changing any
//! of them produces transactions the network will reject (or worse, accept
//! with a meaning you didn't intend).

use std::time::Duration;

// ---------------------------------------------------------------------------
// Base58 Encoding
// ---------------------------------------------------------------------------

/// Version byte prefixed to a 20-byte account id before base58check
/// encoding. Every classic address starts with `r` because of this.
pub const ACCOUNT_ID_VERSION: u8 = 0x00;

/// Version byte for a secp256k1 family seed. Encoded seeds start with `s`.
pub const FAMILY_SEED_VERSION: u8 = 0x21;

/// Length of the base58check checksum suffix (first 4 bytes of
/// double-SHA-256 over version + payload).
pub const CHECKSUM_LENGTH: usize = 4;

/// Family seed payload length in bytes.
pub const FAMILY_SEED_LENGTH: usize = 16;

/// Account identifier length in bytes (RIPEMD-160 output).
pub const ACCOUNT_ID_LENGTH: usize = 20;

/// Compressed secp256k1 public key length.
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// Currency code length in bytes, both for ISO-style and hex codes.
pub const CURRENCY_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Hash Prefixes
// ---------------------------------------------------------------------------

/// `TXN\0`: prefix for the transaction id hash over the signed blob.
pub const HASH_PREFIX_TRANSACTION_ID: [u8; 4] = *b"TXN\0";

/// `STX\0`: prefix for the single-signing hash.
pub const HASH_PREFIX_TX_SIGN: [u8; 4] = *b"STX\0";

// ---------------------------------------------------------------------------
// Payment Flags
// ---------------------------------------------------------------------------

/// Do not use the default path; only use the supplied paths.
pub const TF_NO_DIRECT_RIPPLE: u32 = 0x0001_0000;

/// Deliver as much of `Amount` as possible instead of failing.
pub const TF_PARTIAL_PAYMENT: u32 = 0x0002_0000;

/// Only take paths whose quality is at least `Amount / SendMax`.
pub const TF_LIMIT_QUALITY: u32 = 0x0004_0000;

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Drops per whole unit of the native currency.
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Largest representable native amount, in drops (10^17).
pub const MAX_NATIVE_DROPS: u64 = 100_000_000_000_000_000;

/// Issued-amount mantissa bounds: normalized mantissas live in
/// `[MIN_MANTISSA, MAX_MANTISSA]`.
pub const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
pub const MAX_MANTISSA: u64 = 9_999_999_999_999_999;

/// Issued-amount exponent bounds after normalization.
pub const MIN_EXPONENT: i32 = -96;
pub const MAX_EXPONENT: i32 = 80;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Transaction fee used when none is given, in drops.
pub const DEFAULT_FEE_DROPS: u64 = 10;

/// Public websocket endpoint submissions go to unless overridden.
pub const DEFAULT_ENDPOINT: &str = "wss://s-east.ripple.com:443";

/// Submission wait bound. `None` means wait for the server indefinitely.
pub const DEFAULT_SUBMIT_TIMEOUT: Option<Duration> = None;
