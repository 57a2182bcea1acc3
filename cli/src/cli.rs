//! # CLI Interface
//!
//! Defines the command-line argument structure for `tx` using `clap`
//! derive. Global flags come before the subcommand; the only subcommand is
//! `payment` (alias `p`).
//!
//! ```text
//! tx -s <seed> -q <sequence> [-f fee] [-l lastledger] [-t] [-b] [-j] \
//!    payment -d <dest> -a <amount> [--paths ..] [-m sendmax] [-r] [-p] [-l]
//! ```
//!
//! Short flags repeat between levels (`-t`, `-l`): before `payment` they
//! mean submit / last-ledger, after it tag / limit-quality.

use clap::{Args, Parser, Subcommand};

use rtx_protocol::config::{DEFAULT_ENDPOINT, DEFAULT_FEE_DROPS};
use rtx_protocol::transaction::{PaymentFields, PaymentFlags};

use crate::logging::LogFormat;

/// Build, sign, and optionally submit a payment transaction.
#[derive(Parser, Debug)]
#[command(name = "tx", version, about, long_about = None)]
pub struct TxCli {
    /// Account secret seed (base58 family seed, `s...`).
    #[arg(long, short = 's')]
    pub seed: Option<String>,

    /// Transaction fee in drops.
    #[arg(long, short = 'f', default_value_t = DEFAULT_FEE_DROPS)]
    pub fee: u64,

    /// Transaction sequence number. Also selects the derived signing key.
    #[arg(long, short = 'q', default_value_t = 0)]
    pub sequence: u32,

    /// Highest ledger the transaction may appear in (0 = unbounded).
    #[arg(long = "lastledger", short = 'l', default_value_t = 0)]
    pub last_ledger: u32,

    /// Submit the signed transaction to the network.
    #[arg(long, short = 't')]
    pub submit: bool,

    /// Write the raw signed bytes to stdout instead of text.
    #[arg(long, short = 'b')]
    pub binary: bool,

    /// Print only the JSON form of the signed transaction.
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Websocket endpoint used with `--submit`.
    #[arg(long, env = "RTX_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Give up waiting for the submit result after this many seconds.
    #[arg(long, env = "RTX_SUBMIT_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Log output format (logs go to stderr).
    #[arg(long, env = "RTX_LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Transaction types.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and sign a payment.
    #[command(visible_alias = "p")]
    Payment(PaymentArgs),
}

/// Arguments for the `payment` subcommand.
#[derive(Args, Debug, Default)]
pub struct PaymentArgs {
    /// Destination account address.
    #[arg(long, short = 'd')]
    pub dest: Option<String>,

    /// Amount: drops, `1.5` (XRP), `value/CUR`, or `value/CUR/issuer`.
    #[arg(long, short = 'a')]
    pub amount: Option<String>,

    /// Destination tag.
    #[arg(long, short = 't')]
    pub tag: Option<u32>,

    /// Invoice identifier; its SHA-512Half becomes the InvoiceID.
    #[arg(long, short = 'i')]
    pub invoice: Option<String>,

    /// Payment paths: `step => step, step => step`.
    #[arg(long)]
    pub paths: Option<String>,

    /// Maximum amount to spend, same grammar as `--amount`.
    #[arg(long = "sendmax", short = 'm')]
    pub send_max: Option<String>,

    /// Do not use the default path.
    #[arg(long = "nodirect", short = 'r')]
    pub no_direct: bool,

    /// Allow partial payment.
    #[arg(long, short = 'p')]
    pub partial: bool,

    /// Limit quality of paths taken.
    #[arg(long, short = 'l')]
    pub limit: bool,
}

impl PaymentArgs {
    /// The library's input form. `None` when destination or amount is
    /// missing.
    pub fn to_fields(&self) -> Option<PaymentFields> {
        let destination = self.dest.clone().filter(|d| !d.is_empty())?;
        let amount = self.amount.clone().filter(|a| !a.is_empty())?;
        Some(PaymentFields {
            destination,
            amount,
            send_max: self.send_max.clone(),
            paths: self.paths.clone(),
            destination_tag: self.tag,
            invoice: self.invoice.clone(),
            flags: PaymentFlags {
                no_direct_ripple: self.no_direct,
                partial_payment: self.partial,
                limit_quality: self.limit,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        TxCli::command().debug_assert();
    }

    #[test]
    fn global_and_payment_shorts_are_distinct() {
        let cli = TxCli::try_parse_from([
            "tx", "-s", "seed", "-q", "3", "-t", "-l", "99", "p", "-d", "rDest", "-a", "1", "-t",
            "7", "-l",
        ])
        .unwrap();

        assert!(cli.submit);
        assert_eq!(cli.last_ledger, 99);
        let Some(Commands::Payment(args)) = cli.command else {
            panic!("expected payment");
        };
        assert_eq!(args.tag, Some(7));
        assert!(args.limit);
        assert!(!args.partial);
    }

    #[test]
    fn defaults() {
        let cli = TxCli::try_parse_from(["tx", "payment"]).unwrap();
        assert_eq!(cli.fee, 10);
        assert_eq!(cli.sequence, 0);
        assert_eq!(cli.last_ledger, 0);
        assert!(cli.seed.is_none());
        assert!(!cli.json && !cli.binary && !cli.submit);
    }

    #[test]
    fn payment_flags_map_to_fields() {
        let args = PaymentArgs {
            dest: Some("rDest".to_string()),
            amount: Some("5".to_string()),
            no_direct: true,
            partial: true,
            ..Default::default()
        };
        let fields = args.to_fields().unwrap();
        assert_eq!(fields.flags.bits(), 0x0003_0000);
        assert_eq!(fields.destination, "rDest");
    }

    #[test]
    fn missing_dest_or_amount_gives_none() {
        let args = PaymentArgs {
            amount: Some("5".to_string()),
            ..Default::default()
        };
        assert!(args.to_fields().is_none());

        let args = PaymentArgs {
            dest: Some("rDest".to_string()),
            amount: Some(String::new()),
            ..Default::default()
        };
        assert!(args.to_fields().is_none());
    }

    #[test]
    fn flags_after_subcommand_are_not_global() {
        assert!(TxCli::try_parse_from(["tx", "payment", "-s", "seed"]).is_err());
    }
}
