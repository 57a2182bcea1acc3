// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # tx
//!
//! Entry point for the `tx` binary. Parses flags, initializes logging,
//! derives the signing key, builds and signs one payment, prints it, and
//! optionally submits it.
//!
//! This is the only place that decides exit codes:
//!
//! - `0`: signed (and, with `--submit`, answered by the server, whatever the
//!   engine result). Also `--help` and `--version`.
//! - `1`: anything else, with a one-line message on stdout. A missing seed,
//!   sequence, or subcommand prints the usage text instead.

mod cli;
mod logging;
mod output;

use std::fmt;
use std::future::{self, Future};
use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, info, warn};

use rtx_protocol::config::DEFAULT_SUBMIT_TIMEOUT;
use rtx_protocol::crypto::derive_key;
use rtx_protocol::network::{submit_blob, SubmitError};
use rtx_protocol::transaction::{build_payment, sign_payment, SigningParams};

use cli::{Commands, TxCli};
use output::OutputMode;

/// A required global flag or the subcommand is missing.
#[derive(Debug)]
struct UsageError;

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("seed, a non-zero sequence, and a transaction type are required")
    }
}

impl std::error::Error for UsageError {}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match TxCli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            print!("{e}");
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init_logging(logging::DEFAULT_FILTER, cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is::<UsageError>() => {
            print!("{}", TxCli::command().render_help());
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: TxCli) -> Result<()> {
    let seed = cli
        .seed
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(UsageError)?;
    if cli.sequence == 0 {
        return Err(UsageError.into());
    }
    let Some(Commands::Payment(args)) = &cli.command else {
        return Err(UsageError.into());
    };
    let fields = args
        .to_fields()
        .ok_or_else(|| anyhow!("Destination, amount, and seed are required"))?;

    // The sequence number doubles as the derivation index: one seed, one
    // account per sequence slot.
    let key = derive_key(seed, cli.sequence).context("cannot derive signing key")?;
    debug!(account = %key.account_id(), "key derived");

    let payment = build_payment(&fields)?;
    let params = SigningParams {
        sequence: cli.sequence,
        fee: cli.fee,
        last_ledger_sequence: (cli.last_ledger != 0).then_some(cli.last_ledger),
    };
    let signed = sign_payment(payment, &key, &params).context("cannot sign payment")?;

    let mode = OutputMode {
        json: cli.json,
        binary: cli.binary,
    };
    output::write_signed(&mut io::stdout().lock(), &signed, mode)
        .context("cannot write transaction")?;

    if !cli.submit {
        return Ok(());
    }

    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .or(DEFAULT_SUBMIT_TIMEOUT);
    info!(endpoint = %cli.endpoint, ?timeout, "submitting");
    let result = tokio::select! {
        result = submit_blob(&cli.endpoint, signed.blob(), timeout) => result,
        () = cancel_requested(tokio::signal::ctrl_c()) => Err(SubmitError::Cancelled),
    }
    .with_context(|| format!("submit to {} failed", cli.endpoint))?;

    output::write_submit_result(&mut io::stdout().lock(), &result)
        .context("cannot write submit result")?;
    Ok(())
}

/// Resolves when `signal` reports a Ctrl-C. If the handler could not be
/// installed, never resolves, so the submit runs to completion.
async fn cancel_requested(signal: impl Future<Output = io::Result<()>>) {
    if let Err(e) = signal.await {
        warn!(error = %e, "cannot listen for ctrl-c, submit is not cancellable");
        future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ctrl_c_cancels() {
        tokio::time::timeout(Duration::from_secs(1), cancel_requested(async { Ok(()) }))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_handler_does_not_cancel() {
        let signal = async { Err(io::Error::new(io::ErrorKind::Other, "no signal handler")) };
        assert!(
            tokio::time::timeout(Duration::from_millis(100), cancel_requested(signal))
                .await
                .is_err()
        );
    }
}
