// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::{Args, Parser, Subcommand};
use csv::{ReaderBuilder, Trim, Writer};
use ledger_sim_rs::telemetry::{self, LogFormat};
use ledger_sim_rs::{
    Account, AccountId, Ledger, LedgerError, LedgerId, SimulationConfig, SimulationReport,
    Transfer, TransferId, run_simulation, submit_in_batches,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use tracing::{error, info, warn};

/// Ledger Simulator - Drive an in-memory double-entry ledger
///
/// Runs a seeded random stress simulation, or replays account and transfer
/// CSV files and prints the resulting balances.
#[derive(Parser, Debug)]
#[command(name = "ledger-sim")]
#[command(about = "A double-entry ledger simulator", long_about = None)]
struct Cli {
    /// Log line format (filter with RUST_LOG)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text, env = "LEDGER_SIM_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create random accounts and transfers and report extremal balances
    Simulate(SimulateArgs),
    /// Apply accounts and transfers from CSV files and print balances as CSV
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Number of accounts to create
    #[arg(long, default_value_t = SimulationConfig::DEFAULT_ACCOUNTS, env = "LEDGER_SIM_ACCOUNTS")]
    accounts: usize,

    /// Number of transfers to post
    #[arg(long, default_value_t = SimulationConfig::DEFAULT_TRANSFERS, env = "LEDGER_SIM_TRANSFERS")]
    transfers: usize,

    /// Entries per submitted batch
    #[arg(long, default_value_t = SimulationConfig::DEFAULT_BATCH_SIZE, env = "LEDGER_SIM_BATCH_SIZE")]
    batch_size: NonZeroUsize,

    /// Seed for the random fixture generator
    #[arg(long, default_value_t = SimulationConfig::DEFAULT_SEED, env = "LEDGER_SIM_SEED")]
    seed: u64,

    /// Ledger all accounts and transfers are created on
    #[arg(long, default_value_t = 1, env = "LEDGER_SIM_LEDGER")]
    ledger: u32,
}

impl From<&SimulateArgs> for SimulationConfig {
    fn from(args: &SimulateArgs) -> Self {
        SimulationConfig {
            accounts: args.accounts,
            transfers: args.transfers,
            batch_size: args.batch_size,
            ledger: LedgerId(args.ledger),
            seed: args.seed,
        }
    }
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Accounts CSV file
    ///
    /// Expected format: id,ledger,code
    #[arg(long, value_name = "FILE")]
    accounts: PathBuf,

    /// Transfers CSV file
    ///
    /// Expected format: id,debit_account_id,credit_account_id,amount,ledger,code
    #[arg(long, value_name = "FILE")]
    transfers: PathBuf,

    /// Entries per submitted batch
    #[arg(long, default_value_t = SimulationConfig::DEFAULT_BATCH_SIZE, env = "LEDGER_SIM_BATCH_SIZE")]
    batch_size: NonZeroUsize,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("error opening file '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("output error: {0}")]
    Io(#[from] io::Error),
}

fn main() {
    let cli = Cli::parse();
    telemetry::init(cli.log_format, "info");

    let result = match &cli.command {
        Command::Simulate(args) => simulate(args, io::stdout()),
        Command::Replay(args) => replay(args, io::stdout()),
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        process::exit(1);
    }
}

fn simulate<W: Write>(args: &SimulateArgs, writer: W) -> Result<(), CliError> {
    let ledger = Ledger::new();
    let report = run_simulation(&ledger, &SimulationConfig::from(args))?;
    write_report(&report, writer)?;
    Ok(())
}

fn replay<W: Write>(args: &ReplayArgs, writer: W) -> Result<(), CliError> {
    let accounts = read_accounts(open(&args.accounts)?)?;
    let transfers = read_transfers(open(&args.transfers)?)?;

    let ledger = Ledger::new();
    apply(&ledger, &accounts, &transfers, args.batch_size);
    write_balances(&ledger, writer)
}

fn open(path: &Path) -> Result<BufReader<File>, CliError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| CliError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Prints a human readable simulation summary.
fn write_report<W: Write>(report: &SimulationReport, mut writer: W) -> io::Result<()> {
    writeln!(
        writer,
        "accounts: {} created, {} rejected",
        report.accounts_created, report.accounts_rejected
    )?;
    writeln!(
        writer,
        "transfers: {} posted, {} rejected",
        report.transfers_posted, report.transfers_rejected
    )?;
    writeln!(
        writer,
        "totals: {} debits posted, {} credits posted",
        report.totals.debits_posted, report.totals.credits_posted
    )?;
    match &report.extremal {
        Some(extremal) => {
            writeln!(
                writer,
                "max balance account: {} (balance: {})",
                extremal.max_account.id(),
                extremal.max_balance
            )?;
            writeln!(
                writer,
                "min balance account: {} (balance: {})",
                extremal.min_account.id(),
                extremal.min_balance
            )?;
        }
        None => writeln!(writer, "no accounts")?,
    }
    writer.flush()
}

/// Raw accounts CSV record.
///
/// Fields: `id, ledger, code`
#[derive(Debug, Deserialize)]
struct AccountRecord {
    id: AccountId,
    ledger: u32,
    code: u16,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Account::with_code(record.id, LedgerId(record.ledger), record.code)
    }
}

/// Raw transfers CSV record.
///
/// Fields: `id, debit_account_id, credit_account_id, amount, ledger, code`
#[derive(Debug, Deserialize)]
struct TransferRecord {
    id: TransferId,
    debit_account_id: AccountId,
    credit_account_id: AccountId,
    amount: u128,
    ledger: u32,
    #[serde(default)]
    code: u16,
}

impl From<TransferRecord> for Transfer {
    fn from(record: TransferRecord) -> Self {
        Transfer {
            id: record.id,
            debit_account_id: record.debit_account_id,
            credit_account_id: record.credit_account_id,
            amount: record.amount,
            ledger: LedgerId(record.ledger),
            code: record.code,
        }
    }
}

/// Balance CSV output record. 128-bit values are written as decimal text.
#[derive(Debug, Serialize)]
struct BalanceRecord {
    id: AccountId,
    ledger: LedgerId,
    code: u16,
    debits_posted: String,
    credits_posted: String,
    balance: String,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true) // Allow a missing trailing code
        .has_headers(true)
        .from_reader(reader)
}

/// Reads accounts, skipping malformed rows.
fn read_accounts<R: Read>(reader: R) -> Result<Vec<Account>, csv::Error> {
    read_records::<R, AccountRecord, Account>(reader, "account")
}

/// Reads transfers, skipping malformed rows.
fn read_transfers<R: Read>(reader: R) -> Result<Vec<Transfer>, csv::Error> {
    read_records::<R, TransferRecord, Transfer>(reader, "transfer")
}

fn read_records<R, T, U>(reader: R, kind: &str) -> Result<Vec<U>, csv::Error>
where
    R: Read,
    T: for<'de> Deserialize<'de> + Into<U>,
{
    let mut rdr = csv_reader(reader);
    let mut out = Vec::new();
    for result in rdr.deserialize::<T>() {
        match result {
            Ok(record) => out.push(record.into()),
            Err(e) if e.is_io_error() => return Err(e),
            Err(e) => warn!(kind, error = %e, "skipping malformed row"),
        }
    }
    Ok(out)
}

/// Applies accounts first, then transfers, each in batches.
fn apply(ledger: &Ledger, accounts: &[Account], transfers: &[Transfer], batch_size: NonZeroUsize) {
    let (created, rejected) = submit_in_batches(accounts, batch_size, "account", |batch| {
        ledger.create_accounts(batch)
    });
    info!(created, rejected, "accounts applied");

    let (posted, rejected) = submit_in_batches(transfers, batch_size, "transfer", |batch| {
        ledger.create_transfers(batch)
    });
    info!(posted, rejected, "transfers applied");
}

/// Writes every account with its accumulators and signed balance, in
/// creation order.
///
/// Every balance is computed before the first row is written, so a failure
/// leaves `writer` untouched.
///
/// # Errors
///
/// Fails on the first account with an unknown category.
fn write_balances<W: Write>(ledger: &Ledger, writer: W) -> Result<(), CliError> {
    let records = ledger
        .accounts()
        .into_iter()
        .map(|account| {
            Ok(BalanceRecord {
                id: account.id(),
                ledger: account.ledger(),
                code: account.code(),
                debits_posted: account.debits_posted().to_string(),
                credits_posted: account.credits_posted().to_string(),
                balance: account.balance()?.to_string(),
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    let mut wtr = Writer::from_writer(writer);
    for record in &records {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}
