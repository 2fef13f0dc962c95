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

//! # Ledger Simulator
//!
//! This library provides an in-memory double-entry ledger: accounts and
//! transfers are created in batches with per-entry outcomes, and balances are
//! derived from posted debits and credits according to each account's
//! category.
//!
//! ## Core Components
//!
//! - [`Ledger`]: Engine owning accounts and transfers
//! - [`Account`]: Account snapshot with raw posting accumulators
//! - [`Transfer`]: Movement of an amount from a debit to a credit account
//! - [`compute_balance`] / [`find_extremal_balances`]: Signed balance queries
//! - [`FixtureGenerator`] / [`run_simulation`]: Seeded random stress fixtures
//! - [`LedgerError`]: Per-entry outcomes and query failures
//!
//! ## Example
//!
//! ```
//! use ledger_sim_rs::{Account, AccountCategory, AccountId, Ledger, LedgerId, Transfer, TransferId};
//!
//! let ledger = Ledger::new();
//! let cash = Account::new(AccountId(1), LedgerId(1), AccountCategory::Asset);
//! let loan = Account::new(AccountId(2), LedgerId(1), AccountCategory::Liability);
//! assert!(ledger.create_accounts(&[cash, loan]).iter().all(Result::is_ok));
//!
//! let results = ledger.create_transfers(&[Transfer::new(
//!     TransferId(1),
//!     AccountId(1),
//!     AccountId(2),
//!     10,
//!     LedgerId(1),
//! )]);
//! assert_eq!(results, vec![Ok(())]);
//!
//! let accounts = ledger.lookup_accounts(&[AccountId(1), AccountId(2)]);
//! assert_eq!(accounts[0].debits_posted(), 10);
//! assert_eq!(accounts[0].balance(), Ok(10));
//! assert_eq!(accounts[1].credits_posted(), 10);
//! assert_eq!(accounts[1].balance(), Ok(10));
//! ```
//!
//! ## Thread Safety
//!
//! [`Ledger`] is `Send + Sync`. Batches are applied one at a time; lookups
//! run concurrently with each other.

pub mod account;
pub mod balance;
mod base;
mod engine;
pub mod error;
pub mod fixture;
pub mod telemetry;
mod transfer;
mod transfer_log;

pub use account::{Account, AccountCategory};
pub use balance::{ExtremalBalances, PostingTotals, compute_balance, find_extremal_balances};
pub use base::{AccountId, LedgerId, ParseIdError, TransferId};
pub use engine::{BatchResults, Ledger, batch_failures};
pub use error::LedgerError;
pub use fixture::{
    FixtureGenerator, SimulationConfig, SimulationReport, run_simulation, submit_in_batches,
};
pub use transfer::{Transfer, TransferCategory};
