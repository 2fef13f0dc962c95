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

//! Seeded random fixtures and the batched stress simulation.
//!
//! All randomness flows from one [`StdRng`] seeded by the caller, so a given
//! seed always produces the same accounts, the same transfers and the same
//! final balances.

use crate::account::{Account, AccountCategory};
use crate::balance::{ExtremalBalances, PostingTotals, find_extremal_balances};
use crate::base::{AccountId, LedgerId, TransferId};
use crate::engine::{BatchResults, Ledger, batch_failures};
use crate::error::LedgerError;
use crate::transfer::{Transfer, TransferCategory};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::num::NonZeroUsize;
use tracing::{info, warn};

/// Largest amount drawn for a random transfer.
pub const MAX_TRANSFER_AMOUNT: u128 = 1000;

/// Generates random accounts and transfers on a single ledger.
#[derive(Debug)]
pub struct FixtureGenerator {
    rng: StdRng,
    ledger: LedgerId,
}

impl FixtureGenerator {
    pub fn new(seed: u64, ledger: LedgerId) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ledger,
        }
    }

    /// `count` accounts with random IDs and uniformly drawn categories.
    pub fn accounts(&mut self, count: usize) -> Vec<Account> {
        (0..count)
            .map(|_| {
                let id = AccountId(self.rng.r#gen());
                let category = *AccountCategory::ALL
                    .choose(&mut self.rng)
                    .unwrap_or(&AccountCategory::Asset);
                Account::new(id, self.ledger, category)
            })
            .collect()
    }

    /// `count` transfers between distinct accounts drawn from `accounts`.
    ///
    /// Amounts are uniform in `1..=MAX_TRANSFER_AMOUNT`. Returns nothing when
    /// fewer than two accounts are given.
    pub fn transfers(&mut self, accounts: &[Account], count: usize) -> Vec<Transfer> {
        if accounts.len() < 2 {
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                let (debit, credit) = loop {
                    let debit = self.rng.gen_range(0..accounts.len());
                    let credit = self.rng.gen_range(0..accounts.len());
                    if debit != credit {
                        break (debit, credit);
                    }
                };
                let category = *TransferCategory::ALL
                    .choose(&mut self.rng)
                    .unwrap_or(&TransferCategory::Purchase);
                Transfer::new(
                    TransferId(self.rng.r#gen()),
                    accounts[debit].id(),
                    accounts[credit].id(),
                    self.rng.gen_range(1..=MAX_TRANSFER_AMOUNT),
                    self.ledger,
                )
                .with_category(category)
            })
            .collect()
    }
}

/// Parameters of a stress simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub accounts: usize,
    pub transfers: usize,
    pub batch_size: NonZeroUsize,
    pub ledger: LedgerId,
    pub seed: u64,
}

impl SimulationConfig {
    pub const DEFAULT_ACCOUNTS: usize = 5000;
    pub const DEFAULT_TRANSFERS: usize = 250_000;
    pub const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(1000).unwrap();
    pub const DEFAULT_SEED: u64 = 42;
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            accounts: Self::DEFAULT_ACCOUNTS,
            transfers: Self::DEFAULT_TRANSFERS,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            ledger: LedgerId(1),
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// Outcome of [`run_simulation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub accounts_created: usize,
    pub accounts_rejected: usize,
    pub transfers_posted: usize,
    pub transfers_rejected: usize,
    pub totals: PostingTotals,
    pub extremal: Option<ExtremalBalances>,
}

/// Submits `items` in chunks of `batch_size` and counts `(accepted, rejected)`.
///
/// The final chunk may be shorter than `batch_size`. Each rejected entry is
/// logged with its index in `items`.
pub fn submit_in_batches<T, F>(
    items: &[T],
    batch_size: NonZeroUsize,
    kind: &str,
    mut submit: F,
) -> (usize, usize)
where
    F: FnMut(&[T]) -> BatchResults,
{
    let mut accepted = 0;
    let mut rejected = 0;

    for (batch_index, batch) in items.chunks(batch_size.get()).enumerate() {
        let start = batch_index * batch_size.get();
        let results = submit(batch);
        for (index, error) in batch_failures(&results) {
            warn!(kind, index = start + index, %error, "entry failed");
            rejected += 1;
        }
        accepted += batch.len() - results.iter().filter(|r| r.is_err()).count();
    }

    (accepted, rejected)
}

/// Populates `ledger` with random accounts and transfers, then reports the
/// posting totals and the extremal balances.
///
/// # Errors
///
/// Fails if any account's balance cannot be computed.
#[tracing::instrument(skip(ledger))]
pub fn run_simulation(
    ledger: &Ledger,
    config: &SimulationConfig,
) -> Result<SimulationReport, LedgerError> {
    let mut generator = FixtureGenerator::new(config.seed, config.ledger);

    let accounts = generator.accounts(config.accounts);
    let (accounts_created, accounts_rejected) =
        submit_in_batches(&accounts, config.batch_size, "account", |batch| {
            ledger.create_accounts(batch)
        });
    info!(accounts_created, accounts_rejected, "accounts submitted");

    let transfers = generator.transfers(&accounts, config.transfers);
    let (transfers_posted, transfers_rejected) =
        submit_in_batches(&transfers, config.batch_size, "transfer", |batch| {
            ledger.create_transfers(batch)
        });
    info!(transfers_posted, transfers_rejected, "transfers submitted");

    let ids: Vec<AccountId> = accounts.iter().map(Account::id).collect();
    let snapshots = ledger.lookup_accounts(&ids);
    let totals = PostingTotals::of(&snapshots);
    let extremal = find_extremal_balances(&snapshots)?;

    if let Some(extremal) = &extremal {
        info!(
            max_account = %extremal.max_account.id(),
            max_balance = %extremal.max_balance,
            min_account = %extremal.min_account.id(),
            min_balance = %extremal.min_balance,
            "extremal balances"
        );
    }

    Ok(SimulationReport {
        accounts_created,
        accounts_rejected,
        transfers_posted,
        transfers_rejected,
        totals,
        extremal,
    })
}
