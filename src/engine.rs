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

//! Ledger engine.
//!
//! The [`Ledger`] owns every account and transfer and applies double-entry
//! postings.
//!
//! # Batch Processing
//!
//! - **Accounts**: Each entry is inserted unless its ID already exists.
//! - **Transfers**: Each entry is validated against the current state and, if
//!   accepted, posted to both accounts before the next entry is examined.
//!
//! Every entry gets its own outcome. A rejected entry never blocks the
//! entries around it.
//!
//! # Thread Safety
//!
//! A single [`RwLock`] guards the whole ledger. Batches hold the write lock
//! from the first entry to the last, so concurrent batches never interleave
//! and readers never observe half of a transfer. Lookups share the read lock.

use crate::account::Account;
use crate::balance::PostingTotals;
use crate::base::{AccountId, TransferId};
use crate::error::LedgerError;
use crate::transfer::Transfer;
use crate::transfer_log::TransferLog;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Per-entry outcomes of a batch, index-aligned with the submitted batch.
pub type BatchResults = Vec<Result<(), LedgerError>>;

/// Returns `(index, error)` for every rejected entry of a batch.
pub fn batch_failures(
    results: &[Result<(), LedgerError>],
) -> impl Iterator<Item = (usize, &LedgerError)> {
    results
        .iter()
        .enumerate()
        .filter_map(|(index, result)| result.as_ref().err().map(|error| (index, error)))
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Accounts indexed by ID.
    accounts: HashMap<AccountId, Account>,
    /// Account IDs in creation order.
    account_order: Vec<AccountId>,
    /// Accepted transfers, also used for ID deduplication.
    transfers: TransferLog,
}

impl LedgerState {
    fn create_account(&mut self, account: &Account) -> Result<(), LedgerError> {
        match self.accounts.entry(account.id()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateId),
            Entry::Vacant(entry) => {
                entry.insert(account.opened());
                self.account_order.push(account.id());
                Ok(())
            }
        }
    }

    fn create_transfer(&mut self, transfer: &Transfer) -> Result<(), LedgerError> {
        if transfer.debit_account_id == transfer.credit_account_id {
            return Err(LedgerError::SameAccount);
        }
        if transfer.amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if self.transfers.contains(&transfer.id) {
            return Err(LedgerError::DuplicateId);
        }

        let debit = self
            .accounts
            .get(&transfer.debit_account_id)
            .ok_or(LedgerError::AccountNotFound)?;
        let credit = self
            .accounts
            .get(&transfer.credit_account_id)
            .ok_or(LedgerError::AccountNotFound)?;

        if debit.ledger() != credit.ledger() || debit.ledger() != transfer.ledger {
            return Err(LedgerError::LedgerMismatch);
        }
        if !debit.can_debit(transfer.amount) || !credit.can_credit(transfer.amount) {
            return Err(LedgerError::AmountOverflow);
        }

        // All checks passed; from here on both sides are posted.
        self.transfers.push(*transfer)?;
        if let Some(debit) = self.accounts.get_mut(&transfer.debit_account_id) {
            debit.post_debit(transfer.amount);
        }
        if let Some(credit) = self.accounts.get_mut(&transfer.credit_account_id) {
            credit.post_credit(transfer.amount);
        }
        Ok(())
    }

    fn assert_invariants(&self) {
        debug_assert!(
            PostingTotals::of(self.accounts.values()).is_balanced(),
            "Invariant violated: posted debits and credits diverged"
        );
        debug_assert_eq!(self.accounts.len(), self.account_order.len());
    }
}

/// In-memory double-entry ledger.
///
/// # Invariants
///
/// - Account and transfer IDs are unique within their own kind.
/// - Accumulators change only through accepted transfers.
/// - Summed over all accounts, `debits_posted == credits_posted`.
#[derive(Debug, Default)]
pub struct Ledger {
    state: RwLock<LedgerState>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a batch of accounts.
    ///
    /// Accumulators on the submitted accounts are ignored; every new account
    /// starts at zero.
    ///
    /// # Errors
    ///
    /// Per entry: [`LedgerError::DuplicateId`] if the ID already exists,
    /// including an earlier entry of the same batch.
    #[tracing::instrument(skip_all, fields(batch_len = batch.len()))]
    pub fn create_accounts(&self, batch: &[Account]) -> BatchResults {
        let mut state = self.state.write();
        let results: BatchResults = batch
            .iter()
            .enumerate()
            .map(|(index, account)| {
                let result = state.create_account(account);
                if let Err(e) = &result {
                    debug!(index, id = %account.id(), error = %e, "account rejected");
                }
                result
            })
            .collect();
        state.assert_invariants();
        results
    }

    /// Creates a batch of transfers, applied in submission order.
    ///
    /// # Errors
    ///
    /// Per entry, checked in this order:
    ///
    /// - [`LedgerError::SameAccount`] - Debit and credit account are equal.
    /// - [`LedgerError::InvalidAmount`] - Amount is zero.
    /// - [`LedgerError::DuplicateId`] - Transfer ID already accepted.
    /// - [`LedgerError::AccountNotFound`] - Either account does not exist.
    /// - [`LedgerError::LedgerMismatch`] - Ledgers of the accounts and transfer differ.
    /// - [`LedgerError::AmountOverflow`] - An accumulator would overflow.
    #[tracing::instrument(skip_all, fields(batch_len = batch.len()))]
    pub fn create_transfers(&self, batch: &[Transfer]) -> BatchResults {
        let mut state = self.state.write();
        let results: BatchResults = batch
            .iter()
            .enumerate()
            .map(|(index, transfer)| {
                let result = state.create_transfer(transfer);
                if let Err(e) = &result {
                    debug!(index, id = %transfer.id, error = %e, "transfer rejected");
                }
                result
            })
            .collect();
        state.assert_invariants();
        results
    }

    /// Returns snapshots of the requested accounts in request order.
    ///
    /// Unknown IDs are omitted.
    pub fn lookup_accounts(&self, ids: &[AccountId]) -> Vec<Account> {
        let state = self.state.read();
        ids.iter()
            .filter_map(|id| state.accounts.get(id).cloned())
            .collect()
    }

    /// Returns the requested transfers in request order.
    ///
    /// Unknown IDs are omitted.
    pub fn lookup_transfers(&self, ids: &[TransferId]) -> Vec<Transfer> {
        let state = self.state.read();
        ids.iter()
            .filter_map(|id| state.transfers.get(id).copied())
            .collect()
    }

    /// Snapshot of all accounts in creation order.
    pub fn accounts(&self) -> Vec<Account> {
        let state = self.state.read();
        state
            .account_order
            .iter()
            .filter_map(|id| state.accounts.get(id).cloned())
            .collect()
    }

    /// Snapshot of all transfers in acceptance order.
    pub fn transfers(&self) -> Vec<Transfer> {
        self.state.read().transfers.iter().copied().collect()
    }

    pub fn account_count(&self) -> usize {
        self.state.read().accounts.len()
    }

    pub fn transfer_count(&self) -> usize {
        self.state.read().transfers.len()
    }

    /// Sums both accumulators over every account.
    pub fn totals(&self) -> PostingTotals {
        PostingTotals::of(self.state.read().accounts.values())
    }
}
