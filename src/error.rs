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

//! Error types for ledger operations.

use thiserror::Error;

/// Ledger errors.
///
/// The first group is reported per batch entry by
/// [`Ledger::create_accounts`](crate::Ledger::create_accounts) and
/// [`Ledger::create_transfers`](crate::Ledger::create_transfers) and never
/// aborts sibling entries. The second group comes from balance queries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An account or transfer with this id already exists
    #[error("duplicate ID")]
    DuplicateId,

    /// Debit or credit account does not exist
    #[error("account not found")]
    AccountNotFound,

    /// Debit and credit account are the same
    #[error("debit and credit accounts must be different")]
    SameAccount,

    /// Accounts (or the transfer) are on different ledgers
    #[error("accounts must share the transfer's ledger")]
    LedgerMismatch,

    /// Amount is zero
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Posting would overflow a 128-bit accumulator
    #[error("amount overflows posted accumulator")]
    AmountOverflow,

    /// Account code does not map to a known category
    #[error("unknown account category code: {0}")]
    UnknownCategory(u16),

    /// Signed balance does not fit in 128 bits
    #[error("balance out of range")]
    BalanceOverflow,
}

impl LedgerError {
    /// Whether this error is a per-entry batch outcome rather than a query failure.
    pub fn is_entry_error(&self) -> bool {
        !matches!(self, Self::UnknownCategory(_) | Self::BalanceOverflow)
    }
}
