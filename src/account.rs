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

//! Account management.
//!
//! An [`Account`] carries a raw category `code` and two posting accumulators.
//! The category decides the sign convention of the balance; the accumulators
//! only ever grow, and only through accepted transfers.
//!
//! # Example
//!
//! ```
//! use ledger_sim_rs::{Account, AccountCategory, AccountId, LedgerId};
//!
//! let account = Account::new(AccountId(1), LedgerId(1), AccountCategory::Asset);
//! assert_eq!(account.debits_posted(), 0);
//! assert_eq!(account.balance(), Ok(0));
//! ```

use crate::base::{AccountId, LedgerId};
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};

/// Account category, which determines the normal balance side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    Asset,
    Liability,
    Equity,
    Income,
    Expense,
}

impl AccountCategory {
    pub const ALL: [AccountCategory; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// Code identifying this category on an account.
    pub const fn code(self) -> u16 {
        match self {
            Self::Asset => 100,
            Self::Liability => 200,
            Self::Equity => 300,
            Self::Income => 400,
            Self::Expense => 500,
        }
    }

    /// Resolves a raw account code to its category.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownCategory`] for any code other than 100, 200,
    /// 300, 400 or 500.
    pub fn from_code(code: u16) -> Result<Self, LedgerError> {
        match code {
            100 => Ok(Self::Asset),
            200 => Ok(Self::Liability),
            300 => Ok(Self::Equity),
            400 => Ok(Self::Income),
            500 => Ok(Self::Expense),
            _ => Err(LedgerError::UnknownCategory(code)),
        }
    }

    /// Asset accounts grow with debits; every other category grows with credits.
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset)
    }
}

impl TryFrom<u16> for AccountCategory {
    type Error = LedgerError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

/// Ledger account.
///
/// Snapshots returned by the engine are plain values; mutating a snapshot has
/// no effect on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: AccountId,
    ledger: LedgerId,
    code: u16,
    debits_posted: u128,
    credits_posted: u128,
}

impl Account {
    pub fn new(id: AccountId, ledger: LedgerId, category: AccountCategory) -> Self {
        Self::with_code(id, ledger, category.code())
    }

    /// Creates an account with a raw code. The code is not validated here;
    /// an unknown code only fails once a balance is computed.
    pub fn with_code(id: AccountId, ledger: LedgerId, code: u16) -> Self {
        Self {
            id,
            ledger,
            code,
            debits_posted: 0,
            credits_posted: 0,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn ledger(&self) -> LedgerId {
        self.ledger
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn debits_posted(&self) -> u128 {
        self.debits_posted
    }

    pub fn credits_posted(&self) -> u128 {
        self.credits_posted
    }

    pub fn category(&self) -> Result<AccountCategory, LedgerError> {
        AccountCategory::from_code(self.code)
    }

    /// Signed balance per the category's sign convention.
    ///
    /// See [`compute_balance`](crate::compute_balance).
    pub fn balance(&self) -> Result<i128, LedgerError> {
        crate::balance::compute_balance(self)
    }

    /// Copy of this account with both accumulators reset, as stored on creation.
    pub(crate) fn opened(&self) -> Self {
        Self::with_code(self.id, self.ledger, self.code)
    }

    pub(crate) fn can_debit(&self, amount: u128) -> bool {
        self.debits_posted.checked_add(amount).is_some()
    }

    pub(crate) fn can_credit(&self, amount: u128) -> bool {
        self.credits_posted.checked_add(amount).is_some()
    }

    /// Callers must check [`can_debit`](Self::can_debit) first.
    pub(crate) fn post_debit(&mut self, amount: u128) {
        debug_assert!(self.can_debit(amount), "debits_posted overflow on {}", self.id);
        self.debits_posted += amount;
    }

    /// Callers must check [`can_credit`](Self::can_credit) first.
    pub(crate) fn post_credit(&mut self, amount: u128) {
        debug_assert!(self.can_credit(amount), "credits_posted overflow on {}", self.id);
        self.credits_posted += amount;
    }
}
