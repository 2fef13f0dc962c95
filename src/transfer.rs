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

//! Transfers.
//!
//! A [`Transfer`] moves `amount` from the debit account to the credit account
//! on one ledger. Once accepted it is never changed.

use crate::base::{AccountId, LedgerId, TransferId};
use serde::{Deserialize, Serialize};

/// Transfer classification. Opaque to balance logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferCategory {
    Purchase,
    Refund,
    Fx,
}

impl TransferCategory {
    pub const ALL: [TransferCategory; 3] = [Self::Purchase, Self::Refund, Self::Fx];

    pub const fn code(self) -> u16 {
        match self {
            Self::Purchase => 1000,
            Self::Refund => 2000,
            Self::Fx => 3000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub debit_account_id: AccountId,
    pub credit_account_id: AccountId,
    pub amount: u128,
    pub ledger: LedgerId,
    pub code: u16,
}

impl Transfer {
    pub fn new(
        id: TransferId,
        debit_account_id: AccountId,
        credit_account_id: AccountId,
        amount: u128,
        ledger: LedgerId,
    ) -> Self {
        Self {
            id,
            debit_account_id,
            credit_account_id,
            amount,
            ledger,
            code: TransferCategory::Purchase.code(),
        }
    }

    pub fn with_category(mut self, category: TransferCategory) -> Self {
        self.code = category.code();
        self
    }
}
