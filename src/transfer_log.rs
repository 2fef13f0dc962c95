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

//! Transfer log with deduplication.
//!
//! Keeps every accepted transfer keyed by id while preserving acceptance
//! order. Not synchronized on its own; the engine guards it.

use crate::base::TransferId;
use crate::error::LedgerError;
use crate::transfer::Transfer;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Default)]
pub(crate) struct TransferLog {
    /// Map of transfer IDs to transfers for O(1) duplicate detection.
    transfers: HashMap<TransferId, Transfer>,

    /// Transfer IDs in acceptance order.
    order: Vec<TransferId>,
}

impl TransferLog {
    pub fn contains(&self, id: &TransferId) -> bool {
        self.transfers.contains_key(id)
    }

    /// Records an accepted transfer.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateId`] if a transfer with the same ID
    /// has already been recorded.
    pub fn push(&mut self, transfer: Transfer) -> Result<(), LedgerError> {
        match self.transfers.entry(transfer.id) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateId),
            Entry::Vacant(entry) => {
                entry.insert(transfer);
                self.order.push(transfer.id);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &TransferId) -> Option<&Transfer> {
        self.transfers.get(id)
    }

    /// Iterates transfers in acceptance order.
    pub fn iter(&self) -> impl Iterator<Item = &Transfer> {
        self.order.iter().filter_map(|id| self.transfers.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}
