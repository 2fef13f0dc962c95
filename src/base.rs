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

//! Core identifier types for accounts, transfers and ledgers.
//!
//! Account and transfer ids are 128-bit. They print as decimal and parse from
//! either decimal text or a UUID string, so fixtures keyed by UUIDs map onto
//! the same id space.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Failure to parse an identifier from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid identifier '{0}': expected a decimal u128 or a UUID")]
pub struct ParseIdError(String);

fn parse_u128(input: &str) -> Result<u128, ParseIdError> {
    let trimmed = input.trim();
    if let Ok(value) = trimmed.parse::<u128>() {
        return Ok(value);
    }
    // Accepts hyphenated and simple (32 hex digit) UUID forms.
    Uuid::try_parse(trimmed)
        .map(|uuid| uuid.as_u128())
        .map_err(|_| ParseIdError(input.to_string()))
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u128);

        impl $name {
            /// Generates a fresh, time-ordered id (UUIDv7).
            pub fn generate() -> Self {
                Self(Uuid::now_v7().as_u128())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_u128(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid.as_u128())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(de::Error::custom)
            }
        }
    };
}

id_type!(
    /// Unique identifier for an account.
    AccountId
);

id_type!(
    /// Unique identifier for a transfer.
    ///
    /// Transfer ids share no namespace with account ids.
    TransferId
);

/// Partition key grouping accounts that may transact with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LedgerId(pub u32);

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
