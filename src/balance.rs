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

//! Balance computation over account snapshots.
//!
//! Signed balances follow the category's normal side:
//!
//! | Category | Balance |
//! |----------|---------|
//! | Asset | `debits_posted - credits_posted` |
//! | Liability, Equity, Income, Expense | `credits_posted - debits_posted` |

use crate::account::Account;
use crate::error::LedgerError;
use serde::Serialize;

/// Computes the signed balance of an account.
///
/// # Errors
///
/// - [`LedgerError::UnknownCategory`] - Account code maps to no category.
/// - [`LedgerError::BalanceOverflow`] - Difference does not fit in `i128`.
pub fn compute_balance(account: &Account) -> Result<i128, LedgerError> {
    let category = account.category()?;
    let (debits, credits) = (account.debits_posted(), account.credits_posted());
    if category.is_debit_normal() {
        signed_difference(debits, credits)
    } else {
        signed_difference(credits, debits)
    }
}

fn signed_difference(plus: u128, minus: u128) -> Result<i128, LedgerError> {
    let result = if plus >= minus {
        0i128.checked_add_unsigned(plus - minus)
    } else {
        0i128.checked_sub_unsigned(minus - plus)
    };
    result.ok_or(LedgerError::BalanceOverflow)
}

/// Accounts holding the largest and smallest signed balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtremalBalances {
    pub max_account: Account,
    pub max_balance: i128,
    pub min_account: Account,
    pub min_balance: i128,
}

/// Finds the accounts with the largest and smallest signed balance.
///
/// Accounts are visited in iteration order and ties keep the first account
/// seen, so a fixed input order gives a reproducible answer. Returns `None`
/// for an empty input.
///
/// # Errors
///
/// Fails on the first account whose balance cannot be computed.
pub fn find_extremal_balances<'a, I>(accounts: I) -> Result<Option<ExtremalBalances>, LedgerError>
where
    I: IntoIterator<Item = &'a Account>,
{
    let mut extremal: Option<ExtremalBalances> = None;

    for account in accounts {
        let balance = compute_balance(account)?;
        match extremal.as_mut() {
            None => {
                extremal = Some(ExtremalBalances {
                    max_account: account.clone(),
                    max_balance: balance,
                    min_account: account.clone(),
                    min_balance: balance,
                });
            }
            Some(current) => {
                if balance > current.max_balance {
                    current.max_balance = balance;
                    current.max_account = account.clone();
                }
                if balance < current.min_balance {
                    current.min_balance = balance;
                    current.min_account = account.clone();
                }
            }
        }
    }

    Ok(extremal)
}

/// Sums of both accumulators across a set of accounts.
///
/// Sums saturate at `u128::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PostingTotals {
    pub debits_posted: u128,
    pub credits_posted: u128,
}

impl PostingTotals {
    pub fn of<'a, I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = &'a Account>,
    {
        accounts
            .into_iter()
            .fold(PostingTotals::default(), |totals, account| PostingTotals {
                debits_posted: totals.debits_posted.saturating_add(account.debits_posted()),
                credits_posted: totals.credits_posted.saturating_add(account.credits_posted()),
            })
    }

    /// Every posted debit has a matching posted credit.
    pub fn is_balanced(&self) -> bool {
        self.debits_posted == self.credits_posted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountCategory;
    use crate::base::{AccountId, LedgerId};

    fn account(id: u128, category: AccountCategory, debits: u128, credits: u128) -> Account {
        let mut account = Account::new(AccountId(id), LedgerId(1), category);
        account.post_debit(debits);
        account.post_credit(credits);
        account
    }

    #[test]
    fn asset_balance_is_debits_minus_credits() {
        let a = account(1, AccountCategory::Asset, 30, 10);
        assert_eq!(compute_balance(&a), Ok(20));
        let a = account(1, AccountCategory::Asset, 10, 30);
        assert_eq!(compute_balance(&a), Ok(-20));
    }

    #[test]
    fn credit_normal_balance_is_credits_minus_debits() {
        for category in [
            AccountCategory::Liability,
            AccountCategory::Equity,
            AccountCategory::Income,
            AccountCategory::Expense,
        ] {
            let a = account(1, category, 30, 10);
            assert_eq!(compute_balance(&a), Ok(-20), "{category:?}");
        }
    }

    #[test]
    fn unknown_category_fails() {
        let a = Account::with_code(AccountId(1), LedgerId(1), 42);
        assert_eq!(compute_balance(&a), Err(LedgerError::UnknownCategory(42)));
    }

    #[test]
    fn balance_range_edges() {
        let a = account(1, AccountCategory::Asset, i128::MAX as u128, 0);
        assert_eq!(compute_balance(&a), Ok(i128::MAX));

        let a = account(1, AccountCategory::Asset, 0, 1u128 << 127);
        assert_eq!(compute_balance(&a), Ok(i128::MIN));

        let a = account(1, AccountCategory::Asset, u128::MAX, 0);
        assert_eq!(compute_balance(&a), Err(LedgerError::BalanceOverflow));

        let a = account(1, AccountCategory::Asset, 0, (1u128 << 127) + 1);
        assert_eq!(compute_balance(&a), Err(LedgerError::BalanceOverflow));
    }

    #[test]
    fn extremal_of_empty_is_none() {
        assert_eq!(find_extremal_balances(&Vec::<Account>::new()), Ok(None));
    }

    #[test]
    fn extremal_ties_keep_first_seen() {
        let accounts = vec![
            account(1, AccountCategory::Asset, 5, 0),
            account(2, AccountCategory::Income, 0, 5),
            account(3, AccountCategory::Asset, 0, 5),
            account(4, AccountCategory::Liability, 5, 0),
        ];

        let extremal = find_extremal_balances(&accounts).unwrap().unwrap();
        assert_eq!(extremal.max_account.id(), AccountId(1));
        assert_eq!(extremal.max_balance, 5);
        assert_eq!(extremal.min_account.id(), AccountId(3));
        assert_eq!(extremal.min_balance, -5);
    }

    #[test]
    fn extremal_single_account_is_both() {
        let accounts = [account(9, AccountCategory::Equity, 0, 7)];
        let extremal = find_extremal_balances(&accounts).unwrap().unwrap();
        assert_eq!(extremal.max_account, extremal.min_account);
        assert_eq!(extremal.max_balance, 7);
    }

    #[test]
    fn extremal_propagates_unknown_category() {
        let accounts = vec![
            account(1, AccountCategory::Asset, 5, 0),
            Account::with_code(AccountId(2), LedgerId(1), 999),
        ];
        assert_eq!(
            find_extremal_balances(&accounts),
            Err(LedgerError::UnknownCategory(999))
        );
    }

    #[test]
    fn totals_detect_imbalance() {
        let balanced = [
            account(1, AccountCategory::Asset, 10, 0),
            account(2, AccountCategory::Liability, 0, 10),
        ];
        assert!(PostingTotals::of(&balanced).is_balanced());

        let unbalanced = [account(1, AccountCategory::Asset, 10, 0)];
        let totals = PostingTotals::of(&unbalanced);
        assert_eq!(totals.debits_posted, 10);
        assert!(!totals.is_balanced());
    }
}
