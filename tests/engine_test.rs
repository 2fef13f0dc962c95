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

//! Ledger public API integration tests.

use ledger_sim_rs::{
    Account, AccountCategory, AccountId, Ledger, LedgerError, LedgerId, Transfer, TransferId,
    batch_failures,
};

fn make_account(id: u128, ledger: u32, category: AccountCategory) -> Account {
    Account::new(AccountId(id), LedgerId(ledger), category)
}

fn make_transfer(id: u128, debit: u128, credit: u128, amount: u128) -> Transfer {
    Transfer::new(
        TransferId(id),
        AccountId(debit),
        AccountId(credit),
        amount,
        LedgerId(1),
    )
}

fn ledger_with_accounts(accounts: &[Account]) -> Ledger {
    let ledger = Ledger::new();
    let results = ledger.create_accounts(accounts);
    assert!(results.iter().all(Result::is_ok), "setup failed: {results:?}");
    ledger
}

fn get(ledger: &Ledger, id: u128) -> Account {
    ledger
        .lookup_accounts(&[AccountId(id)])
        .pop()
        .expect("account should exist")
}

#[test]
fn basic_transfer_posts_both_sides() {
    let id1 = AccountId::generate();
    let id2 = AccountId::generate();
    let ledger = ledger_with_accounts(&[
        Account::new(id1, LedgerId(1), AccountCategory::Asset),
        Account::new(id2, LedgerId(1), AccountCategory::Liability),
    ]);

    let results = ledger.create_transfers(&[Transfer::new(
        TransferId::generate(),
        id1,
        id2,
        10,
        LedgerId(1),
    )]);
    assert_eq!(results, vec![Ok(())]);

    let accounts = ledger.lookup_accounts(&[id1, id2]);
    assert_eq!(accounts.len(), 2);
    for account in accounts {
        if account.id() == id1 {
            assert_eq!(account.debits_posted(), 10, "account 1 debits");
            assert_eq!(account.credits_posted(), 0, "account 1 credits");
            assert_eq!(account.balance(), Ok(10));
        } else if account.id() == id2 {
            assert_eq!(account.debits_posted(), 0, "account 2 debits");
            assert_eq!(account.credits_posted(), 10, "account 2 credits");
            assert_eq!(account.balance(), Ok(10));
        } else {
            panic!("unexpected account {}", account.id());
        }
    }
}

#[test]
fn new_accounts_start_at_zero() {
    let ledger = ledger_with_accounts(&[make_account(1, 1, AccountCategory::Expense)]);
    let account = get(&ledger, 1);
    assert_eq!(account.debits_posted(), 0);
    assert_eq!(account.credits_posted(), 0);
    assert_eq!(account.code(), 500);
}

#[test]
fn duplicate_account_is_rejected_and_existing_unchanged() {
    let ledger = ledger_with_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(2, 1, AccountCategory::Income),
    ]);
    ledger.create_transfers(&[make_transfer(1, 1, 2, 25)]);

    let results = ledger.create_accounts(&[make_account(1, 7, AccountCategory::Equity)]);
    assert_eq!(results, vec![Err(LedgerError::DuplicateId)]);

    let account = get(&ledger, 1);
    assert_eq!(account.ledger(), LedgerId(1));
    assert_eq!(account.code(), 100);
    assert_eq!(account.debits_posted(), 25);
}

#[test]
fn batch_with_one_duplicate_keeps_the_rest() {
    let ledger = ledger_with_accounts(&[make_account(3, 1, AccountCategory::Asset)]);

    let batch: Vec<Account> = (1..=5)
        .map(|id| make_account(id, 1, AccountCategory::Liability))
        .collect();
    let results = ledger.create_accounts(&batch);

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 4);
    assert_eq!(
        batch_failures(&results).collect::<Vec<_>>(),
        vec![(2, &LedgerError::DuplicateId)]
    );

    let ids: Vec<AccountId> = (1..=5).map(AccountId).collect();
    assert_eq!(ledger.lookup_accounts(&ids).len(), 5);
    assert_eq!(ledger.account_count(), 5);
}

#[test]
fn duplicate_within_same_account_batch() {
    let ledger = Ledger::new();
    let results = ledger.create_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(1, 1, AccountCategory::Equity),
    ]);
    assert_eq!(results, vec![Ok(()), Err(LedgerError::DuplicateId)]);
    assert_eq!(get(&ledger, 1).code(), 100);
}

#[test]
fn transfer_to_missing_account_fails() {
    let ledger = ledger_with_accounts(&[make_account(1, 1, AccountCategory::Asset)]);

    let results = ledger.create_transfers(&[
        make_transfer(1, 1, 99, 10),
        make_transfer(2, 99, 1, 10),
    ]);
    assert_eq!(
        results,
        vec![Err(LedgerError::AccountNotFound), Err(LedgerError::AccountNotFound)]
    );
    assert_eq!(get(&ledger, 1).debits_posted(), 0);
    assert_eq!(get(&ledger, 1).credits_posted(), 0);
}

#[test]
fn transfer_to_same_account_fails() {
    let ledger = ledger_with_accounts(&[make_account(1, 1, AccountCategory::Asset)]);
    let results = ledger.create_transfers(&[make_transfer(1, 1, 1, 10)]);
    assert_eq!(results, vec![Err(LedgerError::SameAccount)]);
}

#[test]
fn transfer_across_ledgers_fails_and_mutates_nothing() {
    let ledger = ledger_with_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(2, 2, AccountCategory::Liability),
    ]);

    let results = ledger.create_transfers(&[make_transfer(1, 1, 2, 10)]);
    assert_eq!(results, vec![Err(LedgerError::LedgerMismatch)]);

    for id in [1, 2] {
        let account = get(&ledger, id);
        assert_eq!(account.debits_posted(), 0);
        assert_eq!(account.credits_posted(), 0);
    }
}

#[test]
fn zero_amount_transfer_fails() {
    let ledger = ledger_with_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(2, 1, AccountCategory::Asset),
    ]);
    let results = ledger.create_transfers(&[make_transfer(1, 1, 2, 0)]);
    assert_eq!(results, vec![Err(LedgerError::InvalidAmount)]);
}

#[test]
fn resubmitted_transfer_is_not_applied_twice() {
    let ledger = ledger_with_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(2, 1, AccountCategory::Liability),
    ]);

    assert_eq!(ledger.create_transfers(&[make_transfer(7, 1, 2, 10)]), vec![Ok(())]);
    assert_eq!(
        ledger.create_transfers(&[make_transfer(7, 1, 2, 10)]),
        vec![Err(LedgerError::DuplicateId)]
    );

    assert_eq!(get(&ledger, 1).debits_posted(), 10);
    assert_eq!(get(&ledger, 2).credits_posted(), 10);
    assert_eq!(ledger.transfer_count(), 1);
}

#[test]
fn transfers_in_a_batch_apply_in_order() {
    let ledger = ledger_with_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(2, 1, AccountCategory::Asset),
        make_account(3, 1, AccountCategory::Asset),
    ]);

    // Chain 1 -> 2 -> 3, then reuse the first ID in the same batch.
    let results = ledger.create_transfers(&[
        make_transfer(1, 1, 2, 50),
        make_transfer(2, 2, 3, 20),
        make_transfer(1, 3, 1, 5),
    ]);
    assert_eq!(results, vec![Ok(()), Ok(()), Err(LedgerError::DuplicateId)]);

    assert_eq!(get(&ledger, 1).balance(), Ok(50));
    assert_eq!(get(&ledger, 2).balance(), Ok(-30));
    assert_eq!(get(&ledger, 3).balance(), Ok(-20));

    let ids: Vec<u128> = ledger.transfers().iter().map(|t| t.id.0).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn failed_entry_does_not_block_siblings() {
    let ledger = ledger_with_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(2, 1, AccountCategory::Equity),
    ]);

    let results = ledger.create_transfers(&[
        make_transfer(1, 1, 2, 10),
        make_transfer(2, 1, 1, 10),
        make_transfer(3, 1, 2, 0),
        make_transfer(4, 2, 1, 4),
    ]);
    assert_eq!(
        results,
        vec![
            Ok(()),
            Err(LedgerError::SameAccount),
            Err(LedgerError::InvalidAmount),
            Ok(()),
        ]
    );
    assert_eq!(get(&ledger, 1).balance(), Ok(6));
    assert_eq!(get(&ledger, 2).balance(), Ok(6));
}

#[test]
fn lookup_returns_request_order_and_omits_missing() {
    let ledger = ledger_with_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(2, 1, AccountCategory::Asset),
        make_account(3, 1, AccountCategory::Asset),
    ]);

    let accounts = ledger.lookup_accounts(&[AccountId(3), AccountId(42), AccountId(1)]);
    let ids: Vec<AccountId> = accounts.iter().map(Account::id).collect();
    assert_eq!(ids, vec![AccountId(3), AccountId(1)]);

    assert!(ledger.lookup_accounts(&[]).is_empty());
}

#[test]
fn lookup_transfers_returns_accepted_only() {
    let ledger = ledger_with_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(2, 1, AccountCategory::Asset),
    ]);
    ledger.create_transfers(&[make_transfer(1, 1, 2, 10), make_transfer(2, 1, 1, 10)]);

    let transfers = ledger.lookup_transfers(&[TransferId(2), TransferId(1)]);
    assert_eq!(transfers, vec![make_transfer(1, 1, 2, 10)]);
}

#[test]
fn accounts_snapshot_in_creation_order() {
    let ledger = Ledger::new();
    ledger.create_accounts(&[
        make_account(30, 1, AccountCategory::Asset),
        make_account(10, 1, AccountCategory::Asset),
    ]);
    ledger.create_accounts(&[make_account(20, 1, AccountCategory::Asset)]);

    let ids: Vec<u128> = ledger.accounts().iter().map(|a| a.id().0).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[test]
fn totals_stay_balanced() {
    let ledger = ledger_with_accounts(&[
        make_account(1, 1, AccountCategory::Asset),
        make_account(2, 1, AccountCategory::Liability),
        make_account(3, 1, AccountCategory::Income),
    ]);
    ledger.create_transfers(&[
        make_transfer(1, 1, 2, 10),
        make_transfer(2, 2, 3, 7),
        make_transfer(3, 3, 1, 1),
    ]);

    let totals = ledger.totals();
    assert_eq!(totals.debits_posted, 18);
    assert_eq!(totals.credits_posted, 18);
    assert!(totals.is_balanced());
}
