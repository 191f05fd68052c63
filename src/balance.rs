// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::models::{Balances, Expense, Member};

/// Net balance of every named member.
///
/// Each expense is divided by the number of members in the group *now*,
/// placeholders included, not by the members present when it was logged.
/// Adding or removing a member therefore re-splits every past expense.
// NOTE: kept for parity with existing groups; storing the split set per
// expense would change historic balances and needs a migration.
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> Balances {
    let mut balances = Balances::new();
    for m in members.iter().filter(|m| m.is_named()) {
        balances.entry(m.name.clone()).or_insert(Decimal::ZERO);
    }
    if members.is_empty() {
        tracing::debug!("no members, skipping {} expenses", expenses.len());
        return balances;
    }

    let head_count = Decimal::from(members.len());
    for expense in expenses {
        let amount = expense.amount.value();
        let split = amount / head_count;
        tracing::debug!(
            expense = expense.id,
            %amount,
            %split,
            payer = %expense.paid_by,
            "splitting expense"
        );
        for m in members.iter().filter(|m| m.is_named()) {
            let entry = balances.entry(m.name.clone()).or_insert(Decimal::ZERO);
            if m.name == expense.paid_by {
                *entry += amount - split;
            } else {
                *entry -= split;
            }
        }
    }
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Amount;
    use chrono::NaiveDate;

    fn members(names: &[&str]) -> Vec<Member> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Member::new(i as i64 + 1, n))
            .collect()
    }

    fn expense(id: i64, amount: i64, paid_by: &str) -> Expense {
        Expense {
            id,
            amount: Amount::new(Decimal::from(amount)).unwrap(),
            currency: "USD".into(),
            description: "dinner".into(),
            category: "Food & Drinks".into(),
            paid_by: paid_by.into(),
            created_at: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn two_members_split_evenly() {
        let b = compute_balances(&members(&["Alice", "Bob"]), &[expense(1, 100, "Alice")]);
        assert_eq!(b["Alice"], Decimal::from(50));
        assert_eq!(b["Bob"], Decimal::from(-50));
    }

    #[test]
    fn placeholder_counts_toward_split_but_has_no_balance() {
        let b = compute_balances(&members(&["A", "", "B"]), &[expense(1, 90, "A")]);
        assert_eq!(b.len(), 2);
        assert_eq!(b["A"], Decimal::from(60));
        assert_eq!(b["B"], Decimal::from(-30));
    }

    #[test]
    fn keeps_member_order() {
        let b = compute_balances(&members(&["Zoe", "Adam", "Max"]), &[]);
        let keys: Vec<_> = b.keys().cloned().collect();
        assert_eq!(keys, vec!["Zoe", "Adam", "Max"]);
        assert!(b.values().all(|v| v.is_zero()));
    }

    #[test]
    fn no_members_gives_empty_map() {
        assert!(compute_balances(&[], &[expense(1, 10, "Ghost")]).is_empty());
    }

    #[test]
    fn orphaned_payer_only_debits() {
        let b = compute_balances(&members(&["A", "B"]), &[expense(1, 10, "Carol")]);
        assert_eq!(b["A"], Decimal::from(-5));
        assert_eq!(b["B"], Decimal::from(-5));
    }
}
