// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::currency::CurrencyTable;
use crate::models::{Balances, CurrencyAmount, Settlement};

/// Balances and transfers at or below one cent are treated as settled.
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Greedy debtor/creditor matching over the balance map.
///
/// Debtors and creditors are each visited in the map's order, which is
/// member list order. Every debtor pays creditors front to back until their
/// debt is gone. This does not always find the fewest transfers, but it
/// never overpays a creditor and always clears every balance.
pub fn compute_settlements(balances: &Balances, currencies: &CurrencyTable) -> Vec<Settlement> {
    let open: Vec<(&String, Decimal)> = balances
        .iter()
        .filter(|(_, b)| b.abs() > EPSILON)
        .map(|(n, b)| (n, *b))
        .collect();
    let debtors: Vec<(&String, Decimal)> = open
        .iter()
        .filter(|(_, b)| b.is_sign_negative())
        .copied()
        .collect();
    let mut creditors: Vec<(&String, Decimal)> = open
        .iter()
        .filter(|(_, b)| b.is_sign_positive())
        .copied()
        .collect();

    let mut out = Vec::new();
    for (debtor, balance) in debtors {
        let mut remaining = -balance;
        for (creditor, credit) in creditors.iter_mut() {
            if remaining <= Decimal::ZERO {
                break;
            }
            if *credit <= Decimal::ZERO {
                continue;
            }
            let amount = remaining.min(*credit);
            if amount > EPSILON {
                out.push(Settlement {
                    from: debtor.clone(),
                    to: (*creditor).clone(),
                    amount,
                    amounts: display_amounts(amount, currencies),
                });
            }
            remaining -= amount;
            *credit -= amount;
        }
    }
    tracing::debug!(
        open = open.len(),
        transfers = out.len(),
        "computed settlements"
    );
    out
}

fn display_amounts(amount: Decimal, currencies: &CurrencyTable) -> Vec<CurrencyAmount> {
    currencies
        .iter()
        .map(|(code, info)| CurrencyAmount {
            currency: code.clone(),
            amount: amount * info.rate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(&str, Decimal)]) -> Balances {
        entries.iter().map(|(n, b)| (n.to_string(), *b)).collect()
    }

    #[test]
    fn epsilon_is_one_cent() {
        assert_eq!(EPSILON, Decimal::new(1, 2));
    }

    #[test]
    fn single_debtor_single_creditor() {
        let b = balances(&[("Alice", Decimal::from(50)), ("Bob", Decimal::from(-50))]);
        let s = compute_settlements(&b, &CurrencyTable::reference());
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].from, "Bob");
        assert_eq!(s[0].to, "Alice");
        assert_eq!(s[0].amount, Decimal::from(50));
        let cad = s[0].amounts.iter().find(|a| a.currency == "CAD").unwrap();
        assert_eq!(cad.amount, Decimal::new(675, 1));
    }

    #[test]
    fn debtor_spreads_over_creditors_in_order() {
        let b = balances(&[
            ("A", Decimal::from(20)),
            ("B", Decimal::from(-50)),
            ("C", Decimal::from(30)),
        ]);
        let s = compute_settlements(&b, &CurrencyTable::default());
        let pairs: Vec<_> = s
            .iter()
            .map(|t| (t.from.as_str(), t.to.as_str(), t.amount))
            .collect();
        assert_eq!(
            pairs,
            vec![("B", "A", Decimal::from(20)), ("B", "C", Decimal::from(30))]
        );
        assert!(s[0].amounts.is_empty());
    }

    #[test]
    fn negligible_balances_are_ignored() {
        let b = balances(&[
            ("A", Decimal::new(5, 3)),
            ("B", Decimal::new(-5, 3)),
        ]);
        assert!(compute_settlements(&b, &CurrencyTable::reference()).is_empty());
    }

    #[test]
    fn tiny_remainders_are_not_emitted() {
        // B's debt exceeds A's credit by less than a cent.
        let b = balances(&[
            ("A", Decimal::new(1000, 2)),
            ("B", Decimal::new(-1001, 2)),
            ("C", Decimal::new(1, 2)),
        ]);
        let s = compute_settlements(&b, &CurrencyTable::reference());
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].amount, Decimal::from(10));
    }
}
