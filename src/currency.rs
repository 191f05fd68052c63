// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::SplitError;

pub const BASE_CURRENCY: &str = "USD";

/// Rates are kept within 0.000001 ..= 1000000 units per base unit.
pub const MIN_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);
pub const MAX_RATE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub symbol: String,
    /// Units of this currency per one base unit.
    pub rate: Decimal,
}

/// Display conversion rates keyed by ISO code, in presentation order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrencyTable {
    entries: IndexMap<String, CurrencyInfo>,
}

static REFERENCE_RATES: Lazy<CurrencyTable> = Lazy::new(|| {
    let mut t = CurrencyTable::default();
    t.insert("USD", "$", Decimal::ONE);
    t.insert("CAD", "C$", Decimal::new(135, 2));
    t.insert("EUR", "€", Decimal::new(91, 2));
    t.insert("GBP", "£", Decimal::new(79, 2));
    t
});

impl CurrencyTable {
    /// USD 1.00, CAD 1.35, EUR 0.91, GBP 0.79.
    pub fn reference() -> Self {
        REFERENCE_RATES.clone()
    }

    pub fn insert(&mut self, code: &str, symbol: &str, rate: Decimal) {
        self.entries.insert(
            code.to_uppercase(),
            CurrencyInfo {
                symbol: symbol.to_string(),
                rate,
            },
        );
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyInfo> {
        self.entries.get(&code.to_uppercase())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CurrencyInfo)> {
        self.entries.iter()
    }

    pub fn codes(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Convert through the base unit. Display helper only.
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> Result<Decimal, SplitError> {
        let src = self
            .get(from)
            .ok_or_else(|| SplitError::UnknownCurrency(from.to_string()))?;
        let dst = self
            .get(to)
            .ok_or_else(|| SplitError::UnknownCurrency(to.to_string()))?;
        if src.rate.is_zero() {
            return Err(SplitError::InvalidRate(src.rate.to_string()));
        }
        amount
            .checked_div(src.rate)
            .and_then(|base| base.checked_mul(dst.rate))
            .ok_or_else(|| SplitError::AmountOutOfRange(amount.to_string()))
    }

    /// `$12.50`, or `XYZ 12.50` when the code has no symbol here.
    pub fn format(&self, amount: Decimal, code: &str) -> String {
        match self.get(code) {
            Some(info) if !info.symbol.is_empty() => {
                format!("{}{:.2}", info.symbol, round_money(amount))
            }
            _ => format!("{} {:.2}", code.to_uppercase(), round_money(amount)),
        }
    }
}

/// Round half away from zero to cents.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn normalize_code(raw: &str) -> Result<String, SplitError> {
    let code = raw.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(SplitError::InvalidCurrencyCode(raw.trim().to_string()))
    }
}

pub fn parse_rate(raw: &str) -> Result<Decimal, SplitError> {
    let s = raw.trim();
    match s.parse::<Decimal>() {
        Ok(r) if (MIN_RATE..=MAX_RATE).contains(&r) => Ok(r),
        _ => Err(SplitError::InvalidRate(s.to_string())),
    }
}
