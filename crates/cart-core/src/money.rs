//! Money type for representing prices.
//!
//! Uses an integer count of minor units (cents) so cart totals never pick up
//! floating-point drift. Catalog feeds that publish decimal prices are
//! converted once, at the boundary, with [`Money::from_decimal`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    BRL,
    JPY,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        self.format().0
    }

    /// Symbol printed before amounts.
    pub fn symbol(&self) -> &'static str {
        self.format().1
    }

    /// Digits after the decimal separator; JPY has none.
    pub fn decimal_places(&self) -> u32 {
        self.format().2
    }

    fn format(&self) -> (&'static str, &'static str, u32) {
        match self {
            Currency::USD => ("USD", "$", 2),
            Currency::EUR => ("EUR", "\u{20ac}", 2),
            Currency::GBP => ("GBP", "\u{00a3}", 2),
            Currency::BRL => ("BRL", "R$", 2),
            Currency::JPY => ("JPY", "\u{00a5}", 0),
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Amount of `currency` in minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Convert a decimal price in major units, rounding to the nearest
    /// minor unit.
    ///
    /// ```
    /// use cart_core::money::{Currency, Money};
    /// let price = Money::from_decimal(179.9, Currency::BRL);
    /// assert_eq!(price.amount_cents, 17990);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_cents = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Symbol and amount, e.g. `R$179.90`.
    pub fn display(&self) -> String {
        format!(
            "{}{}{}",
            self.sign(),
            self.currency.symbol(),
            self.unsigned_amount()
        )
    }

    /// Amount without the symbol, e.g. `-2.50`.
    pub fn display_amount(&self) -> String {
        format!("{}{}", self.sign(), self.unsigned_amount())
    }

    fn sign(&self) -> &'static str {
        if self.amount_cents < 0 {
            "-"
        } else {
            ""
        }
    }

    fn unsigned_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        let unit = self.currency.minor_per_major().unsigned_abs();
        let abs = self.amount_cents.unsigned_abs();

        if places == 0 {
            abs.to_string()
        } else {
            format!("{}.{:0places$}", abs / unit, abs % unit)
        }
    }

    /// Checked addition. `None` on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_add(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        let amount = self.amount_cents.checked_mul(factor)?;
        Some(Money::new(amount, self.currency))
    }

    /// Checked sum, starting from zero in `currency`.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
