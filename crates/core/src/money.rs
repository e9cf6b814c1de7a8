//! Monetary amounts in minor currency units.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// An exact, non-negative monetary amount in minor currency units (cents).
///
/// Arithmetic is checked; callers decide how to surface overflow. The wire
/// form is the raw minor-unit count, the display form is the canonical
/// two-decimal rendering ("199.98").
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked multiplication by a quantity; `None` on overflow.
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(u64::from(quantity)).map(Money)
    }

    /// Parse a decimal amount with at most two fraction digits ("100",
    /// "99.9", "99.99"). Negative and malformed amounts are rejected.
    pub fn parse_decimal(s: &str) -> DomainResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::validation("amount must not be empty"));
        }
        let (units, fraction, has_dot) = match s.split_once('.') {
            Some((units, fraction)) => (units, fraction, true),
            None => (s, "", false),
        };
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(units) || (has_dot && !digits(fraction)) || fraction.len() > 2 {
            return Err(DomainError::validation(format!("malformed amount: {}", s)));
        }
        let out_of_range = || DomainError::validation(format!("amount out of range: {}", s));
        let units: u64 = units.parse().map_err(|_| out_of_range())?;
        let fraction_cents = match fraction.len() {
            1 => fraction_digits(fraction) * 10,
            2 => fraction_digits(fraction),
            _ => 0,
        };
        units
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction_cents))
            .map(Money)
            .ok_or_else(out_of_range)
    }
}

fn fraction_digits(fraction: &str) -> u64 {
    fraction
        .bytes()
        .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}
