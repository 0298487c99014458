use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::errors::{MortgageError, Result};
use crate::formatting;
use crate::parsing;
use crate::types::RoundingMode;

const CENTS_PER_DOLLAR: Decimal = dec!(100);
const BPS_PER_UNIT: Decimal = dec!(10000);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// arithmetic settings shared by every calculation of one calculator instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalContext {
    /// significant digits kept after division and exponentiation
    pub precision: u32,
    pub rounding: RoundingMode,
}

impl DecimalContext {
    pub const MAX_PRECISION: u32 = 28;

    pub fn new(precision: u32, rounding: RoundingMode) -> Result<Self> {
        if precision == 0 || precision > Self::MAX_PRECISION {
            return Err(MortgageError::InvalidConfiguration {
                message: format!(
                    "decimal precision must be between 1 and {}, got {}",
                    Self::MAX_PRECISION,
                    precision
                ),
            });
        }
        Ok(Self { precision, rounding })
    }

    /// reduce an intermediate value to the configured significant digits
    pub fn normalize(&self, value: Decimal) -> Decimal {
        value
            .round_sf_with_strategy(self.precision, self.rounding.strategy())
            .unwrap_or(value)
    }

    /// divide and normalize
    pub fn div(&self, numerator: Decimal, denominator: Decimal) -> Decimal {
        self.normalize(numerator / denominator)
    }

    /// integer power by repeated squaring, normalized after every step
    ///
    /// saturates at `Decimal::MAX` for bases of at least one
    pub fn powu(&self, base: Decimal, exponent: u32) -> Decimal {
        let mut result = Decimal::ONE;
        let mut factor = base;
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                match result.checked_mul(factor) {
                    Some(product) => result = self.normalize(product),
                    None => return Decimal::MAX,
                }
            }
            remaining >>= 1;
            if remaining > 0 {
                match factor.checked_mul(factor) {
                    Some(square) => factor = self.normalize(square),
                    None => return Decimal::MAX,
                }
            }
        }
        result
    }

    /// round to a whole number using the configured mode
    pub fn round_integer(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(0, self.rounding.strategy())
    }

    /// round to whole cents, saturating at the i64 range
    pub fn round_money(&self, cents: Decimal) -> Money {
        let rounded = self.round_integer(cents);
        Money(rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        }))
    }

    /// round to `dp` decimal places using the configured mode
    pub fn round_dp(&self, value: Decimal, dp: u32) -> Decimal {
        value.round_dp_with_strategy(dp, self.rounding.strategy())
    }
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self {
            precision: 20,
            rounding: RoundingMode::HalfUp,
        }
    }
}

/// currency amount held as whole cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// create from minor units
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// create from whole dollars
    pub const fn from_dollars_whole(dollars: i64) -> Self {
        Money(dollars * 100)
    }

    /// create from a dollar amount, rounding half-up to the cent
    pub fn from_dollars(dollars: Decimal) -> Result<Self> {
        dollars_to_cents(dollars)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    /// dollar value, unrounded
    pub fn to_dollars(&self) -> Decimal {
        cents_to_dollars(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&formatting::format_currency(*self))
    }
}

impl FromStr for Money {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self> {
        let amount = parsing::clean_currency_text(s).ok_or_else(|| MortgageError::InvalidCurrency {
            input: s.to_string(),
        })?;
        dollars_to_cents(amount)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, other: i64) -> Money {
        Money(self.0.saturating_mul(other))
    }
}

/// annual interest rate held as whole basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Rate(i64);

impl Rate {
    pub const ZERO: Rate = Rate(0);

    /// create from basis points (e.g., 625 for 6.25%)
    pub const fn from_bps(bps: i64) -> Self {
        Rate(bps)
    }

    /// create from a fraction (e.g., 0.0625), rounding half-up to the basis point
    pub fn from_fraction(fraction: Decimal) -> Result<Self> {
        rate_to_basis_points(fraction)
    }

    pub fn bps(&self) -> i64 {
        self.0
    }

    /// annual rate as a fraction
    pub fn as_fraction(&self) -> Decimal {
        basis_points_to_rate(self.0)
    }

    /// annual rate as a percentage (e.g., 6.25)
    pub fn as_percentage(&self) -> Decimal {
        Decimal::from(self.0) / CENTS_PER_DOLLAR
    }

    /// monthly rate as a fraction, at full context precision
    pub fn monthly(&self, ctx: &DecimalContext) -> Decimal {
        ctx.div(self.as_fraction(), MONTHS_PER_YEAR)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&formatting::format_percentage(*self, 2))
    }
}

impl FromStr for Rate {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self> {
        let value = parsing::clean_percentage_text(s).ok_or_else(|| MortgageError::InvalidPercentage {
            input: s.to_string(),
        })?;
        let fraction = if value < Decimal::ONE {
            value
        } else {
            value / CENTS_PER_DOLLAR
        };
        rate_to_basis_points(fraction)
    }
}

/// bps / 10000, exact
pub fn basis_points_to_rate(bps: i64) -> Decimal {
    Decimal::from(bps) / BPS_PER_UNIT
}

/// fraction * 10000, rounded half-up
pub fn rate_to_basis_points(fraction: Decimal) -> Result<Rate> {
    let bps = fraction
        .checked_mul(BPS_PER_UNIT)
        .ok_or(MortgageError::AmountOutOfRange { value: fraction })?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    bps.to_i64()
        .map(Rate)
        .ok_or(MortgageError::AmountOutOfRange { value: fraction })
}

/// dollars * 100, rounded half-up
pub fn dollars_to_cents(dollars: Decimal) -> Result<Money> {
    let cents = dollars
        .checked_mul(CENTS_PER_DOLLAR)
        .ok_or(MortgageError::AmountOutOfRange { value: dollars })?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    cents
        .to_i64()
        .map(Money)
        .ok_or(MortgageError::AmountOutOfRange { value: dollars })
}

/// cents / 100, unrounded
pub fn cents_to_dollars(cents: i64) -> Decimal {
    Decimal::from(cents) / CENTS_PER_DOLLAR
}
