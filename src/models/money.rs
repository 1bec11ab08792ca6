//! Money type for representing currency amounts
//!
//! Amounts are exact decimals paired with an ISO-style currency code. Two
//! amounts only combine or compare within the same currency; any attempt
//! across currencies yields [`LogbookError::CurrencyMismatch`] instead of
//! converting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use crate::error::{LogbookError, LogbookResult};

/// A three-letter upper-case currency code such as `EUR`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Create a currency from its code, normalizing to upper case
    pub fn new(code: &str) -> LogbookResult<Self> {
        let code = code.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LogbookError::InvalidCurrency(code));
        }
        Ok(Self(code))
    }

    /// Euro, the default currency of new settings
    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    /// Get the currency code
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Currency {
    type Err = LogbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = LogbookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

/// A monetary amount in a single currency
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Create a Money amount
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a zero amount in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Get the decimal amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Get the currency
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Check whether `other` uses the same currency
    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency == other.currency
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Check if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self::new(self.amount.abs(), self.currency.clone())
    }

    /// Add two amounts of the same currency
    pub fn checked_add(&self, other: &Money) -> LogbookResult<Money> {
        self.ensure_same_currency(other)?;
        Ok(Self::new(self.amount + other.amount, self.currency.clone()))
    }

    /// Subtract an amount of the same currency
    pub fn checked_sub(&self, other: &Money) -> LogbookResult<Money> {
        self.ensure_same_currency(other)?;
        Ok(Self::new(self.amount - other.amount, self.currency.clone()))
    }

    /// Compare two amounts of the same currency
    pub fn checked_cmp(&self, other: &Money) -> LogbookResult<Ordering> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    fn ensure_same_currency(&self, other: &Money) -> LogbookResult<()> {
        if self.same_currency(other) {
            Ok(())
        } else {
            Err(LogbookError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            })
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts `"10.50 EUR"`, `"-3 USD"` and `"EUR 10.50"`.
    pub fn parse(s: &str) -> LogbookResult<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let (amount, code) = match parts.as_slice() {
            [amount, code] if Decimal::from_str(amount).is_ok() => (*amount, *code),
            [code, amount] => (*amount, *code),
            _ => return Err(LogbookError::InvalidMoney(s.to_string())),
        };

        let amount =
            Decimal::from_str(amount).map_err(|_| LogbookError::InvalidMoney(s.to_string()))?;
        Ok(Self::new(amount, Currency::new(code)?))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}

impl FromStr for Money {
    type Err = LogbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur(amount: Decimal) -> Money {
        Money::new(amount, Currency::new("EUR").unwrap())
    }

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::new("USD").unwrap())
    }

    #[test]
    fn test_currency_normalization() {
        assert_eq!(Currency::new(" eur ").unwrap().code(), "EUR");
        assert!(Currency::new("EURO").is_err());
        assert!(Currency::new("E1R").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(eur(dec!(10.5)).to_string(), "10.50 EUR");
        assert_eq!(usd(dec!(-3)).to_string(), "-3.00 USD");
    }

    #[test]
    fn test_same_currency_arithmetic() {
        let a = eur(dec!(10.00));
        let b = eur(dec!(2.50));

        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(12.50));
        assert_eq!(a.checked_sub(&b).unwrap().amount(), dec!(7.50));
        assert_eq!(a.checked_cmp(&b).unwrap(), Ordering::Greater);
        assert_eq!((-a).amount(), dec!(-10.00));
    }

    #[test]
    fn test_cross_currency_arithmetic_fails() {
        let a = eur(dec!(10));
        let b = usd(dec!(10));

        assert!(matches!(
            a.checked_add(&b),
            Err(LogbookError::CurrencyMismatch { .. })
        ));
        assert!(a.checked_cmp(&b).is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50 EUR").unwrap(), eur(dec!(10.50)));
        assert_eq!(Money::parse("USD -3").unwrap(), usd(dec!(-3)));
        assert!(Money::parse("10.50").is_err());
        assert!(Money::parse("ten EUR").is_err());
    }

    #[test]
    fn test_is_checks() {
        assert!(eur(dec!(0)).is_zero());
        assert!(eur(dec!(1)).is_positive());
        assert!(eur(dec!(-1)).is_negative());
        assert_eq!(eur(dec!(-4)).abs(), eur(dec!(4)));
    }

    #[test]
    fn test_serialization() {
        let m = eur(dec!(10.50));
        let json = serde_json::to_string(&m).unwrap();
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);

        let from_number: Money =
            serde_json::from_str(r#"{"amount": -12.5, "currency": "usd"}"#).unwrap();
        assert_eq!(from_number, usd(dec!(-12.5)));
    }
}
