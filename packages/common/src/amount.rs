//! Arbitrary-precision token amounts
//!
//! Token supplies on IBC-connected chains routinely exceed 64 bits (18-decimal
//! assets) and ppm-scaled products exceed 128 bits, so capacities, baselines
//! and packet amounts are carried as unbounded unsigned integers. On the wire
//! and in storage they are encoded as decimal strings, like `Uint128`.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use cosmwasm_std::{StdError, StdResult, Uint128};
use num_bigint::BigUint;
use num_traits::{Num, Zero};
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Non-negative integer of unbounded size.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigAmount(BigUint);

impl BigAmount {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn into_inner(self) -> BigUint {
        self.0
    }

    /// Returns `None` when `other` is larger than `self`.
    pub fn checked_sub(&self, other: &BigAmount) -> Option<BigAmount> {
        if self.0 < other.0 {
            None
        } else {
            Some(Self(&self.0 - &other.0))
        }
    }

    /// Parse an amount the way the transfer module does (Go `big.Int`
    /// base 0): `0x` / `0o` / `0b` select hex, octal and binary, a bare
    /// leading `0` also selects octal, anything else is decimal. Underscores
    /// may separate digits, or follow a base prefix.
    ///
    /// Signs are rejected; an amount is never negative.
    pub fn parse_prefixed(s: &str) -> StdResult<Self> {
        let (prefix_len, radix) = match s.get(..2) {
            Some("0x") | Some("0X") => (2, 16),
            Some("0o") | Some("0O") => (2, 8),
            Some("0b") | Some("0B") => (2, 2),
            _ if s.len() > 1 && s.starts_with('0') => (1, 8),
            _ => (0, 10),
        };
        let digits = strip_separators(s, &s[prefix_len..], prefix_len > 0)?;
        parse_digits(s, &digits, radix)
    }
}

/// Remove `_` separators. One may follow a base prefix; otherwise each must
/// sit between two digits.
fn strip_separators(original: &str, digits: &str, prefixed: bool) -> StdResult<String> {
    if !digits.contains('_') {
        return Ok(digits.to_string());
    }
    let misplaced = digits.ends_with('_')
        || digits.contains("__")
        || (digits.starts_with('_') && !prefixed);
    if misplaced {
        return Err(StdError::generic_err(format!(
            "invalid amount '{}': misplaced digit separator",
            original
        )));
    }
    Ok(digits.replace('_', ""))
}

fn parse_digits(original: &str, digits: &str, radix: u32) -> StdResult<BigAmount> {
    if digits.is_empty() || digits.starts_with('+') || digits.starts_with('-') {
        return Err(StdError::generic_err(format!(
            "invalid amount '{}': expected unsigned integer",
            original
        )));
    }
    BigUint::from_str_radix(digits, radix)
        .map(BigAmount)
        .map_err(|e| StdError::generic_err(format!("invalid amount '{}': {}", original, e)))
}

impl FromStr for BigAmount {
    type Err = StdError;

    /// Decimal only; this is the storage encoding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_digits(s, s, 10)
    }
}

impl fmt::Display for BigAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<BigUint> for BigAmount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u128> for BigAmount {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u64> for BigAmount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<Uint128> for BigAmount {
    fn from(value: Uint128) -> Self {
        Self(BigUint::from(value.u128()))
    }
}

impl Add<&BigAmount> for &BigAmount {
    type Output = BigAmount;

    fn add(self, rhs: &BigAmount) -> BigAmount {
        BigAmount(&self.0 + &rhs.0)
    }
}

impl AddAssign<&BigAmount> for BigAmount {
    fn add_assign(&mut self, rhs: &BigAmount) {
        self.0 += &rhs.0;
    }
}

impl Serialize for BigAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for BigAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigAmount::from_str(&s).map_err(de::Error::custom)
    }
}

impl JsonSchema for BigAmount {
    fn schema_name() -> String {
        "BigAmount".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}
