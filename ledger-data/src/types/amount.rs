// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::cmp::Ordering;
use std::fmt;
use std::io::Write;

use serde_json::{Value as Json, json};

use super::{AccountId, Currency, Issue};
use crate::{BinaryParser, Error, Result, Serializable};

pub(crate) const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
pub(crate) const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
const MIN_EXPONENT: i32 = -96;
const MAX_EXPONENT: i32 = 80;
const ZERO_EXPONENT: i32 = -100;
const EXPONENT_BIAS: i32 = 97;

/// Largest native amount, in drops.
pub const MAX_NATIVE_DROPS: u64 = 100_000_000_000_000_000;

const NOT_NATIVE_BIT: u64 = 1 << 63;
const POSITIVE_BIT: u64 = 1 << 62;
const MANTISSA_MASK: u64 = (1 << 54) - 1;

/// A native amount counted in drops, or an issued amount kept as a
/// normalized decimal `mantissa * 10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Amount {
    mantissa: u64,
    exponent: i32,
    negative: bool,
    issue: Issue,
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero(Issue::native())
    }
}

impl Amount {
    pub fn zero(issue: Issue) -> Self {
        let exponent = if issue.is_native() { 0 } else { ZERO_EXPONENT };
        Self {
            mantissa: 0,
            exponent,
            negative: false,
            issue,
        }
    }

    pub fn from_drops(drops: i64) -> Result<Self> {
        Self::native(drops.unsigned_abs(), drops < 0)
    }

    fn native(drops: u64, negative: bool) -> Result<Self> {
        if drops > MAX_NATIVE_DROPS {
            return Err(Error::InvalidAmount(format!(
                "{drops} drops exceeds the native maximum"
            )));
        }
        Ok(Self {
            mantissa: drops,
            exponent: 0,
            negative: negative && drops != 0,
            issue: Issue::native(),
        })
    }

    /// Builds an issued amount, normalizing the mantissa by truncation.
    pub fn issued(
        mantissa: u64,
        exponent: i32,
        negative: bool,
        issue: Issue,
    ) -> Result<Self> {
        if issue.is_native() {
            return Err(Error::InvalidAmount(
                "issued amount cannot use the native currency".into(),
            ));
        }
        let Some((mantissa, exponent)) = canonicalize(mantissa, exponent)?
        else {
            return Ok(Self::zero(issue));
        };
        Ok(Self {
            mantissa,
            exponent,
            negative,
            issue,
        })
    }

    /// Parses the value text of an amount: drops for the native issue, a
    /// decimal (optionally with an `e` exponent) otherwise.
    pub fn parse(value: &str, issue: Issue) -> Result<Self> {
        if issue.is_native() {
            let (negative, digits) = split_sign(value);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(Error::InvalidAmount(format!(
                    "`{value}` is not a drops amount"
                )));
            }
            let drops: u64 = digits.parse().map_err(|_| {
                Error::InvalidAmount(format!("`{value}` is out of range"))
            })?;
            return Self::native(drops, negative);
        }
        let (mantissa, exponent, negative) = parse_decimal(value)?;
        Self::issued(mantissa, exponent, negative, issue)
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_native(&self) -> bool {
        self.issue.is_native()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn issue(&self) -> Issue {
        self.issue
    }

    pub fn currency(&self) -> Currency {
        self.issue.currency
    }

    pub fn issuer(&self) -> AccountId {
        self.issue.issuer
    }

    /// Signed drop count of a native amount.
    pub fn drops(&self) -> Option<i64> {
        self.is_native().then(|| self.signed_mantissa() as i64)
    }

    pub fn negate(&self) -> Self {
        Self {
            negative: !self.negative && !self.is_zero(),
            ..*self
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            ..*self
        }
    }

    /// The same value owed by another issuer. Native amounts are returned
    /// unchanged.
    pub fn with_issuer(&self, issuer: AccountId) -> Self {
        if self.is_native() {
            return *self;
        }
        Self {
            issue: Issue::new(self.issue.currency, issuer),
            ..*self
        }
    }

    /// `(mantissa, exponent)` in whole units; native amounts count
    /// `drops * 10^-6`.
    pub(crate) fn unit_parts(&self) -> (u64, i32) {
        if self.is_native() {
            (self.mantissa, -6)
        } else {
            (self.mantissa, self.exponent)
        }
    }

    /// `(mantissa, exponent)` with native amounts counted in drops.
    pub(crate) fn raw_parts(&self) -> (u64, i32) {
        (self.mantissa, self.exponent)
    }

    fn signed_mantissa(&self) -> i128 {
        if self.negative {
            -(self.mantissa as i128)
        } else {
            self.mantissa as i128
        }
    }

    fn check_comparable(&self, other: &Amount) -> Result<()> {
        if self.is_native() != other.is_native() {
            return Err(Error::InvalidAmount(
                "cannot mix native and issued amounts".into(),
            ));
        }
        if self.issue.currency != other.issue.currency {
            return Err(Error::InvalidAmount(format!(
                "currency mismatch: {} and {}",
                self.issue.currency, other.issue.currency
            )));
        }
        Ok(())
    }

    /// Sum of two amounts of the same currency. The result keeps the issue
    /// of `self`.
    pub fn checked_add(&self, other: &Amount) -> Result<Amount> {
        self.check_comparable(other)?;

        if self.is_native() {
            let sum = self.signed_mantissa() + other.signed_mantissa();
            let drops = u64::try_from(sum.unsigned_abs()).map_err(|_| {
                Error::InvalidAmount("native amount overflow".into())
            })?;
            return Self::native(drops, sum < 0);
        }
        if other.is_zero() {
            return Ok(*self);
        }
        if self.is_zero() {
            return Ok(Self {
                issue: self.issue,
                ..*other
            });
        }

        let (mut m1, mut e1) = (self.signed_mantissa(), self.exponent);
        let (mut m2, mut e2) = (other.signed_mantissa(), other.exponent);
        while e1 < e2 {
            m1 /= 10;
            e1 += 1;
        }
        while e2 < e1 {
            m2 /= 10;
            e2 += 1;
        }
        let sum = m1 + m2;
        Self::issued(sum.unsigned_abs() as u64, e1, sum < 0, self.issue)
    }

    pub fn checked_sub(&self, other: &Amount) -> Result<Amount> {
        self.checked_add(&other.negate())
    }

    /// Value ordering of two amounts of the same currency.
    pub fn compare(&self, other: &Amount) -> Result<Ordering> {
        self.check_comparable(other)?;

        if self.is_native() {
            return Ok(self.signed_mantissa().cmp(&other.signed_mantissa()));
        }
        let sign = |a: &Amount| match (a.is_zero(), a.negative) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        };
        let (s1, s2) = (sign(self), sign(other));
        if s1 != s2 || s1 == 0 {
            return Ok(s1.cmp(&s2));
        }
        let magnitude =
            (self.exponent, self.mantissa)
                .cmp(&(other.exponent, other.mantissa));
        Ok(if self.negative {
            magnitude.reverse()
        } else {
            magnitude
        })
    }

    /// Value text: drops for native amounts, plain decimal otherwise.
    pub fn value_string(&self) -> String {
        if self.is_native() {
            return self.signed_mantissa().to_string();
        }
        if self.is_zero() {
            return "0".into();
        }
        format_decimal(self.mantissa, self.exponent, self.negative)
    }

    pub fn to_json(&self) -> Json {
        if self.is_native() {
            return Json::String(self.value_string());
        }
        json!({
            "currency": self.issue.currency.to_string(),
            "issuer": self.issue.issuer.to_address(),
            "value": self.value_string(),
        })
    }

    pub fn from_json(value: &Json, path: &str) -> Result<Self> {
        match value {
            Json::String(drops) => Self::parse(drops, Issue::native()),
            Json::Number(n) => Self::parse(&n.to_string(), Issue::native()),
            Json::Object(map) => {
                let text = |key: &str| match map.get(key) {
                    Some(Json::String(s)) => Ok(s.clone()),
                    Some(Json::Number(n)) => Ok(n.to_string()),
                    _ => Err(Error::json(
                        format!("{path}.{key}"),
                        "expected a string",
                    )),
                };
                let currency = Currency::parse(&text("currency")?)?;
                if currency.is_native() {
                    return Err(Error::json(
                        path,
                        "native amounts are written as a drops string",
                    ));
                }
                let issuer = AccountId::parse(&text("issuer")?)?;
                Self::parse(&text("value")?, Issue::new(currency, issuer))
            }
            _ => Err(Error::json(path, "expected an amount")),
        }
    }
}

/// Normalizes the mantissa into `[10^15, 10^16)`. `None` is zero.
pub(crate) fn canonicalize(
    mantissa: u64,
    exponent: i32,
) -> Result<Option<(u64, i32)>> {
    if mantissa == 0 {
        return Ok(None);
    }
    let overflow = || {
        Error::InvalidAmount(format!("exponent {exponent} is out of range"))
    };
    let (mut mantissa, mut exponent) = (mantissa, exponent);
    while mantissa < MIN_MANTISSA {
        mantissa *= 10;
        exponent = exponent.checked_sub(1).ok_or_else(overflow)?;
    }
    while mantissa > MAX_MANTISSA {
        mantissa /= 10;
        exponent = exponent.checked_add(1).ok_or_else(overflow)?;
    }
    if exponent < MIN_EXPONENT {
        return Ok(None);
    }
    if exponent > MAX_EXPONENT {
        return Err(Error::InvalidAmount(format!(
            "exponent {exponent} overflows"
        )));
    }
    Ok(Some((mantissa, exponent)))
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    }
}

/// Largest `e` exponent accepted in amount text.
const MAX_TEXT_EXPONENT: i32 = 512;

// Digits past the first 17 significant ones are truncated.
fn parse_decimal(text: &str) -> Result<(u64, i32, bool)> {
    const LIMIT: u64 = 100_000_000_000_000_000;

    let invalid = || Error::InvalidAmount(format!("`{text}` is not a decimal"));
    let (negative, body) = split_sign(text);
    let (number, mut exponent) = match body.find(['e', 'E']) {
        Some(at) => {
            let exponent: i32 =
                body[at + 1..].parse().map_err(|_| invalid())?;
            if !(-MAX_TEXT_EXPONENT..=MAX_TEXT_EXPONENT).contains(&exponent) {
                return Err(Error::InvalidAmount(format!(
                    "`{text}` has an exponent out of range"
                )));
            }
            (&body[..at], exponent)
        }
        None => (body, 0),
    };
    let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }

    let mut mantissa: u64 = 0;
    for c in int_part.chars() {
        let digit = c.to_digit(10).ok_or_else(invalid)? as u64;
        if mantissa < LIMIT {
            mantissa = mantissa * 10 + digit;
        } else {
            exponent = exponent.checked_add(1).ok_or_else(invalid)?;
        }
    }
    for c in frac_part.chars() {
        let digit = c.to_digit(10).ok_or_else(invalid)? as u64;
        if mantissa < LIMIT {
            mantissa = mantissa * 10 + digit;
            exponent = exponent.checked_sub(1).ok_or_else(invalid)?;
        }
    }
    Ok((mantissa, exponent, negative && mantissa != 0))
}

/// Plain decimal text of `mantissa * 10^exponent` with trailing zeros
/// removed.
pub(crate) fn format_decimal(
    mantissa: u64,
    exponent: i32,
    negative: bool,
) -> String {
    let digits = mantissa.to_string();
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if exponent >= 0 {
        out.push_str(&digits);
        out.push_str(&"0".repeat(exponent as usize));
        return out;
    }

    let point = digits.len() as i64 + exponent as i64;
    let (int_part, frac_part) = if point > 0 {
        let (i, f) = digits.split_at(point as usize);
        (i.to_string(), f.to_string())
    } else {
        ("0".to_string(), "0".repeat((-point) as usize) + &digits)
    };
    out.push_str(&int_part);
    let frac_part = frac_part.trim_end_matches('0');
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "{}", self.value_string())
        } else {
            write!(f, "{}/{}", self.value_string(), self.issue)
        }
    }
}

impl Serializable for Amount {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        let positive = if self.negative { 0 } else { POSITIVE_BIT };
        if self.is_native() {
            w.write_all(&(self.mantissa | positive).to_be_bytes())?;
            return Ok(());
        }

        let bits = if self.is_zero() {
            NOT_NATIVE_BIT
        } else {
            let exponent = (self.exponent + EXPONENT_BIAS) as u64;
            NOT_NATIVE_BIT | positive | (exponent << 54) | self.mantissa
        };
        w.write_all(&bits.to_be_bytes())?;
        self.issue.currency.write(w)?;
        self.issue.issuer.write(w)?;
        Ok(())
    }

    fn read(parser: &mut BinaryParser<'_>) -> Result<Self> {
        let offset = parser.position();
        let bits = parser.read_u64_be()?;
        let positive = bits & POSITIVE_BIT != 0;

        if bits & NOT_NATIVE_BIT == 0 {
            return Self::native(bits & (POSITIVE_BIT - 1), !positive);
        }

        let currency = Currency::read(parser)?;
        let issuer = AccountId::read(parser)?;
        if currency.is_native() {
            return Err(Error::InvalidAmount(format!(
                "issued amount at offset {offset} uses the native currency"
            )));
        }
        let issue = Issue::new(currency, issuer);
        if bits == NOT_NATIVE_BIT {
            return Ok(Self::zero(issue));
        }

        let exponent = ((bits >> 54) & 0xff) as i32 - EXPONENT_BIAS;
        let mantissa = bits & MANTISSA_MASK;
        if !(MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa)
            || !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent)
        {
            return Err(Error::InvalidAmount(format!(
                "non-canonical issued amount at offset {offset}"
            )));
        }
        Ok(Self {
            mantissa,
            exponent,
            negative: !positive,
            issue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Issue {
        let issuer =
            AccountId::from_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh")
                .unwrap();
        Issue::new(Currency::from_iso("USD").unwrap(), issuer)
    }

    #[test]
    fn native_wire_form() {
        let one = Amount::from_drops(1_000_000).unwrap();
        assert_eq!(
            hex::encode_upper(one.to_bytes().unwrap()),
            "40000000000F4240"
        );
        assert_eq!(
            hex::encode_upper(Amount::default().to_bytes().unwrap()),
            "4000000000000000"
        );
        let negative = Amount::from_drops(-1).unwrap();
        assert_eq!(negative.to_bytes().unwrap(), 1u64.to_be_bytes());
        let bytes = negative.to_bytes().unwrap();
        assert_eq!(Amount::from_slice(&bytes).unwrap(), negative);
        assert!(Amount::from_drops(MAX_NATIVE_DROPS as i64 + 1).is_err());
    }

    #[test]
    fn issued_wire_form() {
        let one = Amount::parse("1", usd()).unwrap();
        let bytes = one.to_bytes().unwrap();
        assert_eq!(bytes.len(), 48);
        assert_eq!(hex::encode_upper(&bytes[..8]), "D4838D7EA4C68000");
        assert_eq!(Amount::from_slice(&bytes).unwrap(), one);

        let zero = Amount::zero(usd());
        assert_eq!(
            hex::encode_upper(&zero.to_bytes().unwrap()[..8]),
            "8000000000000000"
        );
        let bytes = zero.to_bytes().unwrap();
        assert!(Amount::from_slice(&bytes).unwrap().is_zero());
    }

    #[test]
    fn decimal_parsing() {
        let amount = Amount::parse("1.5", usd()).unwrap();
        assert_eq!(
            (amount.mantissa(), amount.exponent()),
            (1_500_000_000_000_000, -15)
        );
        assert_eq!(amount.value_string(), "1.5");

        let small = Amount::parse("-0.00012", usd()).unwrap();
        assert_eq!(small.value_string(), "-0.00012");
        let scaled = Amount::parse("25e2", usd()).unwrap();
        assert_eq!(scaled.value_string(), "2500");
        assert_eq!(
            Amount::parse("123456789012345678901", usd())
                .unwrap()
                .value_string(),
            "123456789012345600000"
        );
        assert!(Amount::parse("1e-82", usd()).unwrap().is_zero());
        assert!(matches!(
            Amount::parse("1e96", usd()),
            Err(Error::InvalidAmount(_))
        ));
        assert!(Amount::parse("1.2.3", usd()).is_err());
        assert!(Amount::parse("1.5", Issue::native()).is_err());
    }

    #[test]
    fn arithmetic() {
        let a = Amount::parse("10", usd()).unwrap();
        let b = Amount::parse("2.5", usd()).unwrap();
        assert_eq!(a.checked_add(&b).unwrap().value_string(), "12.5");
        assert_eq!(b.checked_sub(&a).unwrap().value_string(), "-7.5");
        assert_eq!(a.compare(&b).unwrap(), Ordering::Greater);
        assert_eq!(a.negate().compare(&b).unwrap(), Ordering::Less);
        assert!(a.checked_sub(&a).unwrap().is_zero());

        let drops = Amount::from_drops(10).unwrap();
        assert!(matches!(a.checked_add(&drops), Err(Error::InvalidAmount(_))));
        assert!(matches!(drops.compare(&a), Err(Error::InvalidAmount(_))));
        assert_eq!(
            drops
                .checked_add(&Amount::from_drops(-15).unwrap())
                .unwrap()
                .drops(),
            Some(-5)
        );
    }

    #[test]
    fn json_forms() {
        let amount = Amount::parse("0.5", usd()).unwrap();
        let value = amount.to_json();
        assert_eq!(value["currency"], "USD");
        assert_eq!(value["issuer"], "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
        assert_eq!(value["value"], "0.5");
        assert_eq!(Amount::from_json(&value, "$").unwrap(), amount);

        let native = Amount::from_json(&json!("12"), "$").unwrap();
        assert_eq!(native.drops(), Some(12));
        assert_eq!(native.to_json(), json!("12"));
        assert!(Amount::from_json(&json!([]), "$.Fee").is_err());
    }

    #[test]
    fn extreme_exponents_are_errors() {
        for text in [
            "1e-2147483648",
            "1e2147483647",
            "99999999999999999e2147483647",
            "0.1e-513",
            "1e513",
        ] {
            assert!(
                matches!(
                    Amount::parse(text, usd()),
                    Err(Error::InvalidAmount(_))
                ),
                "{text}"
            );
        }
        assert!(Amount::parse("1e-512", usd()).unwrap().is_zero());
        assert!(matches!(
            canonicalize(1, i32::MIN),
            Err(Error::InvalidAmount(_))
        ));
        assert!(matches!(
            canonicalize(u64::MAX, i32::MAX),
            Err(Error::InvalidAmount(_))
        ));
    }
}
