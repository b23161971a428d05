// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::cmp::Ordering;
use std::fmt;

use super::Hash256;
use super::amount::{MAX_MANTISSA, MIN_MANTISSA, format_decimal};
use crate::types::Amount;
use crate::{Error, Result};

const TEN_TO_17: u128 = 100_000_000_000_000_000;
const RATE_EXPONENT_BIAS: i32 = 100;
const RATE_MANTISSA_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;

/// An exchange ratio kept as a normalized decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Quality {
    mantissa: u64,
    exponent: i32,
}

impl Quality {
    pub fn new(mantissa: u64, exponent: i32) -> Self {
        let mut quality = Self { mantissa, exponent };
        quality.normalize();
        quality
    }

    /// `num / den` of two amounts, native amounts counted in whole units.
    pub fn compute(num: &Amount, den: &Amount) -> Result<Self> {
        Self::divide(num.unit_parts(), den.unit_parts())
    }

    /// `num / den` with native amounts counted in drops. This is the rate a
    /// book directory index carries.
    pub fn raw_rate(num: &Amount, den: &Amount) -> Result<Self> {
        Self::divide(num.raw_parts(), den.raw_parts())
    }

    /// Decimal division of `(mantissa, exponent)` pairs: the quotient gets
    /// 17 extra digits, is biased by 5 and then truncated to 16 significant
    /// digits.
    pub fn divide(num: (u64, i32), den: (u64, i32)) -> Result<Self> {
        let (mut num_m, mut num_e) = num;
        let (mut den_m, mut den_e) = den;
        if den_m == 0 {
            return Err(Error::InvalidAmount("division by zero".into()));
        }
        if num_m == 0 {
            return Ok(Self::default());
        }
        while num_m < MIN_MANTISSA {
            num_m *= 10;
            num_e -= 1;
        }
        while den_m < MIN_MANTISSA {
            den_m *= 10;
            den_e -= 1;
        }

        let quotient = (num_m as u128 * TEN_TO_17) / den_m as u128 + 5;
        let mut exponent = num_e - den_e - 17;
        let mut mantissa = quotient;
        while mantissa > MAX_MANTISSA as u128 {
            mantissa /= 10;
            exponent += 1;
        }
        Ok(Self::new(mantissa as u64, exponent))
    }

    /// Decodes the 64-bit rate stored in the low bytes of a book directory:
    /// the top byte is `exponent + 100`, the low 56 bits the mantissa.
    pub fn from_rate(rate: u64) -> Self {
        Self::new(
            rate & RATE_MANTISSA_MASK,
            (rate >> 56) as i32 - RATE_EXPONENT_BIAS,
        )
    }

    pub fn to_rate(&self) -> u64 {
        if self.is_zero() {
            return 0;
        }
        (((self.exponent + RATE_EXPONENT_BIAS) as u64) << 56) | self.mantissa
    }

    /// Quality of the offers in a book directory, in whole units.
    pub fn from_book_directory(
        directory: &Hash256,
        pays_native: bool,
        gets_native: bool,
    ) -> Self {
        let mut rate = [0u8; 8];
        rate.copy_from_slice(&directory.as_bytes()[24..]);
        let mut quality = Self::from_rate(u64::from_be_bytes(rate));
        if quality.is_zero() {
            return quality;
        }
        if pays_native {
            quality.exponent -= 6;
        }
        if gets_native {
            quality.exponent += 6;
        }
        quality
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 * 10f64.powi(self.exponent)
    }

    fn normalize(&mut self) {
        if self.mantissa == 0 {
            self.exponent = 0;
            return;
        }
        while self.mantissa < MIN_MANTISSA {
            self.mantissa *= 10;
            self.exponent -= 1;
        }
        while self.mantissa > MAX_MANTISSA {
            self.mantissa /= 10;
            self.exponent += 1;
        }
    }
}

impl PartialOrd for Quality {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quality {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => (self.exponent, self.mantissa)
                .cmp(&(other.exponent, other.mantissa)),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        f.write_str(&format_decimal(self.mantissa, self.exponent, false))
    }
}
