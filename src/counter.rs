use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::de;

use crate::errors::*;

///
/// Play count of unbounded width.
///
/// Stored as big-endian base-256 digits without leading zeros, which is
/// the shape the counter has on the wire in `PCNT` and `POPM`.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlayCounter {
    digits: Vec<u8>
}

impl PlayCounter {
    pub fn zero() -> Self {
        PlayCounter { digits: Vec::new() }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        PlayCounter { digits: bytes[start..].to_vec() }
    }

    /// Big-endian bytes, left padded with zeros up to `min_bytes`.
    pub fn to_bytes(&self, min_bytes: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(std::cmp::max(min_bytes, self.digits.len()));
        if self.digits.len() < min_bytes {
            bytes.resize(min_bytes - self.digits.len(), 0);
        }
        bytes.extend_from_slice(&self.digits);

        bytes
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// `None` when the counter is wider than 64 bits.
    pub fn as_u64(&self) -> Option<u64> {
        if self.digits.len() > 8 {
            return None;
        }

        Some(self.digits.iter().fold(0u64, |acc, d| acc << 8 | *d as u64))
    }

    pub fn increment(&mut self) {
        for digit in self.digits.iter_mut().rev() {
            if *digit == 0xff {
                *digit = 0;
            } else {
                *digit = *digit + 1;
                return;
            }
        }
        self.digits.insert(0, 1);
    }

    fn mul_add(&mut self, factor: u32, addend: u32) {
        let mut carry = addend;
        for digit in self.digits.iter_mut().rev() {
            let v = *digit as u32 * factor + carry;
            *digit = (v & 0xff) as u8;
            carry = v >> 8;
        }
        while carry > 0 {
            self.digits.insert(0, (carry & 0xff) as u8);
            carry = carry >> 8;
        }
    }

    // returns the remainder
    fn div_rem(&mut self, divisor: u32) -> u32 {
        let mut rem = 0u32;
        for digit in self.digits.iter_mut() {
            let v = rem << 8 | *digit as u32;
            *digit = (v / divisor) as u8;
            rem = v % divisor;
        }
        let start = self.digits.iter().position(|b| *b != 0).unwrap_or(self.digits.len());
        self.digits.drain(..start);

        rem
    }
}

impl From<u32> for PlayCounter {
    fn from(v: u32) -> Self {
        PlayCounter::from(v as u128)
    }
}

impl From<u64> for PlayCounter {
    fn from(v: u64) -> Self {
        PlayCounter::from(v as u128)
    }
}

impl From<u128> for PlayCounter {
    fn from(v: u128) -> Self {
        PlayCounter::from_bytes(&v.to_be_bytes())
    }
}

impl Ord for PlayCounter {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits.len().cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for PlayCounter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PlayCounter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut rest = self.clone();
        let mut decimal = Vec::new();
        while !rest.is_zero() {
            decimal.push(b'0' + rest.div_rem(10) as u8);
        }
        decimal.reverse();

        f.write_str(&String::from_utf8_lossy(&decimal))
    }
}

impl FromStr for PlayCounter {
    type Err = Id3Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Id3Error::invalid_argument("Empty play counter"));
        }

        let mut counter = PlayCounter::zero();
        for c in s.chars() {
            let digit = c.to_digit(10).ok_or_else(|| {
                Id3Error::invalid_argument(format!("'{}' is not a decimal number", s))
            })?;
            counter.mul_add(10, digit);
        }

        Ok(counter)
    }
}

impl Serialize for PlayCounter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlayCounter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
