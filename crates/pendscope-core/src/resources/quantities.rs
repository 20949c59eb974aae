use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Binary suffixes, indexed by power of 1024 (index 0 has no suffix)
const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

/// Decimal suffixes and their power-of-ten exponent, largest first
const DECIMAL_SUFFIXES: [(&str, i32); 8] = [
    ("E", 18),
    ("P", 15),
    ("T", 12),
    ("G", 9),
    ("M", 6),
    ("k", 3),
    ("", 0),
    ("m", -3),
];

/// Rendering style of a quantity.
///
/// Only affects `Display`; comparison and arithmetic ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantityFormat {
    /// Decimal SI suffixes (`m`, `k`, `M`, `G`, ...)
    #[default]
    DecimalSi,
    /// Binary SI suffixes (`Ki`, `Mi`, `Gi`, ...)
    BinarySi,
    /// Scientific exponent (`e3`, `e6`, ...)
    DecimalExponent,
}

/// Errors produced while parsing a quantity string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("Quantity is empty")]
    Empty,

    #[error("Invalid quantity number: {0}")]
    InvalidNumber(String),

    #[error("Unknown quantity suffix in: {0}")]
    UnknownSuffix(String),

    #[error("Negative quantity not allowed: {0}")]
    Negative(String),

    #[error("Quantity out of range: {0}")]
    Overflow(String),
}

/// Exact, non-negative resource amount (CPU cores, memory bytes).
///
/// The amount is held as an integer count of thousandths of a unit, so
/// `100m` CPU is 100 and `1Ki` of memory is 1_024_000. No floating point is
/// involved anywhere; values finer than one milli are rounded up.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quantity {
    millis: u128,
    format: QuantityFormat,
}

enum Multiplier {
    Binary(u32),
    Decimal(i32),
}

impl Quantity {
    /// The zero quantity
    pub const fn zero() -> Self {
        Self {
            millis: 0,
            format: QuantityFormat::DecimalSi,
        }
    }

    /// Build a quantity from a raw milli count
    pub const fn from_millis(millis: u128, format: QuantityFormat) -> Self {
        Self { millis, format }
    }

    /// CPU in millicores (1000 = 1 core)
    pub const fn from_cpu_millicores(millicores: u64) -> Self {
        Self::from_millis(millicores as u128, QuantityFormat::DecimalSi)
    }

    /// Memory in bytes, rendered with binary suffixes
    pub const fn from_bytes(bytes: u64) -> Self {
        Self::from_millis(bytes as u128 * 1000, QuantityFormat::BinarySi)
    }

    /// Parse a Kubernetes quantity string (e.g. "2", "100m", "0.5", "128Mi", "1e3")
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let input = s.trim();
        if input.is_empty() {
            return Err(QuantityError::Empty);
        }

        let (negative, body) = if let Some(rest) = input.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = input.strip_prefix('+') {
            (false, rest)
        } else {
            (false, input)
        };

        let number_end = body
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(body.len());
        let (number, suffix) = body.split_at(number_end);

        let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
        if (int_part.is_empty() && frac_part.is_empty()) || frac_part.contains('.') {
            return Err(QuantityError::InvalidNumber(input.to_string()));
        }

        let overflow = || QuantityError::Overflow(input.to_string());

        let digits = format!("{}{}", int_part, frac_part);
        let mantissa: u128 = digits.parse().map_err(|_| overflow())?;
        let scale = i32::try_from(frac_part.len()).map_err(|_| overflow())?;

        let (format, multiplier) = parse_suffix(suffix)
            .ok_or_else(|| QuantityError::UnknownSuffix(input.to_string()))?;

        let (numerator, exp10) = match multiplier {
            Multiplier::Binary(power) => {
                let factor = 1024u128.checked_pow(power).ok_or_else(overflow)?;
                let numerator = mantissa.checked_mul(factor).ok_or_else(overflow)?;
                (numerator, 3i32.checked_sub(scale))
            }
            Multiplier::Decimal(exp) => (
                mantissa,
                exp.checked_add(3).and_then(|e| e.checked_sub(scale)),
            ),
        };

        let millis = exp10
            .and_then(|exp10| scale_by_pow10(numerator, exp10))
            .ok_or_else(overflow)?;

        if negative && millis != 0 {
            return Err(QuantityError::Negative(input.to_string()));
        }

        Ok(Self { millis, format })
    }

    /// Raw amount in thousandths of a unit
    pub fn millis(&self) -> u128 {
        self.millis
    }

    /// Rendering style carried by this quantity
    pub fn format(&self) -> QuantityFormat {
        self.format
    }

    /// True for the zero amount, whatever the format
    pub fn is_zero(&self) -> bool {
        self.millis == 0
    }

    /// Add two quantities, `None` on overflow.
    ///
    /// The result keeps `self`'s format unless `self` is zero, in which case
    /// it adopts `other`'s.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        let millis = self.millis.checked_add(other.millis)?;
        Some(Self {
            millis,
            format: self.sum_format(&other),
        })
    }

    /// Add two quantities, clamping at the maximum representable amount
    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            millis: self.millis.saturating_add(other.millis),
            format: self.sum_format(&other),
        }
    }

    fn sum_format(&self, other: &Self) -> QuantityFormat {
        if self.millis == 0 {
            other.format
        } else {
            self.format
        }
    }
}

/// Multiply (exp10 >= 0) or ceiling-divide (exp10 < 0) by a power of ten
fn scale_by_pow10(value: u128, exp10: i32) -> Option<u128> {
    if exp10 >= 0 {
        value.checked_mul(10u128.checked_pow(exp10 as u32)?)
    } else {
        match 10u128.checked_pow(exp10.unsigned_abs()) {
            Some(divisor) => Some(value.div_ceil(divisor)),
            // Divisor exceeds any representable value
            None => Some(u128::from(value != 0)),
        }
    }
}

fn parse_suffix(suffix: &str) -> Option<(QuantityFormat, Multiplier)> {
    if let Some(power) = BINARY_SUFFIXES
        .iter()
        .skip(1)
        .position(|s| *s == suffix)
    {
        return Some((QuantityFormat::BinarySi, Multiplier::Binary(power as u32 + 1)));
    }

    match suffix {
        "n" => return Some((QuantityFormat::DecimalSi, Multiplier::Decimal(-9))),
        "u" => return Some((QuantityFormat::DecimalSi, Multiplier::Decimal(-6))),
        _ => {}
    }

    if let Some((_, exp)) = DECIMAL_SUFFIXES.iter().find(|(s, _)| *s == suffix) {
        return Some((QuantityFormat::DecimalSi, Multiplier::Decimal(*exp)));
    }

    let mut chars = suffix.chars();
    match chars.next() {
        Some('e') | Some('E') if suffix.len() > 1 => {
            let exp: i32 = chars.as_str().parse().ok()?;
            Some((QuantityFormat::DecimalExponent, Multiplier::Decimal(exp)))
        }
        _ => None,
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.millis == 0 {
            return write!(f, "0");
        }

        if self.format == QuantityFormat::BinarySi && self.millis % 1000 == 0 {
            let whole = self.millis / 1000;
            if whole >= 1024 {
                for power in (1..BINARY_SUFFIXES.len()).rev() {
                    let unit = 1024u128.pow(power as u32);
                    if whole % unit == 0 {
                        return write!(f, "{}{}", whole / unit, BINARY_SUFFIXES[power]);
                    }
                }
                return write!(f, "{}", whole);
            }
        }

        // Largest power-of-1000 step that keeps an integer mantissa; the
        // milli step always divides, so the loop never falls through.
        for (suffix, exp) in DECIMAL_SUFFIXES {
            let unit = 10u128.pow((exp + 3) as u32);
            if self.millis % unit == 0 {
                let mantissa = self.millis / unit;
                return match self.format {
                    QuantityFormat::DecimalExponent if exp != 0 => {
                        write!(f, "{}e{}", mantissa, exp)
                    }
                    QuantityFormat::DecimalExponent => write!(f, "{}", mantissa),
                    _ => write!(f, "{}{}", mantissa, suffix),
                };
            }
        }

        write!(f, "{}m", self.millis)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Quantity::parse(&raw).map_err(serde::de::Error::custom)
    }
}
