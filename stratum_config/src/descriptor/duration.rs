//! Human-readable durations such as `1h30m` or `250ms`.

use std::{fmt, str::FromStr, time::Duration as StdDuration};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};
use thiserror::Error;

use super::{Configurable, Shape, StringHints, TypeDescriptor};

/// Pattern advertised in schemas for [`Duration`] fields.
pub const DURATION_PATTERN: &str = r"(\d+h)?(\d+m)?(\d+s)?(\d+ms)?(\d+µs)?(\d+ns)?";

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const MAX_FRACTION_DIGITS: usize = 18;

/// A span of time written as a sequence of `<number><unit>` pairs.
///
/// Accepted units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, and `h`. Numbers
/// may carry a decimal fraction. Integers decode as nanoseconds.
///
/// ```
/// use stratum_config::Duration;
/// let timeout: Duration = "1m30s".parse()?;
/// assert_eq!(timeout.as_std().as_secs(), 90);
/// assert_eq!(timeout.to_string(), "1m30s");
/// # Ok::<_, stratum_config::descriptor::ParseDurationError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(StdDuration);

impl Duration {
    /// The empty duration.
    pub const ZERO: Self = Self(StdDuration::ZERO);

    /// Wrap a standard library duration.
    #[must_use]
    pub const fn new(inner: StdDuration) -> Self {
        Self(inner)
    }

    /// A duration of `secs` whole seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(StdDuration::from_secs(secs))
    }

    /// The wrapped standard library duration.
    #[must_use]
    pub const fn as_std(self) -> StdDuration {
        self.0
    }
}

impl From<StdDuration> for Duration {
    fn from(inner: StdDuration) -> Self {
        Self(inner)
    }
}

impl From<Duration> for StdDuration {
    fn from(duration: Duration) -> Self {
        duration.0
    }
}

/// Failure to read a [`Duration`] from text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseDurationError {
    /// The text is not a sequence of `<number><unit>` pairs.
    #[error("invalid duration {0:?}")]
    Invalid(String),
    /// A number was not followed by a unit.
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    /// A unit was not recognised.
    #[error("unknown unit {unit:?} in duration {text:?}")]
    UnknownUnit {
        /// Full text being parsed.
        text: String,
        /// Unrecognised unit.
        unit: String,
    },
    /// Negative durations cannot be represented.
    #[error("negative duration {0:?} is not supported")]
    Negative(String),
    /// The duration does not fit.
    #[error("duration {0:?} is out of range")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SECOND,
        "m" => 60 * NANOS_PER_SECOND,
        "h" => 3_600 * NANOS_PER_SECOND,
        _ => return None,
    })
}

fn split_digits(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text.split_at(end)
}

fn component(whole: &str, fraction: &str, scale: u128) -> Option<u128> {
    let whole_nanos = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().ok()?.checked_mul(scale)?
    };
    let digits = fraction.get(..MAX_FRACTION_DIGITS).unwrap_or(fraction);
    if digits.is_empty() {
        return Some(whole_nanos);
    }
    let numerator = digits.parse::<u128>().ok()?.checked_mul(scale)?;
    let denominator = 10_u128.checked_pow(u32::try_from(digits.len()).ok()?)?;
    whole_nanos.checked_add(numerator.checked_div(denominator)?)
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.starts_with('-') {
            return Err(ParseDurationError::Negative(text.to_owned()));
        }
        let body = text.strip_prefix('+').unwrap_or(text);
        if body == "0" {
            return Ok(Self::ZERO);
        }
        if body.is_empty() {
            return Err(ParseDurationError::Invalid(text.to_owned()));
        }

        let mut total: u128 = 0;
        let mut rest = body;
        while !rest.is_empty() {
            let (whole, after_whole) = split_digits(rest);
            let (fraction, after_fraction) = after_whole
                .strip_prefix('.')
                .map_or(("", after_whole), split_digits);
            if whole.is_empty() && fraction.is_empty() {
                return Err(ParseDurationError::Invalid(text.to_owned()));
            }
            let unit_end = after_fraction
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(after_fraction.len());
            let (unit, remainder) = after_fraction.split_at(unit_end);
            if unit.is_empty() {
                return Err(ParseDurationError::MissingUnit(text.to_owned()));
            }
            let scale = unit_nanos(unit).ok_or_else(|| ParseDurationError::UnknownUnit {
                text: text.to_owned(),
                unit: unit.to_owned(),
            })?;
            total = component(whole, fraction, scale)
                .and_then(|nanos| total.checked_add(nanos))
                .ok_or_else(|| ParseDurationError::Overflow(text.to_owned()))?;
            rest = remainder;
        }

        let overflow = || ParseDurationError::Overflow(text.to_owned());
        let secs = u64::try_from(total.div_euclid(NANOS_PER_SECOND)).map_err(|_| overflow())?;
        let nanos = u32::try_from(total.rem_euclid(NANOS_PER_SECOND)).map_err(|_| overflow())?;
        Ok(Self(StdDuration::new(secs, nanos)))
    }
}

fn write_fraction(f: &mut fmt::Formatter<'_>, value: u64, width: usize) -> fmt::Result {
    if value == 0 {
        return Ok(());
    }
    let digits = format!("{value:0width$}");
    write!(f, ".{}", digits.trim_end_matches('0'))
}

fn write_scaled(
    f: &mut fmt::Formatter<'_>,
    value: u64,
    (scale, width): (u64, usize),
    unit: &str,
) -> fmt::Result {
    write!(f, "{}", value.div_euclid(scale))?;
    write_fraction(f, value.rem_euclid(scale), width)?;
    f.write_str(unit)
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let nanos = u64::from(self.0.subsec_nanos());
        if secs == 0 {
            return match nanos {
                0 => f.write_str("0s"),
                1..=999 => write!(f, "{nanos}ns"),
                1_000..=999_999 => write_scaled(f, nanos, (1_000, 3), "µs"),
                _ => write_scaled(f, nanos, (1_000_000, 6), "ms"),
            };
        }

        let hours = secs.div_euclid(3_600);
        let minutes = secs.rem_euclid(3_600).div_euclid(60);
        let seconds = secs.rem_euclid(60);
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if hours > 0 || minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        write!(f, "{seconds}")?;
        write_fraction(f, nanos, 9)?;
        f.write_str("s")
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a duration such as \"1h30m\" or a count of nanoseconds")
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Duration, E> {
        text.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, nanos: u64) -> Result<Duration, E> {
        Ok(Duration(StdDuration::from_nanos(nanos)))
    }

    fn visit_i64<E: de::Error>(self, nanos: i64) -> Result<Duration, E> {
        u64::try_from(nanos)
            .map(|value| Duration(StdDuration::from_nanos(value)))
            .map_err(|_| E::custom(ParseDurationError::Negative(nanos.to_string())))
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DurationVisitor)
    }
}

impl Configurable for Duration {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::of::<Self>(Shape::String(StringHints::pattern(DURATION_PATTERN)))
    }

    fn is_unset(&self) -> bool {
        self.0.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Duration, ParseDurationError};

    #[rstest]
    #[case::seconds("45s", 45_000_000_000)]
    #[case::compound("1h2m3s", 3_723_000_000_000)]
    #[case::fraction("1.5s", 1_500_000_000)]
    #[case::leading_dot(".5ms", 500_000)]
    #[case::micro_sign("7µs", 7_000)]
    #[case::ascii_micro("7us", 7_000)]
    #[case::explicit_plus("+2m", 120_000_000_000)]
    #[case::zero("0", 0)]
    fn parses_durations(#[case] text: &str, #[case] nanos: u128) {
        let parsed: Duration = text.parse().expect("duration should parse");
        assert_eq!(parsed.as_std().as_nanos(), nanos);
    }

    #[rstest]
    #[case::empty("", ParseDurationError::Invalid(String::new()))]
    #[case::negative("-1s", ParseDurationError::Negative("-1s".into()))]
    #[case::missing_unit("10", ParseDurationError::MissingUnit("10".into()))]
    #[case::bad_unit("3d", ParseDurationError::UnknownUnit { text: "3d".into(), unit: "d".into() })]
    fn rejects_malformed_text(#[case] text: &str, #[case] expected: ParseDurationError) {
        assert_eq!(text.parse::<Duration>(), Err(expected));
    }

    #[rstest]
    #[case::zero(0, "0s")]
    #[case::nanos(15, "15ns")]
    #[case::micros(1_500, "1.5µs")]
    #[case::millis(250_000_000, "250ms")]
    #[case::seconds(90_000_000_000, "1m30s")]
    #[case::hours(3_600_000_000_000, "1h0m0s")]
    #[case::fractional_seconds(2_250_000_000, "2.25s")]
    fn formats_like_it_parses(#[case] nanos: u64, #[case] text: &str) {
        let duration = Duration::new(std::time::Duration::from_nanos(nanos));
        assert_eq!(duration.to_string(), text);
        assert_eq!(text.parse::<Duration>(), Ok(duration));
    }
}
