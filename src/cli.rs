//! CLI argument definitions using clap derive macros.

use std::time::Duration;

use clap::Parser;

use dwl_core::{DEFAULT_THREADS, default_user_agent};

/// Download files from a list of links, several at a time.
///
/// Each link is saved in the current directory under the last segment of its
/// path (`index.html` for directory-like links). Links are taken from the
/// arguments, or from stdin one per line when none are given.
#[derive(Parser, Debug)]
#[command(name = "dwl")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum number of concurrent downloads (at least 1)
    #[arg(
        short = 't',
        long,
        default_value_t = DEFAULT_THREADS as u32,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub threads: u32,

    /// Timeout for a single download, e.g. 30s, 1m30s, 500ms (greater than zero)
    #[arg(
        long,
        default_value = "30s",
        allow_hyphen_values = true,
        value_parser = parse_timeout
    )]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    #[arg(short = 'u', long, default_value_t = default_user_agent())]
    pub user_agent: String,

    /// Links to download
    pub links: Vec<String>,
}

/// Parses a positive duration such as `30s`, `1m30s`, `1.5h` or `250ms`.
///
/// Accepted units: `ns`, `us` (`µs`), `ms`, `s`, `m`, `h`. Components can be
/// chained and carry decimals. A bare `0` is understood but rejected, as is
/// any negative value.
pub fn parse_timeout(value: &str) -> Result<Duration, String> {
    let (negative, duration) = parse_duration(value)?;
    if negative || duration.is_zero() {
        return Err(format!(
            "invalid value {value:?}: timeout must be greater than zero"
        ));
    }
    Ok(duration)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn parse_duration(value: &str) -> Result<(bool, Duration), String> {
    let invalid = || format!("invalid duration {value:?}");
    let trimmed = value.trim();
    let (negative, mut rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    if rest == "0" {
        return Ok((negative, Duration::ZERO));
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos: u64 = 0;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let nanos_per_unit: u64 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "" => return Err(format!("missing unit in duration {value:?}")),
            other => return Err(format!("unknown unit {other:?} in duration {value:?}")),
        };

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction_nanos = if fraction.is_empty() {
            0
        } else {
            let fraction: f64 = format!("0.{fraction}").parse().map_err(|_| invalid())?;
            (fraction * nanos_per_unit as f64).round() as u64
        };

        total_nanos = whole
            .checked_mul(nanos_per_unit)
            .and_then(|n| n.checked_add(fraction_nanos))
            .and_then(|n| n.checked_add(total_nanos))
            .ok_or_else(|| format!("duration {value:?} is too large"))?;
        rest = tail;
    }

    Ok((negative, Duration::from_nanos(total_nanos)))
}
