//! Formatting of amounts for display.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// numfmt goes through `f64` and switches to scientific notation from 10^12,
/// so only the digits above the lowest nine are given to it.
const LOW_DIGITS: u64 = 1_000_000_000;

/// Format an amount in the minor currency unit with a dollar sign and
/// thousands separators, e.g. "$1,234,500" or "-$80".
pub fn format_amount(amount: i64) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(0)))
    });

    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(0)))
    });

    let formatter = if amount < 0 { negative_fmt } else { positive_fmt };

    match formatter {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        _ if amount == 0 => "$0".to_owned(),
        Some(formatter) => format_magnitude(formatter, amount.unsigned_abs()),
        None if amount < 0 => format!("-${}", amount.unsigned_abs()),
        None => format!("${amount}"),
    }
}

fn format_magnitude(formatter: &Formatter, magnitude: u64) -> String {
    if magnitude < LOW_DIGITS {
        return formatter.fmt_string(magnitude);
    }

    let low = magnitude % LOW_DIGITS;
    format!(
        "{},{:03},{:03},{:03}",
        formatter.fmt_string(magnitude / LOW_DIGITS),
        low / 1_000_000,
        low / 1_000 % 1_000,
        low % 1_000
    )
}
