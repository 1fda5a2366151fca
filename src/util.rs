// Utility helpers for parsing and number formatting.
//
// All of the "dirty" CSV cell handling lives here so the rest of the code can
// work with plain `f64` measures.
use num_format::{Locale, ToFormattedString};

/// Parse a numeric CSV cell while being forgiving about the formatting
/// spreadsheets produce.
///
/// - Accepts `Option<&str>` so callers can pass through optional cells.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters ("N/A", "n.a.").
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round half away from zero to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale-aware thousands separators (`1,234,567.89`).
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Beyond u128 keep the digits ungrouped rather than lose them.
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    // "-0" after rounding is just zero.
    if n.is_sign_negative() && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Table cell for a raw measure: whole numbers without decimals, anything
/// else with two.
pub fn fmt_measure(v: &f64) -> String {
    if v.fract() == 0.0 {
        format_number(*v, 0)
    } else {
        format_number(*v, 2)
    }
}

/// Table cell for a per-period average.
pub fn fmt_avg(v: &f64) -> String {
    format!("{:.2}", v)
}

pub fn fmt_money(v: f64) -> String {
    if v.is_sign_negative() && v.abs() >= 0.5 {
        format!("-${}", format_number(v.abs(), 0))
    } else {
        format!("${}", format_number(v.abs(), 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64_safe_accepts_thousands_separators() {
        assert_eq!(parse_f64_safe(Some(" 1,250.5 ")), Some(1250.5));
        assert_eq!(parse_f64_safe(Some("42")), Some(42.0));
    }

    #[test]
    fn test_parse_f64_safe_rejects_text_and_blanks() {
        assert_eq!(parse_f64_safe(None), None);
        assert_eq!(parse_f64_safe(Some("   ")), None);
        assert_eq!(parse_f64_safe(Some("N/A")), None);
        assert_eq!(parse_f64_safe(Some("12 hrs")), None);
    }

    #[test]
    fn test_round2_rounds_to_two_places() {
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(0.333333), 0.33);
        assert_eq!(round2(2.675_000_1), 2.68);
    }

    #[test]
    fn test_format_number_inserts_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 0), "-1,500");
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_number_keeps_huge_magnitudes() {
        assert_eq!(format_number(1e19, 0), "10,000,000,000,000,000,000");
        assert_eq!(format_number(-2e19, 1), "-20,000,000,000,000,000,000.0");
        let beyond = format_number(1e40, 0);
        assert!(beyond.starts_with("1000000000"));
        assert!(!beyond.contains(','));
    }

    #[test]
    fn test_fmt_measure_drops_decimals_for_whole_numbers() {
        assert_eq!(fmt_measure(&20.0), "20");
        assert_eq!(fmt_measure(&12500.0), "12,500");
        assert_eq!(fmt_measure(&7.5), "7.50");
    }

    #[test]
    fn test_fmt_money() {
        assert_eq!(fmt_money(1234.4), "$1,234");
        assert_eq!(fmt_money(-2000.0), "-$2,000");
        assert_eq!(fmt_money(0.0), "$0");
    }
}
