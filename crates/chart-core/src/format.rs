// File: crates/chart-core/src/format.rs
// Summary: Number formatting for ticks, tooltips and KPI values.

/// How a numeric field is shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldFormat {
    /// `$12.34`, `-$12.34`
    Currency,
    /// `$12,345.67`
    CurrencyGrouped,
    /// `12.34%`
    Percent,
    /// Plain fixed-point with the given number of decimals.
    Fixed(u8),
    /// Rounded, thousands-grouped integer.
    Integer,
}

impl FieldFormat {
    pub fn apply(self, v: f64) -> String {
        match self {
            FieldFormat::Currency => currency(v),
            FieldFormat::CurrencyGrouped => {
                let sign = if v < 0.0 { "-" } else { "" };
                format!("{sign}${}", group_thousands(&format!("{:.2}", v.abs())))
            }
            FieldFormat::Percent => format!("{v:.2}%"),
            FieldFormat::Fixed(d) => format!("{v:.*}", d as usize),
            FieldFormat::Integer => group_thousands(&format!("{:.0}", v)),
        }
    }
}

pub fn currency(v: f64) -> String {
    if v < 0.0 { format!("-${:.2}", v.abs()) } else { format!("${v:.2}") }
}

/// Currency with an explicit sign: `+$1.50` / `-$1.50`.
pub fn signed_currency(v: f64) -> String {
    if v < 0.0 { format!("-${:.2}", v.abs()) } else { format!("+${v:.2}") }
}

/// Candle change label, `+$0.80 (8.00%)`. Percent is relative to `open`.
pub fn change_label(open: f64, close: f64) -> String {
    let delta = close - open;
    let pct = if open != 0.0 { delta / open * 100.0 } else { 0.0 };
    format!("{} ({pct:.2}%)", signed_currency(delta))
}

/// Insert `,` separators into the integer part of a decimal string.
pub fn group_thousands(num: &str) -> String {
    let (sign, rest) = match num.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", num),
    };
    let (int, frac) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    let mut out = String::with_capacity(num.len() + int.len() / 3);
    out.push_str(sign);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_and_grouping() {
        assert_eq!(FieldFormat::Currency.apply(9.5), "$9.50");
        assert_eq!(FieldFormat::Currency.apply(-2.0), "-$2.00");
        assert_eq!(FieldFormat::CurrencyGrouped.apply(1234567.891), "$1,234,567.89");
        assert_eq!(FieldFormat::Integer.apply(1000.0), "1,000");
        assert_eq!(group_thousands("-999"), "-999");
        assert_eq!(change_label(10.0, 9.0), "-$1.00 (-10.00%)");
        assert_eq!(change_label(0.0, 1.0), "+$1.00 (0.00%)");
    }
}
