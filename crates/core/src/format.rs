//! Display formatting helpers shared by list cards and the detail view.

/// Character inserted between digit groups.
pub const GROUP_SEPARATOR: char = ' ';

/// A value that may be rendered with thousands grouping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount<'a> {
    Missing,
    Integer(i64),
    Float(f64),
    Text(&'a str),
}

impl From<i64> for Amount<'_> {
    fn from(n: i64) -> Self {
        Amount::Integer(n)
    }
}

impl From<u64> for Amount<'_> {
    fn from(n: u64) -> Self {
        i64::try_from(n)
            .map(Amount::Integer)
            .unwrap_or(Amount::Float(n as f64))
    }
}

impl From<u32> for Amount<'_> {
    fn from(n: u32) -> Self {
        Amount::Integer(i64::from(n))
    }
}

impl From<i32> for Amount<'_> {
    fn from(n: i32) -> Self {
        Amount::Integer(i64::from(n))
    }
}

impl From<f64> for Amount<'_> {
    fn from(n: f64) -> Self {
        Amount::Float(n)
    }
}

impl<'a> From<&'a str> for Amount<'a> {
    fn from(s: &'a str) -> Self {
        Amount::Text(s)
    }
}

impl<'a> From<&'a String> for Amount<'a> {
    fn from(s: &'a String) -> Self {
        Amount::Text(s.as_str())
    }
}

impl<'a, T: Into<Amount<'a>>> From<Option<T>> for Amount<'a> {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Amount::Missing)
    }
}

/// Group the integer part of a number in threes: `1234567` becomes `"1 234 567"`.
///
/// Text input is parsed after dropping whitespace and commas. The decimal part is
/// left untouched. Text that is not a number comes back unchanged; missing or
/// empty input renders as an empty string.
pub fn format_thousands<'a>(value: impl Into<Amount<'a>>) -> String {
    match value.into() {
        Amount::Missing => String::new(),
        Amount::Integer(n) => group_digits(&n.to_string()),
        Amount::Float(n) if n.is_finite() => group_digits(&render_float(n)),
        Amount::Float(n) => n.to_string(),
        Amount::Text(text) => format_text(text),
    }
}

fn format_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    // Only separators: an empty number reads as zero.
    if cleaned.is_empty() {
        return "0".to_string();
    }

    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() && is_plain_decimal(&cleaned) => group_digits(&render_float(n)),
        _ => text.to_string(),
    }
}

/// Rejects spellings `f64::from_str` accepts that are not plain decimals (`inf`, `1e5`).
fn is_plain_decimal(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+')
}

fn render_float(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    n.to_string()
}

fn group_digits(rendered: &str) -> String {
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Keep the last two comma-separated segments of an address.
///
/// `"Kyiv, Kyiv Oblast, Ukraine"` becomes `"Kyiv Oblast, Ukraine"`.
pub fn short_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = address.split(',').map(str::trim).collect();
    let start = parts.len().saturating_sub(2);
    parts[start..].join(", ")
}

/// Price label used on cards and the detail view: `"40"` becomes `"$40"`.
pub fn price_label(price: &str) -> String {
    format!("${price}")
}

/// Mileage label used on cards and the detail view: `5858` becomes `"5 858 km"`.
pub fn mileage_label<'a>(mileage: impl Into<Amount<'a>>) -> String {
    format!("{} km", format_thousands(mileage))
}
