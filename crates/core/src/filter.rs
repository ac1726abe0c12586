//! Filter codec
//!
//! Pure functions that move a catalog [`Filter`] between its three shapes:
//!
//! - the URL query string a user shares (`brand=BMW&rentalPrice=40`)
//! - the structured [`Filter`] value the rest of the core works with
//! - the [`RequestParams`] the listing endpoint expects
//!
//! The listing endpoint understands two naming families for the same
//! constraint (`brand`/`make`, `rentalPrice`/`price`, `minMileage`/`mileageFrom`,
//! `maxMileage`/`mileageTo`). Both are always sent together.

use serde::{Deserialize, Serialize};

/// Number of cars requested per page.
pub const PAGE_SIZE: u32 = 12;

/// Lowest price offered by the price filter.
pub const MIN_PRICE_OPTION: u32 = 30;

/// Highest price offered by the price filter.
pub const MAX_PRICE_OPTION: u32 = 500;

/// Step between consecutive price filter options.
pub const PRICE_OPTION_STEP: u32 = 10;

/// Structured catalog filter. Absent fields apply no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rental_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_mileage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mileage: Option<f64>,
}

impl Filter {
    /// True when no field constrains the listing.
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.rental_price.is_none()
            && self.min_mileage.is_none()
            && self.max_mileage.is_none()
    }

    /// Render the filter as the catalog URL query string (without the leading `?`).
    ///
    /// Keys are emitted in a fixed order so equal filters always produce equal strings.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Some(brand) = self.brand.as_deref().filter(|b| !b.is_empty()) {
            pairs.push((FilterKey::Brand.as_str(), brand.to_string()));
        }
        if let Some(price) = self.rental_price {
            pairs.push((FilterKey::RentalPrice.as_str(), format_number(price)));
        }
        if let Some(min) = self.min_mileage {
            pairs.push((FilterKey::MinMileage.as_str(), format_number(min)));
        }
        if let Some(max) = self.max_mileage {
            pairs.push((FilterKey::MaxMileage.as_str(), format_number(max)));
        }

        join_query(&pairs)
    }
}

/// The four query keys the codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Brand,
    RentalPrice,
    MinMileage,
    MaxMileage,
}

impl FilterKey {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "brand" => Some(FilterKey::Brand),
            "rentalPrice" => Some(FilterKey::RentalPrice),
            "minMileage" => Some(FilterKey::MinMileage),
            "maxMileage" => Some(FilterKey::MaxMileage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Brand => "brand",
            FilterKey::RentalPrice => "rentalPrice",
            FilterKey::MinMileage => "minMileage",
            FilterKey::MaxMileage => "maxMileage",
        }
    }
}

/// Parameters for one request against the listing endpoint.
///
/// Pairs keep insertion order; the same filter and page always yield the same pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(&'static str, String)>,
}

impl RequestParams {
    fn push(&mut self, key: &'static str, value: String) {
        self.pairs.push((key, value));
    }

    /// Value sent under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Page requested, when one was supplied to [`encode`].
    pub fn page(&self) -> Option<u32> {
        self.get("page").and_then(|p| p.parse().ok())
    }

    /// Ordered key/value pairs, ready for an HTTP query builder.
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render as a query string, mostly useful for logging.
    pub fn to_query_string(&self) -> String {
        join_query(&self.pairs)
    }
}

/// Decode a filter from a flat string-keyed parameter map.
///
/// Unknown keys are ignored. The first occurrence of a key wins. Numeric fields
/// keep only digits, `.` and `-` before parsing, and anything that does not parse
/// afterwards is treated as absent. Never fails.
pub fn decode<I, K, V>(params: I) -> Filter
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut filter = Filter::default();
    let mut seen: Vec<FilterKey> = Vec::with_capacity(4);

    for (key, value) in params {
        let Some(key) = FilterKey::from_name(key.as_ref()) else {
            continue;
        };
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);

        let value = value.as_ref();
        match key {
            FilterKey::Brand => {
                filter.brand = (!value.is_empty()).then(|| value.to_string());
            }
            FilterKey::RentalPrice => filter.rental_price = parse_lenient_number(value),
            FilterKey::MinMileage => filter.min_mileage = parse_lenient_number(value),
            FilterKey::MaxMileage => filter.max_mileage = parse_lenient_number(value),
        }
    }

    filter
}

/// Decode a filter straight from a URL query string (leading `?` optional).
pub fn decode_query_string(query: &str) -> Filter {
    decode(parse_query_string(query))
}

/// Build the listing request parameters for `filter`.
///
/// `limit` is always present; `page` only when the caller supplies one.
pub fn encode(filter: &Filter, page: Option<u32>) -> RequestParams {
    let mut params = RequestParams::default();

    if let Some(brand) = filter.brand.as_deref().filter(|b| !b.is_empty()) {
        params.push("brand", brand.to_string());
        params.push("make", brand.to_string());
    }
    if let Some(price) = filter.rental_price {
        let price = format_number(price);
        params.push("rentalPrice", format!("${price}"));
        params.push("price", price);
    }
    if let Some(min) = filter.min_mileage {
        let min = format_number(min);
        params.push("minMileage", min.clone());
        params.push("mileageFrom", min);
    }
    if let Some(max) = filter.max_mileage {
        let max = format_number(max);
        params.push("maxMileage", max.clone());
        params.push("mileageTo", max);
    }

    params.push("limit", PAGE_SIZE.to_string());
    if let Some(page) = page {
        params.push("page", page.to_string());
    }

    params
}

/// Keep digits, `.` and `-`, then parse. Empty or unparseable input is `None`.
pub fn parse_lenient_number(raw: &str) -> Option<f64> {
    let cleaned = strip_non_numeric(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn strip_non_numeric(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Split a query string into decoded key/value pairs, preserving order.
pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}

fn join_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Shortest decimal rendering: `40.0` prints as `40`, `40.5` as `40.5`.
fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Collapses -0 to 0.
        return "0".to_string();
    }
    format!("{n}")
}

/// Raw search form inputs, exactly as typed or picked by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub brand: String,
    pub rental_price: String,
    pub min_mileage: String,
    pub max_mileage: String,
}

impl SearchForm {
    /// Normalised query pairs for this form.
    ///
    /// Brand is trimmed, price keeps digits, `.` and `-` (`"$80"` becomes `80`),
    /// mileage keeps digits only (`"From 5 000"` becomes `5000`). Empty results are dropped.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let brand = self.brand.trim();
        if !brand.is_empty() {
            pairs.push((FilterKey::Brand.as_str(), brand.to_string()));
        }

        let price = strip_non_numeric(&self.rental_price);
        if !price.is_empty() {
            pairs.push((FilterKey::RentalPrice.as_str(), price));
        }

        let min = digits_only(&self.min_mileage);
        if !min.is_empty() {
            pairs.push((FilterKey::MinMileage.as_str(), min));
        }

        let max = digits_only(&self.max_mileage);
        if !max.is_empty() {
            pairs.push((FilterKey::MaxMileage.as_str(), max));
        }

        pairs
    }

    pub fn to_query_string(&self) -> String {
        join_query(&self.to_query_pairs())
    }

    /// Catalog location the form navigates to on submit.
    pub fn catalog_url(&self) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            "/catalog".to_string()
        } else {
            format!("/catalog?{query}")
        }
    }

    /// Filter the catalog page will decode from [`SearchForm::catalog_url`].
    pub fn to_filter(&self) -> Filter {
        decode(self.to_query_pairs())
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Price choices offered by the price filter: 30, 40, ..., 500.
pub fn price_options() -> Vec<u32> {
    (MIN_PRICE_OPTION..=MAX_PRICE_OPTION)
        .step_by(PRICE_OPTION_STEP as usize)
        .collect()
}
