use serde::{Deserialize, Deserializer, Serialize};

use crate::format::{mileage_label, price_label, short_address};

/// One car as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarSummary {
    pub id: String,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(rename = "type", default)]
    pub car_type: String,
    #[serde(default)]
    pub img: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rental_price: String,
    #[serde(default)]
    pub mileage: Option<u64>,
    #[serde(default)]
    pub rental_company: String,
    #[serde(default)]
    pub address: String,
}

/// Full record returned by the single-car endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDetails {
    #[serde(flatten)]
    pub summary: CarSummary,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fuel_consumption: Option<String>,
    #[serde(default)]
    pub engine_size: Option<String>,
    #[serde(default)]
    pub accessories: Vec<String>,
    #[serde(default)]
    pub functionalities: Vec<String>,
    #[serde(default)]
    pub rental_conditions: Vec<String>,
}

/// One page of the listing endpoint.
///
/// The pagination counters are not always populated consistently upstream. Any
/// counter that is missing, `null`, or not a JSON number decodes as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarsResponse {
    #[serde(default)]
    pub cars: Vec<CarSummary>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_cars: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_pages: Option<u64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        _ => None,
    })
}

/// A car rendered for a list card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarCard {
    pub id: String,
    pub title: String,
    pub year: Option<u32>,
    pub price: String,
    pub location: String,
    pub rental_company: String,
    pub car_type: String,
    pub mileage: String,
    pub favorite: bool,
    pub details_command: String,
}

/// Transform a listing entry into its card view.
pub fn to_card(car: &CarSummary, favorite: bool) -> CarCard {
    CarCard {
        id: car.id.clone(),
        title: format!("{} {}", car.brand, car.model).trim().to_string(),
        year: car.year,
        price: price_label(&car.rental_price),
        location: short_address(&car.address),
        rental_company: car.rental_company.clone(),
        car_type: car.car_type.clone(),
        mileage: mileage_label(car.mileage),
        favorite,
        details_command: format!("rentcat catalog show {}", car.id),
    }
}

/// A car rendered for the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarView {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: Option<u32>,
    pub img: String,
    pub location: String,
    pub mileage: String,
    pub price: String,
    pub description: Option<String>,
    pub rental_conditions: Vec<String>,
    pub specifications: Vec<(String, String)>,
    pub features: Vec<String>,
    pub favorite: bool,
}

/// Transform a detail record into its page view.
///
/// Specifications always list year and type; fuel consumption and engine size
/// only when present. Accessories and functionalities are merged in that order.
pub fn to_view(car: &CarDetails, favorite: bool) -> CarView {
    let summary = &car.summary;

    let mut specifications = Vec::new();
    specifications.push((
        "Year".to_string(),
        summary.year.map(|y| y.to_string()).unwrap_or_default(),
    ));
    specifications.push(("Type".to_string(), summary.car_type.clone()));
    if let Some(fuel) = car.fuel_consumption.as_deref().filter(|s| !s.is_empty()) {
        specifications.push(("Fuel Consumption".to_string(), fuel.to_string()));
    }
    if let Some(engine) = car.engine_size.as_deref().filter(|s| !s.is_empty()) {
        specifications.push(("Engine Size".to_string(), engine.to_string()));
    }

    let features = car
        .accessories
        .iter()
        .chain(car.functionalities.iter())
        .cloned()
        .collect();

    CarView {
        id: summary.id.clone(),
        brand: summary.brand.clone(),
        model: summary.model.clone(),
        year: summary.year,
        img: summary.img.clone(),
        location: short_address(&summary.address),
        mileage: mileage_label(summary.mileage),
        price: price_label(&summary.rental_price),
        description: car.description.clone().filter(|d| !d.is_empty()),
        rental_conditions: car.rental_conditions.clone(),
        specifications,
        features,
        favorite,
    }
}
