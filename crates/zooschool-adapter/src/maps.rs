/*
[INPUT]:  Addresses, coordinates, phone numbers, provider route legs
[OUTPUT]: Maps/tel links, reordered waypoints, route summaries
[POS]:    Helpers - external maps and phone links
[UPDATE]: When switching maps provider or link format
*/

use url::Url;

use crate::http::{CarpoolError, Result};

const MAPS_BASE: &str = "https://maps.google.com/";
const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/";
const METERS_PER_MILE: f64 = 1609.344;

/// Search link for a free-form address
pub fn search_url(address: &str) -> Result<String> {
    let url = Url::parse_with_params(MAPS_BASE, &[("q", address.trim())])?;
    Ok(url.to_string())
}

/// Driving directions from the device's location to a coordinate
pub fn directions_url(lat: f64, lng: f64) -> Result<String> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(CarpoolError::Validation(format!(
            "coordinate out of range: {lat},{lng}"
        )));
    }
    let url = Url::parse_with_params(
        DIRECTIONS_BASE,
        &[
            ("api", "1".to_string()),
            ("destination", format!("{lat},{lng}")),
            ("travelmode", "driving".to_string()),
        ],
    )?;
    Ok(url.to_string())
}

/// `tel:` link; keeps digits and a leading `+`
pub fn tel_url(phone: &str) -> Option<String> {
    let trimmed = phone.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let plus = if trimmed.starts_with('+') { "+" } else { "" };
    Some(format!("tel:{plus}{digits}"))
}

/// Reorder `items` by provider-optimised indices.
///
/// `order[i]` is the index in `items` of the i-th stop. Anything other than a
/// permutation of `0..items.len()` is rejected.
pub fn apply_waypoint_order<T>(items: Vec<T>, order: &[usize]) -> Result<Vec<T>> {
    if order.len() != items.len() {
        return Err(CarpoolError::Validation(format!(
            "waypoint order has {} entries for {} stops",
            order.len(),
            items.len()
        )));
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut reordered = Vec::with_capacity(slots.len());
    for &index in order {
        let item = slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| {
                CarpoolError::Validation(format!("waypoint order index {index} invalid or repeated"))
            })?;
        reordered.push(item);
    }
    Ok(reordered)
}

/// Totals over a provider route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub distance_miles: f64,
    pub duration_minutes: u64,
}

impl RouteSummary {
    /// Sum `(meters, seconds)` legs
    pub fn from_legs(legs: &[(u64, u64)]) -> Self {
        let (meters, seconds) = legs
            .iter()
            .fold((0u64, 0u64), |(m, s), (lm, ls)| (m + lm, s + ls));
        let miles = meters as f64 / METERS_PER_MILE;
        Self {
            distance_miles: (miles * 10.0).round() / 10.0,
            duration_minutes: (seconds + 30) / 60,
        }
    }

    pub fn distance_label(&self) -> String {
        format!("{:.1} miles", self.distance_miles)
    }

    pub fn duration_label(&self) -> String {
        format!("{} min", self.duration_minutes)
    }
}
