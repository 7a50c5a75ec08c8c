//! Mapbox HTTP adapter for geocoding and driving-distance matrices.
//!
//! Both endpoints degrade to `None` on any transport, status, or decode
//! problem; callers fall back rather than surfacing provider faults.

use serde::Deserialize;

use crate::model::{Coordinates, TravelEstimate};
use crate::traits::{DistanceProvider, GeocodeProvider, GeocodedPlace};

#[derive(Debug, Clone)]
pub struct MapboxConfig {
    pub base_url: String,
    pub access_token: String,
    /// ISO country filter for postcode geocoding.
    pub country: String,
    pub timeout_secs: u64,
}

impl MapboxConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.mapbox.com".to_string(),
            access_token: access_token.into(),
            country: "GB".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapboxClient {
    config: MapboxConfig,
    client: reqwest::blocking::Client,
}

impl MapboxClient {
    pub fn new(config: MapboxConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl GeocodeProvider for MapboxClient {
    fn geocode(&self, postcode: &str) -> Option<GeocodedPlace> {
        let url = format!(
            "{}/geocoding/v5/mapbox.places/{}.json",
            self.config.base_url, postcode
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("access_token", self.config.access_token.as_str()),
                ("country", self.config.country.as_str()),
                ("types", "postcode"),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<GeocodeResponse>());

        let body = match response {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(%postcode, error = %err, "geocoding request failed");
                return None;
            }
        };

        body.features.into_iter().next().map(|feature| GeocodedPlace {
            coordinates: Coordinates {
                latitude: feature.center[1],
                longitude: feature.center[0],
            },
            place_name: feature.place_name,
        })
    }
}

impl DistanceProvider for MapboxClient {
    fn travel_matrix(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Option<Vec<Option<TravelEstimate>>> {
        if destinations.is_empty() {
            return Some(Vec::new());
        }

        let coords = std::iter::once(&origin)
            .chain(destinations.iter())
            .map(|c| format!("{:.6},{:.6}", c.longitude, c.latitude))
            .collect::<Vec<_>>()
            .join(";");

        let url = format!(
            "{}/directions-matrix/v1/mapbox/driving/{}",
            self.config.base_url, coords
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("access_token", self.config.access_token.as_str()),
                ("sources", "0"),
                ("annotations", "distance,duration"),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<MatrixResponse>());

        let body = match response {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, "matrix request failed");
                return None;
            }
        };

        if body.code != "Ok" {
            tracing::warn!(code = %body.code, "matrix response not Ok");
            return None;
        }

        let distances = body.distances?.into_iter().next()?;
        let durations = body.durations?.into_iter().next()?;

        Some(
            (0..destinations.len())
                .map(|i| {
                    // Row index 0 is the origin itself.
                    let meters = distances.get(i + 1).copied().flatten();
                    let seconds = durations.get(i + 1).copied().flatten();
                    match (meters, seconds) {
                        (Some(meters), Some(seconds)) => {
                            Some(TravelEstimate::from_provider(meters, seconds))
                        }
                        _ => None,
                    }
                })
                .collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    /// [longitude, latitude]
    center: [f64; 2],
    place_name: String,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    code: String,
    /// Meters, one row per source.
    distances: Option<Vec<Vec<Option<f64>>>>,
    /// Seconds, one row per source.
    durations: Option<Vec<Vec<Option<f64>>>>,
}
