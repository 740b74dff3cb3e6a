//! Client for the external routing oracle (an OSRM-style HTTP service).
//!
//! The oracle answers `GET {base}/{lon1},{lat1};{lon2},{lat2}` with distance
//! in meters, duration in seconds, and a GeoJSON LineString. This client
//! converts to miles, hours, and `Location`s; those conversions are part of
//! the contract.

pub mod error;

pub use error::RoutingError;

use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::models::{Location, RouteInformation};
use crate::planner::RouteSource;

const METERS_PER_MILE: f64 = 1609.344;
const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone)]
pub struct RoutingClient {
    client: reqwest::Client,
    base_url: String,
}

impl RoutingClient {
    /// Build a client with the configured base URL and per-request deadline.
    /// The underlying connection pool is shared across clones.
    pub fn new(config: &Config) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder()
            .timeout(config.routing_timeout)
            .build()
            .map_err(|e| RoutingError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.routing_oracle_url.trim_end_matches('/').to_string(),
        })
    }
}

impl RouteSource for RoutingClient {
    /// Fetch the free-flowing route between two locations.
    ///
    /// Identical coordinates short-circuit to an empty route without
    /// touching the network.
    async fn fetch_route(
        &self,
        origin: Location,
        destination: Location,
    ) -> Result<RouteInformation, RoutingError> {
        if origin == destination {
            return Ok(RouteInformation {
                distance_miles: 0.0,
                duration_hours: 0.0,
                geometry: vec![origin],
            });
        }

        let url = oracle_url(&self.base_url, origin, destination);
        debug!(%url, "requesting route from oracle");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RoutingError::Unavailable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Unavailable(format!(
                "oracle returned HTTP {status}"
            )));
        }

        let body: OracleResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                RoutingError::Unavailable(e.to_string())
            } else {
                RoutingError::Malformed(e.to_string())
            }
        })?;

        let route = route_information(body)?;
        debug!(
            distance_miles = route.distance_miles,
            duration_hours = route.duration_hours,
            geometry_points = route.geometry.len(),
            "fetched route from oracle"
        );
        Ok(route)
    }
}

fn oracle_url(base_url: &str, origin: Location, destination: Location) -> String {
    format!(
        "{}/{},{};{},{}?overview=full&geometries=geojson",
        base_url,
        origin.longitude,
        origin.latitude,
        destination.longitude,
        destination.latitude
    )
}

// -----------------------------------------------------------------------------
// Oracle response shape
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OracleResponse {
    routes: Vec<OracleRoute>,
}

#[derive(Debug, Deserialize)]
struct OracleRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: OracleGeometry,
}

#[derive(Debug, Deserialize)]
struct OracleGeometry {
    /// GeoJSON order: `[longitude, latitude]`.
    coordinates: Vec<[f64; 2]>,
}

fn route_information(body: OracleResponse) -> Result<RouteInformation, RoutingError> {
    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::Malformed("no routes in oracle response".to_string()))?;
    if route.distance < 0.0 || route.duration < 0.0 {
        return Err(RoutingError::Malformed(
            "negative distance or duration".to_string(),
        ));
    }
    if route.geometry.coordinates.is_empty() {
        return Err(RoutingError::Malformed(
            "route geometry has no coordinates".to_string(),
        ));
    }

    let geometry = route
        .geometry
        .coordinates
        .iter()
        .map(|&[longitude, latitude]| Location::new(latitude, longitude))
        .collect();

    Ok(RouteInformation {
        distance_miles: route.distance / METERS_PER_MILE,
        duration_hours: route.duration / SECONDS_PER_HOUR,
        geometry,
    })
}
