use crate::adapters::http::ApiClient;
use crate::domain::location::Location;
use crate::domain::model::{PlaceCategory, PlaceRecord, PlacesProfile, ProviderKind};
use crate::domain::ports::{Provider, ProviderError, ProviderResult};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;

const EARTH_RADIUS_MILES: f64 = 3958.8;
const PLACES_PER_QUERY: u32 = 50;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: FeatureProperties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    name: Option<String>,
    formatted: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
    place_id: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

/// Great-circle distance in miles.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().asin()
}

fn to_record(feature: Feature, origin: &Location) -> Option<PlaceRecord> {
    let props = feature.properties;
    let name = props.name.filter(|n| !n.trim().is_empty())?;

    let (latitude, longitude) = match (props.lat, props.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            let coords = feature.geometry?.coordinates;
            // GeoJSON 座標順序為 [lon, lat]
            (*coords.get(1)?, *coords.first()?)
        }
    };

    let distance = haversine_miles(origin.latitude, origin.longitude, latitude, longitude);

    Some(PlaceRecord {
        formatted_address: props.formatted.unwrap_or_else(|| name.clone()),
        place_id: props.place_id.unwrap_or_default(),
        name,
        categories: props.categories,
        latitude,
        longitude,
        distance_miles: (distance * 100.0).round() / 100.0,
    })
}

/// Geoapify places search, fanned out over the seven categories.
pub struct GeoapifyPlacesProvider {
    client: ApiClient,
    radius_meters: u32,
}

impl GeoapifyPlacesProvider {
    pub fn new(client: ApiClient, radius_meters: u32) -> Self {
        Self {
            client,
            radius_meters,
        }
    }

    async fn fetch_category(
        &self,
        category: PlaceCategory,
        location: &Location,
        api_key: &str,
    ) -> ProviderResult<Vec<PlaceRecord>> {
        let circle = format!(
            "circle:{},{},{}",
            location.longitude, location.latitude, self.radius_meters
        );
        let bias = format!("proximity:{},{}", location.longitude, location.latitude);
        let request = self.client.get("/v2/places").query(&[
            ("categories", category.geoapify_filters().join(",")),
            ("filter", circle),
            ("bias", bias),
            ("limit", PLACES_PER_QUERY.to_string()),
            ("apiKey", api_key.to_string()),
        ]);

        let collection: FeatureCollection = self.client.send_json(request).await?;
        let mut records: Vec<PlaceRecord> = collection
            .features
            .into_iter()
            .filter_map(|f| to_record(f, location))
            .collect();
        records.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
        Ok(records)
    }
}

#[async_trait]
impl Provider for GeoapifyPlacesProvider {
    type Output = PlacesProfile;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Places
    }

    async fn fetch(&self, location: &Location) -> ProviderResult<PlacesProfile> {
        let api_key = self.client.api_key()?;

        let queries = PlaceCategory::ALL
            .iter()
            .map(|&category| async move {
                (category, self.fetch_category(category, location, api_key).await)
            });
        let results = join_all(queries).await;

        let mut profile = PlacesProfile::default();
        let mut first_error: Option<ProviderError> = None;

        for (category, result) in results {
            match result {
                Ok(records) => {
                    if matches!(
                        category,
                        PlaceCategory::Restaurants
                            | PlaceCategory::Shopping
                            | PlaceCategory::Entertainment
                            | PlaceCategory::Services
                    ) {
                        profile.total_count += records.len();
                    }
                    *profile.category_mut(category) = records;
                    profile.category_availability.insert(category, true);
                }
                Err(e) => {
                    tracing::warn!(
                        category = category.as_str(),
                        error = %e,
                        "⚠️ Places sub-query failed, category left empty"
                    );
                    profile.category_availability.insert(category, false);
                    first_error.get_or_insert(e);
                }
            }
        }

        let any_success = profile.category_availability.values().any(|ok| *ok);
        match first_error {
            Some(error) if !any_success => Err(error),
            _ => Ok(profile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn provider_for(server: &MockServer) -> GeoapifyPlacesProvider {
        let client = ApiClient::new(
            ProviderKind::Places.as_str(),
            &server.base_url(),
            Some("geo-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        GeoapifyPlacesProvider::new(client, 2000)
    }

    fn feature(name: &str, lon: f64, lat: f64) -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "properties": {
                "name": name,
                "formatted": format!("{}, Seattle, WA", name),
                "categories": ["catering.restaurant"],
                "place_id": format!("id-{}", name)
            },
            "geometry": { "type": "Point", "coordinates": [lon, lat] }
        })
    }

    fn location() -> Location {
        Location::new(47.6101, -122.3421, "Pike Pl, Seattle, WA 98101")
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let miles = haversine_miles(47.0, -122.0, 48.0, -122.0);
        assert!((miles - 69.09).abs() < 0.1);
    }

    #[tokio::test]
    async fn test_failed_category_degrades_only_that_category() {
        let server = MockServer::start();
        let restaurants = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/places")
                .query_param("categories", "catering.restaurant,catering.fast_food,catering.cafe");
            then.status(200).json_body(serde_json::json!({
                "type": "FeatureCollection",
                "features": [
                    feature("Far Cafe", -122.3300, 47.6200),
                    feature("Near Diner", -122.3420, 47.6102),
                    { "properties": { "categories": [] }, "geometry": { "coordinates": [-122.34, 47.61] } }
                ]
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/v2/places").query_param(
                "categories",
                "education.school,education.college,education.university,childcare.kindergarten",
            );
            then.status(503);
        });
        // 其他類別回傳空集合
        for category in PlaceCategory::ALL {
            if matches!(category, PlaceCategory::Restaurants | PlaceCategory::Schools) {
                continue;
            }
            let filters = category.geoapify_filters().join(",");
            server.mock(|when, then| {
                when.method(GET)
                    .path("/v2/places")
                    .query_param("categories", filters.as_str());
                then.status(200)
                    .json_body(serde_json::json!({ "type": "FeatureCollection", "features": [] }));
            });
        }

        let profile = provider_for(&server).fetch(&location()).await.unwrap();

        restaurants.assert();
        assert!(profile.schools.is_empty());
        assert_eq!(
            profile.category_availability.get(&PlaceCategory::Schools),
            Some(&false)
        );
        assert_eq!(profile.restaurants.len(), 2);
        assert_eq!(profile.restaurants[0].name, "Near Diner");
        assert_eq!(
            profile.category_availability.get(&PlaceCategory::Restaurants),
            Some(&true)
        );
        assert_eq!(profile.total_count, 2);
    }

    #[tokio::test]
    async fn test_all_categories_failing_fails_the_provider() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/places");
            then.status(429);
        });

        let result = provider_for(&server).fetch(&location()).await;
        assert!(matches!(result, Err(ProviderError::RateLimited(_))));
    }

    #[tokio::test]
    async fn test_adapter_keeps_full_lists_until_truncated() {
        let server = MockServer::start();
        let features: Vec<serde_json::Value> = (0..12)
            .map(|i| feature(&format!("Stop {}", i), -122.3421 + i as f64 * 0.001, 47.6101))
            .collect();
        server.mock(|when, then| {
            when.method(GET).path("/v2/places");
            then.status(200).json_body(serde_json::json!({ "features": features }));
        });

        let mut profile = provider_for(&server).fetch(&location()).await.unwrap();
        assert_eq!(profile.restaurants.len(), 12);
        assert_eq!(profile.total_count, 48);

        profile.truncate_lists();
        assert_eq!(profile.restaurants.len(), 10);
        assert_eq!(profile.transportation.len(), 8);
        assert_eq!(profile.safety_services.len(), 5);
    }
}
