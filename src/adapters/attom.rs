use crate::adapters::http::ApiClient;
use crate::domain::location::Location;
use crate::domain::model::{ComparablesRecord, MarketRecord, MarketTrend, ProviderKind};
use crate::domain::ports::{Provider, ProviderError, ProviderResult};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;

const COMPARABLES_RADIUS_MILES: &str = "0.5";
const COMPARABLES_PAGE_SIZE: &str = "50";

fn with_attom_auth(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    // ATTOM 以 header 傳遞金鑰
    request
        .header("apikey", api_key)
        .header(reqwest::header::ACCEPT, "application/json")
}

pub fn market_trend(price_change_percent: f64) -> MarketTrend {
    if price_change_percent >= 5.0 {
        MarketTrend::Seller
    } else if price_change_percent <= -2.0 {
        MarketTrend::Buyer
    } else {
        MarketTrend::Balanced
    }
}

// ---------------------------------------------------------------------------
// Market (sales trend)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SalesTrendResponse {
    #[serde(default, alias = "salesTrends")]
    salestrends: Vec<SalesTrendInterval>,
}

#[derive(Debug, Deserialize)]
struct SalesTrendInterval {
    #[serde(alias = "salesTrend")]
    salestrend: SalesTrendFigures,
}

#[derive(Debug, Deserialize)]
struct SalesTrendFigures {
    #[serde(default, alias = "homeSaleCount")]
    homesalecount: Option<f64>,
    #[serde(default, alias = "avgSalePrice")]
    avgsaleprice: Option<f64>,
    #[serde(default, alias = "medSalePrice")]
    medsaleprice: Option<f64>,
}

pub struct AttomMarketProvider {
    client: ApiClient,
}

impl AttomMarketProvider {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider for AttomMarketProvider {
    type Output = MarketRecord;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Market
    }

    async fn fetch(&self, location: &Location) -> ProviderResult<MarketRecord> {
        let api_key = self.client.api_key()?;
        let zip = location
            .zip_code()
            .ok_or_else(|| ProviderError::NotFound(format!("no ZIP in '{}'", location.address)))?;

        let request = self
            .client
            .get("/salestrend/snapshot")
            .query(&[("postalcode", zip.as_str()), ("interval", "monthly")]);
        let body: SalesTrendResponse = self
            .client
            .send_json(with_attom_auth(request, api_key))
            .await?;

        // 區間依時間排序，最後一筆為最新
        let mut intervals = body.salestrends.into_iter().rev();
        let latest = intervals
            .next()
            .ok_or_else(|| ProviderError::NotFound(format!("no sales trend for {}", zip)))?
            .salestrend;
        let previous = intervals.next().map(|i| i.salestrend);

        let median = latest.medsaleprice.unwrap_or(0.0).max(0.0);
        let price_change_percent = match previous.and_then(|p| p.medsaleprice) {
            Some(prev) if prev > 0.0 => ((median - prev) / prev * 1000.0).round() / 10.0,
            _ => 0.0,
        };

        Ok(MarketRecord {
            median_sale_price: median.round() as u64,
            average_sale_price: latest.avgsaleprice.unwrap_or(0.0).max(0.0).round() as u64,
            total_sales: latest.homesalecount.unwrap_or(0.0).max(0.0).round() as u64,
            price_change_percent,
            market_trend: market_trend(price_change_percent),
        })
    }
}

// ---------------------------------------------------------------------------
// Comparables (property snapshot)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PropertySnapshotResponse {
    #[serde(default)]
    property: Vec<PropertySnapshot>,
}

#[derive(Debug, Deserialize)]
struct PropertySnapshot {
    sale: Option<Sale>,
    building: Option<Building>,
}

#[derive(Debug, Deserialize)]
struct Sale {
    amount: Option<SaleAmount>,
}

#[derive(Debug, Deserialize)]
struct SaleAmount {
    saleamt: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Building {
    size: Option<BuildingSize>,
}

#[derive(Debug, Deserialize)]
struct BuildingSize {
    universalsize: Option<f64>,
}

impl PropertySnapshot {
    fn sale_amount(&self) -> Option<f64> {
        self.sale
            .as_ref()?
            .amount
            .as_ref()?
            .saleamt
            .filter(|v| *v > 0.0)
    }

    fn square_footage(&self) -> Option<f64> {
        self.building
            .as_ref()?
            .size
            .as_ref()?
            .universalsize
            .filter(|v| *v > 0.0)
    }
}

fn average(values: &[f64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    (values.iter().sum::<f64>() / values.len() as f64).round() as u64
}

pub struct AttomComparablesProvider {
    client: ApiClient,
}

impl AttomComparablesProvider {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider for AttomComparablesProvider {
    type Output = ComparablesRecord;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Comparables
    }

    async fn fetch(&self, location: &Location) -> ProviderResult<ComparablesRecord> {
        let api_key = self.client.api_key()?;
        let request = self.client.get("/property/snapshot").query(&[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("radius", COMPARABLES_RADIUS_MILES.to_string()),
            ("pagesize", COMPARABLES_PAGE_SIZE.to_string()),
        ]);
        let body: PropertySnapshotResponse = self
            .client
            .send_json(with_attom_auth(request, api_key))
            .await?;

        if body.property.is_empty() {
            return Err(ProviderError::NotFound(
                "no comparable properties within radius".into(),
            ));
        }

        let prices: Vec<f64> = body.property.iter().filter_map(|p| p.sale_amount()).collect();
        let sizes: Vec<f64> = body
            .property
            .iter()
            .filter_map(|p| p.square_footage())
            .collect();

        Ok(ComparablesRecord {
            average_price: average(&prices),
            price_min: prices.iter().copied().reduce(f64::min).unwrap_or(0.0).round() as u64,
            price_max: prices.iter().copied().reduce(f64::max).unwrap_or(0.0).round() as u64,
            average_square_footage: average(&sizes),
            total_count: body.property.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn client_for(server: &MockServer, kind: ProviderKind) -> ApiClient {
        ApiClient::new(
            kind.as_str(),
            &server.base_url(),
            Some("attom-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn location() -> Location {
        Location::new(47.6101, -122.3421, "Pike Pl, Seattle, WA 98101")
    }

    #[test]
    fn test_market_trend_thresholds() {
        assert_eq!(market_trend(5.0), MarketTrend::Seller);
        assert_eq!(market_trend(4.9), MarketTrend::Balanced);
        assert_eq!(market_trend(-2.0), MarketTrend::Buyer);
    }

    #[tokio::test]
    async fn test_market_uses_latest_two_intervals() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/salestrend/snapshot")
                .query_param("postalcode", "98101")
                .header("apikey", "attom-key");
            then.status(200).json_body(serde_json::json!({
                "salestrends": [
                    { "salestrend": { "homesalecount": 80, "avgsaleprice": 600000, "medsaleprice": 500000 } },
                    { "salestrend": { "homesalecount": 95, "avgsaleprice": 640000, "medsaleprice": 530000 } }
                ]
            }));
        });

        let record = AttomMarketProvider::new(client_for(&server, ProviderKind::Market))
            .fetch(&location())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(record.median_sale_price, 530_000);
        assert_eq!(record.total_sales, 95);
        assert_eq!(record.price_change_percent, 6.0);
        assert_eq!(record.market_trend, MarketTrend::Seller);
    }

    #[tokio::test]
    async fn test_market_without_zip_is_not_found() {
        let server = MockServer::start();
        let provider = AttomMarketProvider::new(client_for(&server, ProviderKind::Market));
        let result = provider
            .fetch(&Location::new(47.6, -122.3, "Pike Place Market"))
            .await;
        assert!(matches!(result, Err(ProviderError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_comparables_averages() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/property/snapshot")
                .query_param("radius", "0.5")
                .header("apikey", "attom-key");
            then.status(200).json_body(serde_json::json!({
                "property": [
                    { "sale": { "amount": { "saleamt": 400000 } }, "building": { "size": { "universalsize": 1500 } } },
                    { "sale": { "amount": { "saleamt": 600000 } }, "building": { "size": { "universalsize": 2500 } } },
                    { "building": { "size": { "universalsize": 2000 } } }
                ]
            }));
        });

        let record = AttomComparablesProvider::new(client_for(&server, ProviderKind::Comparables))
            .fetch(&location())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(record.average_price, 500_000);
        assert_eq!(record.price_min, 400_000);
        assert_eq!(record.price_max, 600_000);
        assert_eq!(record.average_square_footage, 2000);
        assert_eq!(record.total_count, 3);
    }

    #[tokio::test]
    async fn test_no_comparables_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/property/snapshot");
            then.status(200).json_body(serde_json::json!({ "property": [] }));
        });

        let result = AttomComparablesProvider::new(client_for(&server, ProviderKind::Comparables))
            .fetch(&location())
            .await;
        assert!(matches!(result, Err(ProviderError::NotFound(_))));
    }
}
