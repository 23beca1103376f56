use crate::adapters::http::ApiClient;
use crate::domain::labels::{bike_label, transit_label, walk_label};
use crate::domain::location::Location;
use crate::domain::model::{ProviderKind, WalkabilityProfile};
use crate::domain::ports::{Provider, ProviderError, ProviderResult};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct WalkScoreResponse {
    status: i64,
    walkscore: Option<f64>,
    description: Option<String>,
    updated: Option<String>,
    transit: Option<SubScore>,
    bike: Option<SubScore>,
}

#[derive(Debug, Deserialize)]
struct SubScore {
    score: Option<f64>,
    description: Option<String>,
}

fn to_score(value: Option<f64>) -> u8 {
    value.map(|v| v.round().clamp(0.0, 100.0) as u8).unwrap_or(0)
}

pub struct WalkScoreProvider {
    client: ApiClient,
}

impl WalkScoreProvider {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider for WalkScoreProvider {
    type Output = WalkabilityProfile;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Walkability
    }

    async fn fetch(&self, location: &Location) -> ProviderResult<WalkabilityProfile> {
        let api_key = self.client.api_key()?;
        let request = self.client.get("/score").query(&[
            ("format", "json".to_string()),
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("address", location.address.clone()),
            ("transit", "1".to_string()),
            ("bike", "1".to_string()),
            ("wsapikey", api_key.to_string()),
        ]);

        let body: WalkScoreResponse = self.client.send_json(request).await?;

        // WalkScore 以 body 內的 status 表示結果
        match body.status {
            1 => {}
            2 => return Err(ProviderError::NotFound("walk score is still being calculated".into())),
            30 => return Err(ProviderError::NotFound("invalid latitude/longitude".into())),
            40 => return Err(ProviderError::NotConfigured("WalkScore rejected the API key".into())),
            41 | 42 => return Err(ProviderError::RateLimited(format!("WalkScore status {}", body.status))),
            other => {
                return Err(ProviderError::MalformedResponse(format!(
                    "unexpected WalkScore status {}",
                    other
                )))
            }
        }

        let walk_score = to_score(body.walkscore);
        let (transit_score, transit_description) = match body.transit {
            Some(t) => {
                let score = to_score(t.score);
                (score, t.description.unwrap_or_else(|| transit_label(score).to_string()))
            }
            None => (0, transit_label(0).to_string()),
        };
        let (bike_score, bike_description) = match body.bike {
            Some(b) => {
                let score = to_score(b.score);
                (score, b.description.unwrap_or_else(|| bike_label(score).to_string()))
            }
            None => (0, bike_label(0).to_string()),
        };

        Ok(WalkabilityProfile {
            walk_score,
            walk_description: body
                .description
                .unwrap_or_else(|| walk_label(walk_score).to_string()),
            transit_score,
            transit_description,
            bike_score,
            bike_description,
            updated: body.updated,
        })
    }
}
