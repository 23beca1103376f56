use crate::adapters::http::ApiClient;
use crate::domain::labels::with_commas;
use crate::domain::ports::{MetricsSummary, ProviderError, ProviderResult, TipGenerator};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

pub const TIPS_SOURCE: &str = "tips";

const SYSTEM_PROMPT: &str = "You are a top-performing real estate coach who specializes in helping agents convert leads through strategic conversation tactics and neighborhood positioning.";

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

fn build_prompt(address: &str, summary: &MetricsSummary) -> String {
    format!(
        "Based on the neighborhood data below, generate exactly 3 actionable tips that a real estate agent can use when presenting this property/area to potential buyers.

PROPERTY ADDRESS: {address}

NEIGHBORHOOD DATA:
- Walk Score: {walk}/100
- Transit Score: {transit}/100
- Bike Score: {bike}/100
- Safety Score: {safety}/100
- Nearby Amenities: {amenities}
- Nearby Schools: {schools}
- Median Household Income: ${income}
- Median Home Value: ${home_value}
- College Educated: {bachelors}%
- Median Age: {age}

Requirements:
1. Each tip should be 15-25 words
2. Focus on actionable strategies agents can use in buyer conversations
3. Make tips specific to this neighborhood's strengths

Respond with a JSON array of 3 strings only:
[\"Tip 1\", \"Tip 2\", \"Tip 3\"]",
        address = address,
        walk = summary.walk_score,
        transit = summary.transit_score,
        bike = summary.bike_score,
        safety = summary.safety_score,
        amenities = summary.amenity_count,
        schools = summary.school_count,
        income = with_commas(summary.median_household_income),
        home_value = with_commas(summary.median_home_value),
        bachelors = summary.bachelors_or_higher,
        age = summary.median_age,
    )
}

/// 解析模型輸出：優先 JSON 陣列，否則擷取編號或引號行
pub fn parse_tips(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    let json_slice = match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    };

    if let Ok(tips) = serde_json::from_str::<Vec<String>>(json_slice) {
        return tips;
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && (line.contains('"')
                    || line.starts_with('•')
                    || line.starts_with('-')
                    || line
                        .split_once('.')
                        .is_some_and(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit())))
        })
        .map(|line| {
            let line = line.trim_start_matches(|c: char| c.is_ascii_digit());
            let line = line.trim_start_matches(&['.', '•', '-'][..]);
            line.replace('"', "").trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .take(3)
        .collect()
}

/// Chat-completions tip generator (OpenAI or any compatible endpoint).
pub struct OpenAiTipGenerator {
    client: ApiClient,
    model: String,
}

impl OpenAiTipGenerator {
    pub fn new(client: ApiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl TipGenerator for OpenAiTipGenerator {
    async fn generate_agent_tips(
        &self,
        address: &str,
        summary: &MetricsSummary,
    ) -> ProviderResult<Vec<String>> {
        let api_key = self.client.api_key()?;
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(address, summary) },
            ],
            "max_tokens": 300,
            "temperature": 0.7,
        });

        let request = self
            .client
            .post("/chat/completions")
            .bearer_auth(api_key)
            .json(&payload);
        let body: ChatResponse = self.client.send_json(request).await?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::MalformedResponse("response did not include choices".into()))?;

        Ok(parse_tips(&content))
    }
}
