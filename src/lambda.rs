#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use neighborhood_insights::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use neighborhood_insights::{build_engine, LambdaConfig, Location, NeighborhoodProfile};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub message: String,
    pub profile: NeighborhoodProfile,
}

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting neighborhood insights Lambda function");

    let request = event.payload;
    neighborhood_insights::utils::validation::validate_non_empty_string("address", &request.address)
        .and_then(|_| {
            neighborhood_insights::utils::validation::validate_coordinates(
                request.latitude,
                request.longitude,
            )
        })
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    // 創建Lambda配置
    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let engine = build_engine(&lambda_config.app)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let location = Location::new(request.latitude, request.longitude, request.address.trim());
    let profile = engine.fetch_comprehensive_data(&location).await;

    let response = Response {
        message: format!(
            "Neighborhood profile generated with quality score {}",
            profile.quality_score
        ),
        profile,
    };

    tracing::info!("Neighborhood insights Lambda function completed successfully");
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
