use async_trait::async_trait;
use skyrx::{FetchError, TempRange, Weather, WeatherDataSource};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Canned provider with network-like latency.
pub struct FakeProvider {
    latency: Duration,
}

impl FakeProvider {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl WeatherDataSource for FakeProvider {
    async fn weather_data(
        &self,
        city_name: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Weather, FetchError> {
        debug!(?city_name, ?latitude, ?longitude, "provider request");
        sleep(self.latency).await;
        let weather = match (city_name, latitude, longitude) {
            (Some("Atlantis"), _, _) => return Err(FetchError::NotFound("Atlantis".into())),
            (Some(name), _, _) => Weather::new(name, "scattered clouds", 18.5),
            (None, Some(latitude), Some(longitude)) => {
                Weather::new(format!("{latitude:.2},{longitude:.2}"), "clear sky", 22.0)
            }
            _ => return Err(FetchError::error("city name or coordinates required")),
        };
        Ok(weather.with_temp(TempRange {
            day: 21.0,
            eve: 19.0,
            max: 24.0,
            min: 14.0,
            morn: 15.0,
            night: 13.0,
        }))
    }
}
