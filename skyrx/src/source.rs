use crate::{City, FetchError, FetchOutcome, LocationFix, SourceStream, Weather};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;

/// Lazy, unbounded sequence of favorites-list snapshots.
///
/// Each call returns a new cold stream; the stream makes no dedup or ordering
/// promise.
pub trait FavoritesSource: Send + Sync {
    fn favorite_cities(&self) -> SourceStream<Vec<City>>;
}

/// Lazy, unbounded sequence of location fixes. `None` means no fix yet.
pub trait LocationSource: Send + Sync {
    fn current_location(&self) -> SourceStream<Option<LocationFix>>;
}

#[async_trait]
pub trait WeatherListFetch: Send + Sync {
    async fn fetch_weather_list(&self, cities: Vec<City>) -> FetchOutcome<Vec<Weather>>;
}

/// Current weather at a location fix. Takes a fix, not an optional one: callers
/// must handle the absent location before fetching.
#[async_trait]
pub trait CurrentWeatherFetch: Send + Sync {
    async fn fetch_current_weather(&self, fix: LocationFix) -> FetchOutcome<Weather>;
}

/// Provider-facing weather lookup by city name and/or coordinates.
#[async_trait]
pub trait WeatherDataSource: Send + Sync {
    async fn weather_data(
        &self,
        city_name: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Weather, FetchError>;
}

/// Fetches the weather of every favorite city concurrently. The first failure
/// fails the whole list.
pub struct GetWeatherList<D> {
    data_source: Arc<D>,
}

impl<D: WeatherDataSource> GetWeatherList<D> {
    pub fn new(data_source: Arc<D>) -> Self {
        Self { data_source }
    }
}

#[async_trait]
impl<D: WeatherDataSource> WeatherListFetch for GetWeatherList<D> {
    async fn fetch_weather_list(&self, cities: Vec<City>) -> FetchOutcome<Vec<Weather>> {
        let requests = cities.iter().map(|city| {
            self.data_source
                .weather_data(Some(city.name.as_str()), city.latitude, city.longitude)
        });
        try_join_all(requests).await.into()
    }
}

pub struct GetCurrentWeather<D> {
    data_source: Arc<D>,
}

impl<D: WeatherDataSource> GetCurrentWeather<D> {
    pub fn new(data_source: Arc<D>) -> Self {
        Self { data_source }
    }
}

#[async_trait]
impl<D: WeatherDataSource> CurrentWeatherFetch for GetCurrentWeather<D> {
    async fn fetch_current_weather(&self, fix: LocationFix) -> FetchOutcome<Weather> {
        self.data_source
            .weather_data(None, Some(fix.latitude), Some(fix.longitude))
            .await
            .into()
    }
}
