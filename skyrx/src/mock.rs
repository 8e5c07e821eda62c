//! In-memory collaborators for tests and demos.

use crate::{
    City, CurrentWeatherFetch, FavoritesSource, FetchError, FetchOutcome, LocationFix,
    LocationSource, SourceError, SourceStream, Weather, WeatherDataSource, WeatherListFetch,
};
use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::StreamExt;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct MockSourceInner<T> {
    current: Option<T>,
    senders: Vec<UnboundedSender<Result<T, SourceError>>>,
    opened: usize,
}

/// A controllable upstream source.
///
/// Every opened stream first replays the latest emitted value, then receives
/// each later [`emit`](Self::emit) or [`fail`](Self::fail) live.
pub struct MockSource<T> {
    inner: Arc<Mutex<MockSourceInner<T>>>,
}

impl<T> Clone for MockSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Default for MockSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> MockSource<T> {
    pub fn new() -> Self {
        MockSource {
            inner: Arc::new(Mutex::new(MockSourceInner {
                current: None,
                senders: Vec::new(),
                opened: 0,
            })),
        }
    }

    pub fn with_value(value: T) -> Self {
        let source = Self::new();
        lock(&source.inner).current = Some(value);
        source
    }

    pub fn emit(&self, value: T) {
        let mut inner = lock(&self.inner);
        inner
            .senders
            .retain(|sender| sender.unbounded_send(Ok(value.clone())).is_ok());
        inner.current = Some(value);
    }

    pub fn fail(&self, error: SourceError) {
        let mut inner = lock(&self.inner);
        inner
            .senders
            .retain(|sender| sender.unbounded_send(Err(error.clone())).is_ok());
    }

    /// Ends every open stream.
    pub fn finish(&self) {
        lock(&self.inner).senders.clear();
    }

    /// How many streams were opened so far.
    pub fn open_count(&self) -> usize {
        lock(&self.inner).opened
    }

    /// Streams still being consumed.
    pub fn live_count(&self) -> usize {
        let mut inner = lock(&self.inner);
        inner.senders.retain(|sender| !sender.is_closed());
        inner.senders.len()
    }

    pub fn stream(&self) -> SourceStream<T> {
        let (sender, receiver) = unbounded();
        let mut inner = lock(&self.inner);
        if let Some(current) = inner.current.clone() {
            let _ = sender.unbounded_send(Ok(current));
        }
        inner.senders.push(sender);
        inner.opened += 1;
        receiver.boxed()
    }
}

impl FavoritesSource for MockSource<Vec<City>> {
    fn favorite_cities(&self) -> SourceStream<Vec<City>> {
        self.stream()
    }
}

impl LocationSource for MockSource<Option<LocationFix>> {
    fn current_location(&self) -> SourceStream<Option<LocationFix>> {
        self.stream()
    }
}

/// One recorded fetch invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchCall {
    WeatherList(Vec<City>),
    CurrentWeather(LocationFix),
}

/// Fetch double with queued results and a call history.
///
/// When no result is queued, a list fetch succeeds with one clear-sky entry per
/// city and a current-weather fetch succeeds with an entry named after the
/// coordinates.
#[derive(Default)]
pub struct MockWeatherService {
    calls: Mutex<Vec<FetchCall>>,
    list_results: Mutex<VecDeque<FetchOutcome<Vec<Weather>>>>,
    current_results: Mutex<VecDeque<FetchOutcome<Weather>>>,
    delay: Option<Duration>,
}

impl MockWeatherService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..self
        }
    }

    pub fn push_list_result(&self, outcome: FetchOutcome<Vec<Weather>>) {
        lock(&self.list_results).push_back(outcome);
    }

    pub fn push_current_result(&self, outcome: FetchOutcome<Weather>) {
        lock(&self.current_results).push_back(outcome);
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        lock(&self.calls).clone()
    }

    pub fn list_call_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, FetchCall::WeatherList(_)))
            .count()
    }

    pub fn current_call_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| matches!(call, FetchCall::CurrentWeather(_)))
            .count()
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            sleep(delay).await;
        }
    }
}

pub fn clear_sky(city: &str) -> Weather {
    Weather::new(city, "clear sky", 20.0)
}

#[async_trait]
impl WeatherListFetch for MockWeatherService {
    async fn fetch_weather_list(&self, cities: Vec<City>) -> FetchOutcome<Vec<Weather>> {
        lock(&self.calls).push(FetchCall::WeatherList(cities.clone()));
        self.wait().await;
        let queued = lock(&self.list_results).pop_front();
        queued.unwrap_or_else(|| {
            FetchOutcome::succeeded(cities.iter().map(|city| clear_sky(&city.name)).collect())
        })
    }
}

#[async_trait]
impl CurrentWeatherFetch for MockWeatherService {
    async fn fetch_current_weather(&self, fix: LocationFix) -> FetchOutcome<Weather> {
        lock(&self.calls).push(FetchCall::CurrentWeather(fix));
        self.wait().await;
        let queued = lock(&self.current_results).pop_front();
        queued.unwrap_or_else(|| {
            FetchOutcome::succeeded(clear_sky(&format!("{},{}", fix.latitude, fix.longitude)))
        })
    }
}

/// Provider double answering from a fixed table keyed by city name, or by
/// `"lat,lon"` for coordinate-only requests.
#[derive(Default)]
pub struct MockWeatherDataSource {
    table: HashMap<String, Result<Weather, FetchError>>,
    requests: Mutex<usize>,
}

impl MockWeatherDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weather(mut self, key: impl Into<String>, weather: Weather) -> Self {
        self.table.insert(key.into(), Ok(weather));
        self
    }

    pub fn with_failure(mut self, key: impl Into<String>, error: FetchError) -> Self {
        self.table.insert(key.into(), Err(error));
        self
    }

    pub fn request_count(&self) -> usize {
        *lock(&self.requests)
    }
}

#[async_trait]
impl WeatherDataSource for MockWeatherDataSource {
    async fn weather_data(
        &self,
        city_name: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Weather, FetchError> {
        *lock(&self.requests) += 1;
        let key = match (city_name, latitude, longitude) {
            (Some(name), _, _) => name.to_string(),
            (None, Some(latitude), Some(longitude)) => format!("{latitude},{longitude}"),
            _ => return Err(FetchError::error("city name or coordinates required")),
        };
        match self.table.get(&key) {
            Some(result) => result.clone(),
            None => Err(FetchError::NotFound(key)),
        }
    }
}
