use crate::{
    map_home, map_location, same_coordinates, same_favorites, City, CurrentWeatherFetch,
    FavoritesSource, HomeState, HubConfig, HubError, LocationFix, LocationSource, LocationState,
    SharedStateHub, SkyStreamExt, SourceError, SourceStream, State, Subscription,
    WeatherListFetch,
};
use futures::{FutureExt, StreamExt, TryStreamExt};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// One feature pipeline: upstream source, dedup, resolve, shared hub.
///
/// `resolve` turns an approved upstream value into the presentation state,
/// typically by fetching and mapping the outcome. Source errors are not
/// handled here; they crash the hub and reach the subscribers.
pub struct StateOrchestrator<S: State> {
    name: &'static str,
    hub: SharedStateHub<S>,
}

impl<S: State> StateOrchestrator<S> {
    pub fn new<T, Src, Equals, R, Fut>(
        name: &'static str,
        seed: S,
        config: HubConfig,
        source: Src,
        equals: Equals,
        resolve: R,
    ) -> Self
    where
        T: Clone + Send + 'static,
        Src: Fn() -> SourceStream<T> + Send + Sync + 'static,
        Equals: Fn(&T, &T) -> bool + Clone + Send + Sync + 'static,
        R: Fn(T) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = S> + Send + 'static,
    {
        let factory = move || -> SourceStream<S> {
            let resolve = resolve.clone();
            source()
                .distinct_until_changed_by(equals.clone())
                .and_then(move |value| {
                    debug!(pipeline = name, "upstream changed, resolving");
                    resolve(value).map(Ok::<S, SourceError>)
                })
                .boxed()
        };
        StateOrchestrator {
            name,
            hub: SharedStateHub::new(seed, config, factory),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn hub(&self) -> &SharedStateHub<S> {
        &self.hub
    }

    pub fn subscribe(&self) -> Result<(Subscription<S>, S), HubError> {
        self.hub.subscribe()
    }

    /// Restarts the pipeline after its producer crashed.
    pub fn restart(&self) -> bool {
        let restarted = self.hub.restart();
        if restarted {
            debug!(pipeline = self.name, "pipeline restarted");
        }
        restarted
    }
}

/// Favorites list to [`HomeState`]. A new fetch runs only when the number of
/// favorites changes.
pub fn home_orchestrator(
    favorites: Arc<dyn FavoritesSource>,
    fetch: Arc<dyn WeatherListFetch>,
    config: HubConfig,
) -> StateOrchestrator<HomeState> {
    StateOrchestrator::new(
        "home",
        HomeState::default(),
        config,
        move || favorites.favorite_cities(),
        same_favorites,
        move |cities: Vec<City>| {
            let fetch = Arc::clone(&fetch);
            async move { map_home(fetch.fetch_weather_list(cities).await) }
        },
    )
}

/// Device location to [`LocationState`]. Without a fix the fetch is skipped and
/// the state has no current weather.
pub fn location_orchestrator(
    location: Arc<dyn LocationSource>,
    fetch: Arc<dyn CurrentWeatherFetch>,
    config: HubConfig,
) -> StateOrchestrator<LocationState> {
    StateOrchestrator::new(
        "location",
        LocationState::default(),
        config,
        move || location.current_location(),
        same_coordinates,
        move |fix: Option<LocationFix>| {
            let fetch = Arc::clone(&fetch);
            async move {
                match fix {
                    Some(fix) => map_location(fetch.fetch_current_weather(fix).await),
                    None => {
                        debug!("no location fix, current weather fetch skipped");
                        LocationState { current: None }
                    }
                }
            }
        },
    )
}
