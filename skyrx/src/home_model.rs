use crate::{
    home_orchestrator, location_orchestrator, CurrentWeatherFetch, FavoritesSource,
    GetCurrentWeather, GetWeatherList, HomeConfig, HomeState, HubError, LocationSource,
    LocationState, StateOrchestrator, Subscription, WeatherDataSource, WeatherListFetch,
};
use std::sync::Arc;

/// State holder of the home screen: the favorites pipeline and the current
/// location pipeline, independent of each other.
pub struct HomeModel {
    home: StateOrchestrator<HomeState>,
    location: StateOrchestrator<LocationState>,
}

impl HomeModel {
    pub fn new(
        favorites: Arc<dyn FavoritesSource>,
        location: Arc<dyn LocationSource>,
        weather_list: Arc<dyn WeatherListFetch>,
        current_weather: Arc<dyn CurrentWeatherFetch>,
        config: HomeConfig,
    ) -> Self {
        Self {
            home: home_orchestrator(favorites, weather_list, config.favorites),
            location: location_orchestrator(location, current_weather, config.location),
        }
    }

    /// Wires both fetches to one provider data source.
    pub fn with_data_source<D>(
        favorites: Arc<dyn FavoritesSource>,
        location: Arc<dyn LocationSource>,
        data_source: Arc<D>,
        config: HomeConfig,
    ) -> Self
    where
        D: WeatherDataSource + 'static,
    {
        Self::new(
            favorites,
            location,
            Arc::new(GetWeatherList::new(Arc::clone(&data_source))),
            Arc::new(GetCurrentWeather::new(data_source)),
            config,
        )
    }

    pub fn home(&self) -> &StateOrchestrator<HomeState> {
        &self.home
    }

    pub fn location(&self) -> &StateOrchestrator<LocationState> {
        &self.location
    }

    pub fn subscribe_home(&self) -> Result<(Subscription<HomeState>, HomeState), HubError> {
        self.home.subscribe()
    }

    pub fn subscribe_location(
        &self,
    ) -> Result<(Subscription<LocationState>, LocationState), HubError> {
        self.location.subscribe()
    }

    /// Restarts every crashed pipeline. Returns true if any was restarted.
    pub fn restart(&self) -> bool {
        let home = self.home.restart();
        let location = self.location.restart();
        home || location
    }
}
