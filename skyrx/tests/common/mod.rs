#![allow(dead_code)]

use skyrx::mock::{MockSource, MockWeatherService};
use skyrx::{City, HomeConfig, HomeModel, HubConfig, LocationFix};
use std::sync::Arc;

pub struct Fixture {
    pub favorites: MockSource<Vec<City>>,
    pub location: MockSource<Option<LocationFix>>,
    pub service: Arc<MockWeatherService>,
}

impl Fixture {
    pub fn new(service: MockWeatherService) -> Self {
        Fixture {
            favorites: MockSource::new(),
            location: MockSource::new(),
            service: Arc::new(service),
        }
    }

    pub fn model(&self) -> HomeModel {
        self.model_with(HomeConfig::uniform(HubConfig::default()))
    }

    pub fn model_with(&self, config: HomeConfig) -> HomeModel {
        HomeModel::new(
            Arc::new(self.favorites.clone()),
            Arc::new(self.location.clone()),
            self.service.clone(),
            self.service.clone(),
            config,
        )
    }
}

pub fn cities(names: &[&str]) -> Vec<City> {
    names.iter().map(|name| City::new(*name)).collect()
}

pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
