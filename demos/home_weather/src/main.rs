use crate::provider::FakeProvider;
use crate::tracing_setup::tracing_init;
use crate::view::{show_home, show_location};
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use skyrx::mock::MockSource;
use skyrx::{City, HomeConfig, HomeModel, HubConfig, LocationFix, SourceError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

mod provider;
mod tracing_setup;
mod view;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_init()?;

    let favorites = MockSource::with_value(vec![City::new("Izmir")]);
    let location = MockSource::<Option<LocationFix>>::with_value(None);
    let model = Arc::new(HomeModel::with_data_source(
        Arc::new(favorites.clone()),
        Arc::new(location.clone()),
        Arc::new(FakeProvider::new(Duration::from_millis(300))),
        HomeConfig::uniform(HubConfig::from_millis(1_000)),
    ));

    // Restart the location pipeline whenever its source crashes.
    let watcher = model.clone();
    tokio::spawn(
        model
            .location()
            .hub()
            .status_signal()
            .for_each(move |status| {
                if status.is_crashed() {
                    warn!("location pipeline crashed: {status:?}");
                    watcher.restart();
                }
                async {}
            }),
    );

    let (home, initial) = model.subscribe_home()?;
    show_home(&initial);
    let home_view = tokio::spawn(home.for_each(|state| {
        match state {
            Ok(state) => show_home(&state),
            Err(error) => warn!("home pipeline stopped: {error}"),
        }
        async {}
    }));

    let (mut here, initial) = model.subscribe_location()?;
    show_location(&initial);

    tokio::spawn(async move {
        sleep(Duration::from_secs(1)).await;
        location.emit(Some(LocationFix::new(38.42, 27.14)));
        sleep(Duration::from_secs(1)).await;
        favorites.emit(vec![City::new("Izmir"), City::new("Ankara")]);
        sleep(Duration::from_secs(1)).await;
        // same length: no refetch
        favorites.emit(vec![City::new("Izmir"), City::new("Bursa")]);
        sleep(Duration::from_secs(1)).await;
        favorites.emit(vec![City::new("Izmir"), City::new("Bursa"), City::new("Atlantis")]);
        sleep(Duration::from_secs(1)).await;
        location.fail(SourceError::PermissionDenied);
        sleep(Duration::from_secs(1)).await;
        favorites.finish();
    });

    while let Some(state) = here.changed().await {
        match state {
            Ok(state) => show_location(&state),
            Err(error) => {
                warn!("location pipeline stopped: {error}");
                break;
            }
        }
    }

    model.home().hub().close();
    home_view.await?;
    info!("=================================");
    info!("  Main thread | Finish");
    Ok(())
}
