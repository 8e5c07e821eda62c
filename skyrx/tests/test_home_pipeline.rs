use crate::common::{cities, settle, Fixture};
use skyrx::mock::{FetchCall, MockWeatherService};
use skyrx::{FetchError, FetchOutcome, HomeState, Weather};
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;

mod common;

#[tokio::test]
async fn test_favorites_fetch_success() {
    let fixture = Fixture::new(MockWeatherService::new());
    let weather_a = Weather::new("CityA", "sunny", 24.0);
    fixture
        .service
        .push_list_result(FetchOutcome::succeeded(vec![weather_a.clone()]));
    let model = fixture.model();

    let (mut subscription, initial) = model.subscribe_home().unwrap();
    assert_eq!(initial, HomeState::default());

    fixture.favorites.emit(cities(&["CityA"]));
    assert_eq!(
        subscription.changed().await,
        Some(Ok(HomeState {
            is_loading: false,
            favorites: Some(vec![weather_a]),
            error: None,
        }))
    );
}

#[tokio::test]
async fn test_length_change_triggers_second_fetch_for_all_observers() {
    let fixture = Fixture::new(MockWeatherService::new());
    let model = fixture.model();
    let (mut first, _) = model.subscribe_home().unwrap();
    let (mut second, _) = model.subscribe_home().unwrap();

    fixture.favorites.emit(cities(&["CityA"]));
    fixture.favorites.emit(cities(&["CityA", "CityB"]));

    for subscription in [&mut first, &mut second] {
        let state = subscription.changed().await.unwrap().unwrap();
        assert_eq!(state.favorites.map(|list| list.len()), Some(1));
        let state = subscription.changed().await.unwrap().unwrap();
        assert_eq!(state.favorites.map(|list| list.len()), Some(2));
    }

    assert_eq!(
        fixture.service.calls(),
        vec![
            FetchCall::WeatherList(cities(&["CityA"])),
            FetchCall::WeatherList(cities(&["CityA", "CityB"])),
        ]
    );
    let (_late, initial) = model.subscribe_home().unwrap();
    assert_eq!(initial.favorites.map(|list| list.len()), Some(2));
}

#[tokio::test]
async fn test_same_length_change_never_fetches() {
    let fixture = Fixture::new(MockWeatherService::new());
    let model = fixture.model();
    let (mut subscription, _) = model.subscribe_home().unwrap();

    fixture.favorites.emit(cities(&["CityA", "CityB"]));
    assert!(subscription.changed().await.is_some());

    fixture.favorites.emit(cities(&["CityC", "CityD"]));
    fixture.favorites.emit(cities(&["CityB", "CityA"]));
    settle().await;

    assert_eq!(fixture.service.list_call_count(), 1);
    assert_eq!(subscription.try_changed(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_fetch_failure_is_loading_with_error() {
    let fixture = Fixture::new(MockWeatherService::new());
    fixture
        .service
        .push_list_result(FetchOutcome::failed(FetchError::error("HTTP 500")));
    let model = fixture.model();
    let (mut subscription, _) = model.subscribe_home().unwrap();

    fixture.favorites.emit(cities(&["CityA"]));
    assert_eq!(
        subscription.changed().await,
        Some(Ok(HomeState {
            is_loading: true,
            favorites: None,
            error: Some("HTTP 500".to_string()),
        }))
    );

    fixture.favorites.emit(cities(&["CityA", "CityB"]));
    let state = subscription.changed().await.unwrap().unwrap();
    assert!(!state.is_loading);
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_resubscribe_within_grace_reuses_fetch() {
    let fixture = Fixture::new(MockWeatherService::new().with_delay(Duration::from_millis(200)));
    let model = fixture.model();

    fixture.favorites.emit(cities(&["CityA"]));
    let (mut subscription, _) = model.subscribe_home().unwrap();
    assert!(subscription.changed().await.is_some());
    drop(subscription);

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    let (_subscription, initial) = model.subscribe_home().unwrap();
    assert!(!initial.is_loading);

    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert_eq!(fixture.service.list_call_count(), 1);
    assert_eq!(fixture.favorites.open_count(), 1);
    assert_eq!(model.home().hub().stats().producer_cancels, 0);
}

#[tokio::test(start_paused = true)]
async fn test_resubscribe_after_grace_fetches_again() {
    let fixture = Fixture::new(MockWeatherService::new());
    let model = fixture.model();

    fixture.favorites.emit(cities(&["CityA"]));
    let (mut subscription, _) = model.subscribe_home().unwrap();
    assert!(subscription.changed().await.is_some());
    drop(subscription);

    tokio::time::sleep(Duration::from_millis(5_500)).await;
    settle().await;
    let (mut subscription, initial) = model.subscribe_home().unwrap();
    assert_eq!(initial, HomeState::default());
    assert!(subscription.changed().await.is_some());
    assert_eq!(fixture.service.list_call_count(), 2);
    assert_eq!(fixture.favorites.open_count(), 2);
}
