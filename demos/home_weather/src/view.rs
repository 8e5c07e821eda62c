use skyrx::{HomeState, LocationState};
use tracing::info;

pub fn show_home(state: &HomeState) {
    info!("=================================");
    match (&state.favorites, &state.error) {
        (_, Some(error)) => info!("| favorites failed: {error} (loading: {})", state.is_loading),
        (Some(favorites), None) => {
            for weather in favorites {
                info!(
                    "| {:<12} {:>5.1}°C {}",
                    weather.city, weather.temperature, weather.description
                );
            }
        }
        (None, None) => info!("| loading favorites..."),
    }
}

pub fn show_location(state: &LocationState) {
    match &state.current {
        Some(weather) => info!(
            "| here: {} {:.1}°C {}",
            weather.city, weather.temperature, weather.description
        ),
        None => info!("| here: unknown"),
    }
}
