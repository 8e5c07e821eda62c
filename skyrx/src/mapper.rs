use crate::{FetchOutcome, State, Weather};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Presentation state of the favorites list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HomeState {
    pub is_loading: bool,
    pub favorites: Option<Vec<Weather>>,
    pub error: Option<String>,
}

impl State for HomeState {}

impl Default for HomeState {
    fn default() -> Self {
        HomeState {
            is_loading: true,
            favorites: None,
            error: None,
        }
    }
}

/// Presentation state of the weather at the device location.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationState {
    pub current: Option<Weather>,
}

impl State for LocationState {}

/// Maps a favorites fetch into the home state.
///
/// A failure keeps `is_loading` set next to the error message.
pub fn map_home(outcome: FetchOutcome<Vec<Weather>>) -> HomeState {
    match outcome {
        FetchOutcome::Pending => HomeState {
            is_loading: true,
            favorites: None,
            error: None,
        },
        FetchOutcome::Succeeded { value } => HomeState {
            is_loading: false,
            favorites: Some(value),
            error: None,
        },
        FetchOutcome::Failed { error } => HomeState {
            is_loading: true,
            favorites: None,
            error: Some(error.to_string()),
        },
    }
}

/// Maps a current-weather fetch into the location state. Failures are silent.
pub fn map_location(outcome: FetchOutcome<Weather>) -> LocationState {
    match outcome {
        FetchOutcome::Succeeded { value } => LocationState {
            current: Some(value),
        },
        FetchOutcome::Pending | FetchOutcome::Failed { .. } => LocationState { current: None },
    }
}

impl From<FetchOutcome<Vec<Weather>>> for HomeState {
    fn from(outcome: FetchOutcome<Vec<Weather>>) -> Self {
        map_home(outcome)
    }
}

impl From<FetchOutcome<Weather>> for LocationState {
    fn from(outcome: FetchOutcome<Weather>) -> Self {
        map_location(outcome)
    }
}
