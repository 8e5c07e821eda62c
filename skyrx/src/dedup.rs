use crate::{City, LocationFix};
use tracing::trace;

/// Decides whether `next` should be emitted after `previous`.
///
/// Emits when nothing was approved yet, or when `equals` reports a change.
pub fn should_emit<T, F>(previous: Option<&T>, next: &T, equals: F) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    match previous {
        None => true,
        Some(previous) => !equals(previous, next),
    }
}

/// Stateful filter that suppresses values considered unchanged by an injected
/// equality rule.
///
/// Only approved values are remembered: a suppressed value never becomes the
/// reference for the next comparison.
pub struct Deduplicator<T, F> {
    last: Option<T>,
    equals: F,
}

impl<T, F> Deduplicator<T, F>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    pub fn new(equals: F) -> Self {
        Self { last: None, equals }
    }

    pub fn should_emit(&mut self, next: &T) -> bool {
        if should_emit(self.last.as_ref(), next, &self.equals) {
            self.last = Some(next.clone());
            true
        } else {
            trace!("dedup suppressed unchanged value");
            false
        }
    }

    pub fn last_approved(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

/// Favorites lists are equal when they have the same length. Content or order
/// changes that keep the length are treated as no change.
pub fn same_length<T>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len()
}

pub fn same_favorites(a: &Vec<City>, b: &Vec<City>) -> bool {
    same_length(a, b)
}

/// Location fixes are equal when latitude and longitude are identical values.
/// No tolerance is applied; two absent fixes are equal.
pub fn same_coordinates(a: &Option<LocationFix>, b: &Option<LocationFix>) -> bool {
    let latitude = |fix: &Option<LocationFix>| fix.map(|f| f.latitude.to_bits());
    let longitude = |fix: &Option<LocationFix>| fix.map(|f| f.longitude.to_bits());
    latitude(a) == latitude(b) && longitude(a) == longitude(b)
}
