use crate::{same_coordinates, same_favorites, should_emit, City, Deduplicator, LocationFix};

fn cities(names: &[&str]) -> Vec<City> {
    names.iter().map(|name| City::new(*name)).collect()
}

#[test]
fn test_should_emit_without_previous() {
    assert!(should_emit(None, &cities(&["a"]), same_favorites));
}

#[test]
fn test_equal_length_favorites_are_suppressed() {
    let previous = cities(&["a", "b"]);
    assert!(!should_emit(Some(&previous), &cities(&["c", "d"]), same_favorites));
    assert!(!should_emit(Some(&previous), &cities(&["b", "a"]), same_favorites));
    assert!(should_emit(Some(&previous), &cities(&["a", "b", "c"]), same_favorites));
    assert!(should_emit(Some(&previous), &cities(&[]), same_favorites));
}

#[test]
fn test_deduplicator_suppresses_all_but_first_of_equal_length() {
    let mut dedup = Deduplicator::new(same_favorites);
    let emitted: Vec<bool> = [
        cities(&["a", "b"]),
        cities(&["c", "d"]),
        cities(&["e", "f"]),
        cities(&["e", "f", "g"]),
        cities(&["h", "i", "j"]),
    ]
    .iter()
    .map(|next| dedup.should_emit(next))
    .collect();

    assert_eq!(emitted, vec![true, false, false, true, false]);
    assert_eq!(dedup.last_approved(), Some(&cities(&["e", "f", "g"])));
}

#[test]
fn test_deduplicator_remembers_only_approved_values() {
    let mut dedup = Deduplicator::new(|a: &i32, b: &i32| (a - b).abs() < 2);
    assert!(dedup.should_emit(&0));
    assert!(!dedup.should_emit(&1));
    // compared against 0, not the suppressed 1
    assert!(dedup.should_emit(&2));
    assert_eq!(dedup.last_approved(), Some(&2));
}

#[test]
fn test_same_coordinates_is_exact() {
    let fix = |lat, lon| Some(LocationFix::new(lat, lon));
    assert!(same_coordinates(&fix(1.0, 2.0), &fix(1.0, 2.0)));
    assert!(!same_coordinates(&fix(1.0, 2.0), &fix(1.0, 2.0001)));
    assert!(!same_coordinates(&fix(1.0, 2.0), &fix(1.0000001, 2.0)));
}

#[test]
fn test_same_coordinates_with_absent_fix() {
    assert!(same_coordinates(&None, &None));
    assert!(!same_coordinates(&None, &Some(LocationFix::new(0.0, 0.0))));
    assert!(!same_coordinates(&Some(LocationFix::new(0.0, 0.0)), &None));
}

#[test]
fn test_location_dedup_sequence() {
    let mut dedup = Deduplicator::new(same_coordinates);
    assert!(dedup.should_emit(&None));
    assert!(!dedup.should_emit(&None));
    assert!(dedup.should_emit(&Some(LocationFix::new(41.0, 29.0))));
    assert!(!dedup.should_emit(&Some(LocationFix::new(41.0, 29.0))));
    assert!(dedup.should_emit(&Some(LocationFix::new(41.0, 29.5))));
}
