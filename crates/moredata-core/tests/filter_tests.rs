#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{member, MemberFilter};
use moredata_core::{CompoundFilter, Filtering, Predicate};

#[test]
fn test_all_filters() {
    let filters = [
        MemberFilter::NameContains("Alice".into()),
        MemberFilter::IsActive,
    ];
    assert_eq!(
        MemberFilter::all_of(&filters).to_string(),
        "name CONTAINS[c] \"Alice\" AND active == 1"
    );
}

#[test]
fn test_any_filters() {
    let filters = [
        MemberFilter::NameContains("Alice".into()),
        MemberFilter::IsActive,
    ];
    assert_eq!(
        MemberFilter::any_of(&filters).to_string(),
        "name CONTAINS[c] \"Alice\" OR active == 1"
    );
}

#[test]
fn test_by_filter() {
    let filter = MemberFilter::NameContains("Alice".into());
    assert_eq!(
        MemberFilter::by(&filter).to_string(),
        "name CONTAINS[c] \"Alice\""
    );
}

#[test]
fn test_not_filter() {
    assert_eq!(
        MemberFilter::negate(&MemberFilter::IsActive).to_string(),
        "NOT active == 1"
    );
}

#[test]
fn test_structural_equality() {
    assert_eq!(MemberFilter::MinimumAge(30), MemberFilter::MinimumAge(30));
    assert_ne!(MemberFilter::MinimumAge(30), MemberFilter::MinimumAge(31));
    assert_eq!(
        MemberFilter::MinimumAge(30).predicate(),
        MemberFilter::MinimumAge(30).predicate()
    );
}

#[test]
fn test_compound_all_matches_conjunction() {
    let filter = MemberFilter::all(vec![
        MemberFilter::MinimumAge(30),
        MemberFilter::NameContains("an".into()),
    ]);
    assert!(filter.predicate().evaluate(&member("1", "Dana", 31)));
    assert!(!filter.predicate().evaluate(&member("2", "Dana", 29)));
    assert!(!filter.predicate().evaluate(&member("3", "Bob", 31)));
}

#[test]
fn test_lookup_miss_matches_nothing() {
    let people = vec![member("1", "Ann", 30), member("2", "Bob", 40)];
    let filter = MemberFilter::resolve(
        "Zed",
        &people[..],
        |m| m.name.as_str(),
        |m| MemberFilter::MinimumAge(m.age),
    );
    assert_eq!(filter, MemberFilter::NoElements);
    assert_eq!(filter.predicate(), Predicate::always_false());
    assert!(people.iter().all(|m| !filter.predicate().evaluate(m)));

    let hit = MemberFilter::resolve(
        "Bob",
        &people[..],
        |m| m.name.as_str(),
        |m| MemberFilter::MinimumAge(m.age),
    );
    assert_eq!(hit, MemberFilter::MinimumAge(40));
}
