use super::*;

#[test]
fn join_picks_more_pessimistic_fact() {
    assert_eq!(Fact::Clean.join(Fact::Dirty), Fact::Dirty);
    assert_eq!(Fact::Dirty.join(Fact::Clean), Fact::Dirty);
    assert_eq!(Fact::Dirty.join(Fact::Escaped), Fact::Escaped);
    assert_eq!(Fact::Clean.join(Fact::Escaped), Fact::Escaped);
}

#[test]
fn join_is_idempotent() {
    assert_eq!(Fact::Clean.join(Fact::Clean), Fact::Clean);
    assert_eq!(Fact::Escaped.join(Fact::Escaped), Fact::Escaped);
}

#[test]
fn only_clean_reports_is_clean() {
    assert!(Fact::Clean.is_clean());
    assert!(!Fact::Dirty.is_clean());
    assert!(!Fact::Escaped.is_clean());
}
