use super::*;

#[test]
fn span_len_and_empty() {
    let s = Span::new(4, 10);
    assert_eq!(s.len(), 6);
    assert!(!s.is_empty());
    assert!(Span::at(5).is_empty());
}

#[test]
fn span_contains_and_overlaps() {
    let s = Span::new(10, 20);
    assert!(s.contains(10));
    assert!(!s.contains(20));
    assert!(s.overlaps(Span::new(15, 25)));
    assert!(!s.overlaps(Span::new(20, 30)));
}

#[test]
fn span_merge() {
    let a = Span::new(5, 10);
    let b = Span::new(2, 7);
    assert_eq!(a.merge(b), Span::new(2, 10));
}

#[test]
fn span_slice() {
    let text = "hello world";
    assert_eq!(Span::new(0, 5).slice(text), "hello");
    assert_eq!(Span::new(6, 11).slice(text), "world");
}

#[test]
fn dummy_span() {
    assert!(Span::dummy().is_dummy());
    assert!(!Span::new(0, 1).is_dummy());
}
