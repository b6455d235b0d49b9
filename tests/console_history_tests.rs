//! Command history ring tests

use rp2350_eval::console::history::History;
use rp2350_eval::console::HISTORY_MAX;

#[test]
fn test_commit_puts_newest_at_slot_zero() {
    let mut h = History::new();
    h.commit("first");
    h.commit("second");
    assert_eq!(h.count(), 2);
    assert_eq!(h.entry(0), Some("second"));
    assert_eq!(h.entry(1), Some("first"));
}

#[test]
fn test_count_saturates_at_capacity() {
    let mut h = History::new();
    for i in 0..HISTORY_MAX + 3 {
        h.commit(&format!("cmd{}", i));
    }
    assert_eq!(h.count(), HISTORY_MAX);
    // Oldest three fell off the bottom.
    assert_eq!(h.entry(0), Some(format!("cmd{}", HISTORY_MAX + 2).as_str()));
    assert_eq!(h.entry(HISTORY_MAX - 1), Some("cmd3"));
}

#[test]
fn test_browse_up_walks_older() {
    let mut h = History::new();
    h.commit("one");
    h.commit("two");
    assert_eq!(h.browse_up(), Some("two"));
    assert_eq!(h.browse_up(), Some("one"));
    // Nothing older: stays put.
    assert_eq!(h.browse_up(), None);
    assert!(h.is_browsing());
}

#[test]
fn test_browse_up_on_empty_history() {
    let mut h = History::new();
    assert_eq!(h.browse_up(), None);
    assert!(!h.is_browsing());
}

#[test]
fn test_browse_down_walks_newer_then_clears() {
    let mut h = History::new();
    h.commit("one");
    h.commit("two");
    h.browse_up();
    h.browse_up();
    assert_eq!(h.browse_down(), Some(Some("two")));
    // Stepping past the newest entry means back to an empty line.
    assert_eq!(h.browse_down(), Some(None));
    assert!(!h.is_browsing());
}

#[test]
fn test_browse_down_without_browsing_is_noop() {
    let mut h = History::new();
    h.commit("one");
    assert_eq!(h.browse_down(), None);
}

#[test]
fn test_commit_resets_browse_position() {
    let mut h = History::new();
    h.commit("one");
    h.commit("two");
    h.browse_up();
    h.browse_up();
    h.commit("three");
    assert!(!h.is_browsing());
    // Browsing starts from the newest entry again.
    assert_eq!(h.browse_up(), Some("three"));
}

#[test]
fn test_duplicate_lines_are_stored() {
    let mut h = History::new();
    h.commit("sys");
    h.commit("sys");
    assert_eq!(h.count(), 2);
    assert_eq!(h.entry(0), Some("sys"));
    assert_eq!(h.entry(1), Some("sys"));
}
