//! Scenario: Duplicate Top of Book
//!
//! # Invariants under test
//!
//! 1. Two identical consecutive raw books produce exactly one `Market`.
//! 2. A book that differs only by timestamp is still a duplicate.
//! 3. After a reset (market-data disconnect) the same book is published
//!    again, flagged `First`.

use chrono::{DateTime, Utc};
use xbk_md::MarketNormalizer;
use xbk_schemas::{Exchange, MarketDataFlag, MarketSide, MarketUpdate};

fn book_at(secs: i64) -> MarketUpdate {
    MarketUpdate::new(
        MarketSide::new(99.5, 4.0),
        MarketSide::new(100.5, 6.0),
        DateTime::<Utc>::from_timestamp(1_700_000_000 + secs, 0).unwrap(),
    )
}

#[test]
fn identical_books_publish_once() {
    let mut n = MarketNormalizer::with_default_epsilon(Exchange::new("paper"));
    let published: Vec<_> = [book_at(0), book_at(0), book_at(1)]
        .into_iter()
        .filter_map(|b| n.on_update(b))
        .collect();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].flag, MarketDataFlag::FIRST);
    assert_eq!(n.current().unwrap().update.time, book_at(0).time);
}

#[test]
fn reset_republishes_same_book_as_first() {
    let mut n = MarketNormalizer::with_default_epsilon(Exchange::new("paper"));
    n.on_update(book_at(0)).unwrap();
    n.reset();
    let again = n.on_update(book_at(2)).unwrap();
    assert_eq!(again.flag, MarketDataFlag::FIRST);
}
