//! Scenario: Market Data, Connectivity and Positions on One Stream
//!
//! # Invariants under test
//!
//! 1. Two identical consecutive books publish one `MarketData` event.
//! 2. `ConnectChanged` fires once per combined transition, only when both
//!    channels are connected (or one of them drops).
//! 3. A market-data disconnect clears the book before the connectivity
//!    change is published; the next book is flagged `First`.
//! 4. `PositionUpdate` fires only for new currencies or changed amounts,
//!    stamped with the venue; `positions()` lists one entry per currency.
//! 5. All events share one channel and arrive in emission order.

use xbk_runtime::{BrokerEvent, GatewayEvent};
use xbk_schemas::{ConnectivityStatus, Currency, CurrencyPosition, MarketDataFlag};
use xbk_testkit::{book, drain, paper_facade};

use ConnectivityStatus::{Connected, Disconnected};

fn kinds(events: &[BrokerEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|ev| match ev {
            BrokerEvent::OrderUpdate(_) => "order",
            BrokerEvent::PositionUpdate(_) => "position",
            BrokerEvent::MarketData(_) => "market",
            BrokerEvent::ConnectChanged { .. } => "connect",
        })
        .collect()
}

#[test]
fn interleaved_inputs_publish_in_order() {
    let mut f = paper_facade();
    let mut rx = f.subscribe();

    let inputs = vec![
        GatewayEvent::MarketDataConnectivity { status: Connected },
        GatewayEvent::OrderEntryConnectivity { status: Connected },
        GatewayEvent::MarketData(book((10.0, 1.0), (10.5, 2.0))),
        GatewayEvent::MarketData(book((10.0, 1.0), (10.5, 2.0))),
        GatewayEvent::Position(CurrencyPosition::new(Currency::new("USD"), 1_000.0)),
        GatewayEvent::Position(CurrencyPosition::new(Currency::new("USD"), 1_000.0)),
        GatewayEvent::MarketData(book((10.1, 1.0), (10.5, 2.0))),
        GatewayEvent::MarketDataConnectivity {
            status: Disconnected,
        },
        GatewayEvent::MarketData(book((10.1, 1.0), (10.5, 2.0))),
    ];
    for ev in inputs {
        f.handle(ev).unwrap();
    }

    let events = drain(&mut rx);
    assert_eq!(
        kinds(&events),
        vec!["connect", "market", "position", "market", "connect", "market"]
    );

    let flags: Vec<MarketDataFlag> = events
        .iter()
        .filter_map(|ev| match ev {
            BrokerEvent::MarketData(m) => Some(m.flag),
            _ => None,
        })
        .collect();
    assert_eq!(
        flags,
        vec![
            MarketDataFlag::FIRST,
            MarketDataFlag::PRICE_CHANGED | MarketDataFlag::NO_CHANGE,
            MarketDataFlag::FIRST,
        ]
    );

    assert_eq!(
        events[0],
        BrokerEvent::ConnectChanged { status: Connected }
    );
    assert_eq!(
        events[4],
        BrokerEvent::ConnectChanged {
            status: Disconnected
        }
    );
    assert_eq!(f.connect_status(), Disconnected);
}

#[test]
fn positions_are_stamped_and_deduplicated() {
    let mut f = paper_facade();
    let mut rx = f.subscribe();

    f.on_position(CurrencyPosition::new(Currency::new("BTC"), 0.5));
    f.on_position(CurrencyPosition::new(Currency::new("BTC"), 0.5));
    f.on_position(CurrencyPosition::new(Currency::new("BTC"), 0.75));

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    let BrokerEvent::PositionUpdate(p) = &events[1] else {
        panic!("expected position update");
    };
    assert_eq!(p.amount, 0.75);
    assert_eq!(p.exchange.as_str(), "paper");
    assert_eq!(f.get_position(&Currency::new("BTC")), Some(p));
    assert_eq!(f.get_position(&Currency::new("ETH")), None);

    f.on_position(CurrencyPosition::new(Currency::new("ETH"), 2.0));
    let held: Vec<(&str, f64)> = f
        .positions()
        .map(|p| (p.currency.as_str(), p.amount))
        .collect();
    assert_eq!(held, vec![("BTC", 0.75), ("ETH", 2.0)]);
}

#[test]
fn late_subscriber_sees_only_later_events() {
    let mut f = paper_facade();
    f.on_market_data(book((1.0, 1.0), (2.0, 1.0)));
    let mut rx = f.subscribe();
    f.on_market_data(book((1.0, 2.0), (2.0, 1.0)));
    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert!(f.current_book().is_some());
}
