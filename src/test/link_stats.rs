use crate::stats::{LinkSnapshot, LinkStatsTable};

#[test]
fn counters_follow_sinks() {
    let table = LinkStatsTable::new(2);
    let mut tx = table.tx_sink(0);
    let mut rx = table.rx_sink(0);
    for _ in 0..10 {
        tx();
    }
    for _ in 0..7 {
        rx();
    }

    let s = table.snapshot(0);
    assert_eq!(s.tx_packets, 10);
    assert_eq!(s.rx_packets, 7);
    assert_eq!(s.lost_packets(), 3);
    assert!((s.loss_rate() - 0.3).abs() < 1e-12);
    assert_eq!(table.snapshot(1), LinkSnapshot::default());
}

#[test]
fn unknown_link_indices_are_ignored() {
    let table = LinkStatsTable::new(1);
    table.record_tx(5);
    table.record_rx(usize::MAX);
    let mut sink = table.tx_sink(3);
    sink();

    assert_eq!(table.len(), 1);
    assert_eq!(table.snapshot(0), LinkSnapshot::default());
    assert_eq!(table.snapshot(3), LinkSnapshot::default());
}

#[test]
fn zero_tx_reports_zero_loss() {
    let idle = LinkSnapshot::default();
    assert_eq!(idle.loss_rate(), 0.0);
    assert_eq!(idle.lost_packets(), 0);

    // rx 多于 tx（例如反方向的包）不会出现负数
    let odd = LinkSnapshot {
        tx_packets: 2,
        rx_packets: 5,
    };
    assert_eq!(odd.lost_packets(), 0);
    assert_eq!(odd.loss_rate(), 0.0);
}

#[test]
fn sinks_keep_their_own_table_alive() {
    let old = LinkStatsTable::new(1);
    let mut stale = old.tx_sink(0);
    drop(old);

    let fresh = LinkStatsTable::new(1);
    stale();
    assert_eq!(fresh.snapshot(0).tx_packets, 0);
}
