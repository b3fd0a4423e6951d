//! 链路收发计数
//!
//! 每条链路一组计数：tx 记在源端设备的 MacTx 上，rx 记在目的端设备的
//! MacRx 上。回调闭包持有创建它的那张表的 `Arc`，所以上一个时间片遗留的
//! 回调只会改旧表，不会污染新表。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::stack::TraceSink;

#[derive(Debug, Default)]
pub struct LinkCounters {
    tx: AtomicU64,
    rx: AtomicU64,
}

impl LinkCounters {
    pub fn tx_packets(&self) -> u64 {
        self.tx.load(Ordering::Relaxed)
    }

    pub fn rx_packets(&self) -> u64 {
        self.rx.load(Ordering::Relaxed)
    }
}

/// 某条链路在某一时刻的计数快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkSnapshot {
    pub tx_packets: u64,
    pub rx_packets: u64,
}

impl LinkSnapshot {
    pub fn lost_packets(&self) -> u64 {
        self.tx_packets.saturating_sub(self.rx_packets)
    }

    /// 丢包率；没有发送过任何包时为 0
    pub fn loss_rate(&self) -> f64 {
        if self.tx_packets == 0 {
            0.0
        } else {
            self.lost_packets() as f64 / self.tx_packets as f64
        }
    }
}

#[derive(Debug, Default)]
pub struct LinkStatsTable {
    links: Vec<LinkCounters>,
}

impl LinkStatsTable {
    pub fn new(links: usize) -> Arc<Self> {
        Arc::new(Self {
            links: (0..links).map(|_| LinkCounters::default()).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// 越界的链路编号直接忽略
    pub fn record_tx(&self, link: usize) {
        if let Some(c) = self.links.get(link) {
            c.tx.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 越界的链路编号直接忽略
    pub fn record_rx(&self, link: usize) {
        if let Some(c) = self.links.get(link) {
            c.rx.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self, link: usize) -> LinkSnapshot {
        self.links
            .get(link)
            .map(|c| LinkSnapshot {
                tx_packets: c.tx_packets(),
                rx_packets: c.rx_packets(),
            })
            .unwrap_or_default()
    }

    pub fn tx_sink(self: &Arc<Self>, link: usize) -> TraceSink {
        let table = Arc::clone(self);
        Box::new(move || table.record_tx(link))
    }

    pub fn rx_sink(self: &Arc<Self>, link: usize) -> TraceSink {
        let table = Arc::clone(self);
        Box::new(move || table.record_rx(link))
    }
}
