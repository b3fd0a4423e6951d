//! 流监控
//!
//! 按五元组给流分配编号（从 1 开始），在源节点发出时记录发送，
//! 在目的节点上交时记录接收、时延和抖动。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use crate::sim::SimTime;

pub const PROTO_UDP: u8 = 17;

/// 流五元组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiveTuple {
    pub protocol: u8,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
}

/// 单个流的原始计数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowRecord {
    pub tx_packets: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub rx_bytes: u64,
    pub delay_sum: SimTime,
    pub jitter_sum: SimTime,
    pub last_delay: SimTime,
    pub first_tx: Option<SimTime>,
    pub last_tx: Option<SimTime>,
    pub first_rx: Option<SimTime>,
    pub last_rx: Option<SimTime>,
}

/// 流编号 + 五元组 + 计数
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEntry {
    pub flow_id: u32,
    pub tuple: FiveTuple,
    pub record: FlowRecord,
}

#[derive(Debug, Default)]
pub struct FlowMonitor {
    ids: HashMap<FiveTuple, u32>,
    flows: Vec<FlowEntry>,
}

impl FlowMonitor {
    fn entry(&mut self, tuple: FiveTuple) -> &mut FlowEntry {
        let next = self.flows.len();
        let idx = *self.ids.entry(tuple).or_insert_with(|| next as u32);
        if idx as usize == next {
            self.flows.push(FlowEntry {
                flow_id: idx + 1,
                tuple,
                record: FlowRecord::default(),
            });
        }
        &mut self.flows[idx as usize]
    }

    pub fn record_tx(&mut self, tuple: FiveTuple, bytes: u32, now: SimTime) {
        let rec = &mut self.entry(tuple).record;
        rec.tx_packets += 1;
        rec.tx_bytes += u64::from(bytes);
        rec.first_tx.get_or_insert(now);
        rec.last_tx = Some(now);
    }

    pub fn record_rx(&mut self, tuple: FiveTuple, bytes: u32, sent_at: SimTime, now: SimTime) {
        let rec = &mut self.entry(tuple).record;
        let delay = now.saturating_sub(sent_at);
        if rec.rx_packets > 0 {
            let jitter = SimTime(rec.last_delay.0.abs_diff(delay.0));
            rec.jitter_sum = rec.jitter_sum.saturating_add(jitter);
        }
        rec.last_delay = delay;
        rec.delay_sum = rec.delay_sum.saturating_add(delay);
        rec.rx_packets += 1;
        rec.rx_bytes += u64::from(bytes);
        rec.first_rx.get_or_insert(now);
        rec.last_rx = Some(now);
    }

    /// 按流编号排序的快照
    pub fn entries(&self) -> Vec<FlowEntry> {
        self.flows.clone()
    }

    pub fn find_flow(&self, flow_id: u32) -> Option<FiveTuple> {
        self.flows
            .get((flow_id as usize).checked_sub(1)?)
            .map(|e| e.tuple)
    }
}
