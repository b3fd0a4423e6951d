//! 流统计汇总
//!
//! 从流监控的原始计数推导吞吐、平均时延、平均抖动和丢包率。

use std::net::Ipv4Addr;

use crate::net::{FlowEntry, FlowRecord};

/// 一个流的性能指标
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSummary {
    pub flow_id: u32,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
    pub tx_packets: u64,
    pub rx_packets: u64,
    pub lost_packets: u64,
    pub throughput_mbps: f64,
    pub mean_delay_ms: f64,
    pub mean_jitter_ms: f64,
    pub loss_rate: f64,
}

/// 吞吐、时延、抖动、丢包率
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowMetrics {
    pub lost_packets: u64,
    pub throughput_mbps: f64,
    pub mean_delay_ms: f64,
    pub mean_jitter_ms: f64,
    pub loss_rate: f64,
}

impl FlowMetrics {
    pub fn from_record(rec: &FlowRecord) -> Self {
        let lost = rec.tx_packets.saturating_sub(rec.rx_packets);
        let mut m = FlowMetrics {
            lost_packets: lost,
            ..FlowMetrics::default()
        };
        if rec.tx_packets > 0 {
            m.loss_rate = lost as f64 / rec.tx_packets as f64;
        }
        if rec.rx_packets > 0 {
            let duration = match (rec.first_tx, rec.last_rx) {
                (Some(first), Some(last)) => last.as_secs_f64() - first.as_secs_f64(),
                _ => 0.0,
            };
            if duration > 0.0 {
                m.throughput_mbps = rec.rx_bytes as f64 * 8.0 / duration / 1e6;
            }
            let rx = rec.rx_packets as f64;
            m.mean_delay_ms = rec.delay_sum.as_millis_f64() / rx;
            m.mean_jitter_ms = rec.jitter_sum.as_millis_f64() / rx;
        }
        m
    }
}

pub fn summarize_flow(entry: &FlowEntry) -> FlowSummary {
    let rec = &entry.record;
    let m = FlowMetrics::from_record(rec);
    FlowSummary {
        flow_id: entry.flow_id,
        src_addr: entry.tuple.src_addr,
        dst_addr: entry.tuple.dst_addr,
        tx_packets: rec.tx_packets,
        rx_packets: rec.rx_packets,
        lost_packets: m.lost_packets,
        throughput_mbps: m.throughput_mbps,
        mean_delay_ms: m.mean_delay_ms,
        mean_jitter_ms: m.mean_jitter_ms,
        loss_rate: m.loss_rate,
    }
}
