//! 结果输出
//!
//! 每个输出只写一次表头，之后每个实体一行；浮点统一保留 6 位小数，
//! 方便不同运行之间逐字比较。

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::error::{Error, Result};
use crate::slice::{AddressBook, LinkSummary, RouteRecord, SliceReport};
use crate::stats::{FlowSummary, QueueSample};

pub const FLOW_RESULTS_HEADER: [&str; 12] = [
    "FlowId",
    "SrcAddr",
    "DstAddr",
    "SrcSatellite",
    "DstSatellite",
    "TxPackets",
    "RxPackets",
    "LostPackets",
    "Throughput_Mbps",
    "MeanDelay_ms",
    "MeanJitter_ms",
    "PacketLossRate",
];
pub const LINK_STATS_HEADER: [&str; 6] = [
    "SrcNode",
    "DstNode",
    "TxPackets",
    "RxPackets",
    "LostPackets",
    "PacketLossRate",
];
pub const ROUTE_PATHS_HEADER: [&str; 5] = ["FlowId", "SrcNode", "DstNode", "HopCount", "PathString"];
pub const QUEUE_MONITOR_HEADER: [&str; 4] = ["Time", "SrcNode", "DstNode", "QueuePackets"];

/// 固定 6 位小数
pub fn fixed6(v: f64) -> String {
    format!("{v:.6}")
}

pub fn write_flow_results<W: Write>(
    out: W,
    flows: &[FlowSummary],
    names: &AddressBook,
) -> Result<()> {
    let mut w = Writer::from_writer(out);
    w.write_record(FLOW_RESULTS_HEADER)?;
    for f in flows {
        w.write_record([
            f.flow_id.to_string(),
            f.src_addr.to_string(),
            f.dst_addr.to_string(),
            names.name_of(f.src_addr).to_string(),
            names.name_of(f.dst_addr).to_string(),
            f.tx_packets.to_string(),
            f.rx_packets.to_string(),
            f.lost_packets.to_string(),
            fixed6(f.throughput_mbps),
            fixed6(f.mean_delay_ms),
            fixed6(f.mean_jitter_ms),
            fixed6(f.loss_rate),
        ])?;
    }
    w.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_link_stats<W: Write>(out: W, links: &[LinkSummary]) -> Result<()> {
    let mut w = Writer::from_writer(out);
    w.write_record(LINK_STATS_HEADER)?;
    for l in links {
        w.write_record([
            l.src_name.clone(),
            l.dst_name.clone(),
            l.counters.tx_packets.to_string(),
            l.counters.rx_packets.to_string(),
            l.counters.lost_packets().to_string(),
            fixed6(l.counters.loss_rate()),
        ])?;
    }
    w.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_route_paths<W: Write>(out: W, routes: &[RouteRecord]) -> Result<()> {
    let mut w = Writer::from_writer(out);
    w.write_record(ROUTE_PATHS_HEADER)?;
    for r in routes {
        w.write_record([
            r.flow_id.to_string(),
            r.src_name.clone(),
            r.dst_name.clone(),
            r.hop_count().to_string(),
            r.path_string.clone(),
        ])?;
    }
    w.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_queue_monitor<W: Write>(out: W, samples: &[QueueSample]) -> Result<()> {
    let mut w = Writer::from_writer(out);
    w.write_record(QUEUE_MONITOR_HEADER)?;
    for s in samples {
        w.write_record([
            fixed6(s.time.as_secs_f64()),
            s.src_name.clone(),
            s.dst_name.clone(),
            s.packets.to_string(),
        ])?;
    }
    w.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// 地址 -> 卫星名称映射（JSON，键有序）
pub fn write_address_map<W: Write>(out: W, names: &AddressBook) -> Result<()> {
    let map: BTreeMap<String, &str> = names
        .iter()
        .map(|(addr, name)| (addr.to_string(), name))
        .collect();
    serde_json::to_writer_pretty(out, &map)?;
    Ok(())
}

/// 输出文件路径
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub flow_results: std::path::PathBuf,
    pub link_stats: std::path::PathBuf,
    pub route_paths: std::path::PathBuf,
    pub queue_monitor: std::path::PathBuf,
    pub address_map: std::path::PathBuf,
}

impl OutputPaths {
    /// 流结果写到 `flow_results`，其余文件放在 `dir` 下
    pub fn new(flow_results: &Path, dir: &Path) -> Self {
        Self {
            flow_results: flow_results.to_path_buf(),
            link_stats: dir.join("link_stats.csv"),
            route_paths: dir.join("route_paths.csv"),
            queue_monitor: dir.join("link_monitor.csv"),
            address_map: dir.join("ip_to_satellite.json"),
        }
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let f = File::create(path).map_err(|e| Error::io(path, e))?;
    Ok(BufWriter::new(f))
}

/// 写出一个时间片的全部结果
#[tracing::instrument(skip(report))]
pub fn write_all(report: &SliceReport, paths: &OutputPaths) -> Result<()> {
    write_route_paths(create(&paths.route_paths)?, &report.routes)?;
    write_flow_results(create(&paths.flow_results)?, &report.flows, &report.addresses)?;
    write_queue_monitor(create(&paths.queue_monitor)?, &report.queue_samples)?;
    write_link_stats(create(&paths.link_stats)?, &report.links)?;
    let mut f = create(&paths.address_map)?;
    write_address_map(&mut f, &report.addresses)?;
    f.flush().map_err(|e| Error::io(&paths.address_map, e))?;
    info!(
        flows = report.flows.len(),
        links = report.links.len(),
        routes = report.routes.len(),
        samples = report.queue_samples.len(),
        "结果已写出"
    );
    Ok(())
}
