//! 链路参数加载
//!
//! 输入格式：`srcId,dstId,srcName,dstName,delayMs,dataRateBps[,packetLossRate[,distanceKm]]`

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::graph::Graph;
use super::rows::{Row, RowError, parse_rows};
use crate::error::{Error, Result};
use crate::net::NodeId;

/// 时延 ≤ 0 时使用的默认值（ms）
pub const DEFAULT_DELAY_MS: f64 = 1.0;
/// 低于该速率（bps）视为无效
pub const MIN_DATA_RATE_BPS: u64 = 1_000;
/// 无效速率替换成的默认值（bps）
pub const DEFAULT_DATA_RATE_BPS: u64 = 1_000_000;

/// 一条无向链路
#[derive(Debug, Clone, PartialEq)]
pub struct LinkParam {
    pub src: NodeId,
    pub dst: NodeId,
    pub src_name: String,
    pub dst_name: String,
    pub delay_ms: f64,
    pub data_rate_bps: u64,
    pub packet_loss_rate: f64,
    pub distance_km: f64,
}

impl LinkParam {
    fn from_row(row: &Row<'_>) -> Result<Self, RowError> {
        let src: u32 = row.num(0, "srcId")?;
        let dst: u32 = row.num(1, "dstId")?;
        let src_name = row.text(2, "srcName")?.to_string();
        let dst_name = row.text(3, "dstName")?.to_string();
        let delay_ms: f64 = row.num(4, "delayMs")?;
        let data_rate_bps = row.integral(5, "dataRateBps")?;
        let packet_loss_rate = row.opt_num(6, "packetLossRate")?.unwrap_or(0.0);
        let distance_km = row.opt_num(7, "distanceKm")?.unwrap_or(0.0);

        Ok(LinkParam {
            src: NodeId(src as usize),
            dst: NodeId(dst as usize),
            src_name,
            dst_name,
            delay_ms,
            data_rate_bps,
            packet_loss_rate,
            distance_km,
        }
        .clamped())
    }

    /// 修正退化参数：时延必须为正，速率不低于下限
    pub fn clamped(mut self) -> Self {
        if self.delay_ms.is_nan() || self.delay_ms <= 0.0 {
            debug!(src = ?self.src, dst = ?self.dst, delay_ms = self.delay_ms, "时延非正，使用默认值");
            self.delay_ms = DEFAULT_DELAY_MS;
        }
        if self.data_rate_bps < MIN_DATA_RATE_BPS {
            debug!(src = ?self.src, dst = ?self.dst, rate = self.data_rate_bps, "速率过低，使用默认值");
            self.data_rate_bps = DEFAULT_DATA_RATE_BPS;
        }
        self
    }

    /// 丢包率只有严格落在 (0, 1) 内才启用注入
    pub fn loss_injection(&self) -> Option<f64> {
        let p = self.packet_loss_rate;
        (p > 0.0 && p < 1.0).then_some(p)
    }
}

/// 一个时间片的拓扑快照
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub links: Vec<LinkParam>,
    names: HashMap<NodeId, String>,
    node_count: usize,
}

impl Topology {
    pub fn from_links(links: Vec<LinkParam>) -> Self {
        let mut topo = Topology::default();
        for link in links {
            topo.push(link);
        }
        topo
    }

    fn push(&mut self, link: LinkParam) {
        self.names.insert(link.src, link.src_name.clone());
        self.names.insert(link.dst, link.dst_name.clone());
        let watermark = link.src.0.max(link.dst.0) + 1;
        self.node_count = self.node_count.max(watermark);
        self.links.push(link);
    }

    /// 最大节点 id + 1（中间可能有从未出现过的 id）
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// 节点名称，未知节点回退为 `Node_<id>`
    pub fn node_name(&self, id: NodeId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Node_{}", id.0))
    }

    /// 按当前链路集合构建邻接表
    pub fn graph(&self) -> Graph {
        Graph::from_links(self.node_count, &self.links)
    }
}

/// 从任意 reader 解析链路（表头 + 数据行）
pub fn parse_links<R: Read>(reader: R) -> Result<Topology> {
    let links = parse_rows(reader, "link", LinkParam::from_row)?;
    Ok(Topology::from_links(links))
}

/// 从文件加载链路；一条都没解析出来时报错
#[tracing::instrument]
pub fn load_links(path: &Path) -> Result<Topology> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let topo = parse_links(file)?;
    info!(
        links = topo.links.len(),
        nodes = topo.node_count(),
        "Loaded {} links",
        topo.links.len()
    );
    if topo.links.is_empty() {
        return Err(Error::NoLinks {
            path: path.to_path_buf(),
        });
    }
    Ok(topo)
}
