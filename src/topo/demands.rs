//! 流量需求加载
//!
//! 输入格式：`demandId,srcNode,dstNode,srcId,dstId,dataRateMbps,startTimeSec,durationSec`
//! 与链路不同，这里不做任何修正，非法数值直接跳过整行。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use super::rows::{Row, RowError, parse_rows};
use crate::error::{Error, Result};
use crate::net::NodeId;
use crate::sim::SimTime;

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficDemand {
    pub demand_id: u32,
    pub src_node: String,
    pub dst_node: String,
    pub src: NodeId,
    pub dst: NodeId,
    pub data_rate_mbps: f64,
    pub start_time_sec: f64,
    pub duration_sec: f64,
}

impl TrafficDemand {
    fn from_row(row: &Row<'_>) -> Result<Self, RowError> {
        let demand_id = row.num(0, "demandId")?;
        let src_node = row.text(1, "srcNode")?.to_string();
        let dst_node = row.text(2, "dstNode")?.to_string();
        let src: u32 = row.num(3, "srcId")?;
        let dst: u32 = row.num(4, "dstId")?;
        Ok(TrafficDemand {
            demand_id,
            src_node,
            dst_node,
            src: NodeId(src as usize),
            dst: NodeId(dst as usize),
            data_rate_mbps: row.num(5, "dataRateMbps")?,
            start_time_sec: row.num(6, "startTimeSec")?,
            duration_sec: row.num(7, "durationSec")?,
        })
    }

    /// 输出文件里使用的流编号（从 1 开始）
    pub fn flow_id(&self) -> u64 {
        u64::from(self.demand_id) + 1
    }

    pub fn start(&self) -> SimTime {
        SimTime::from_secs_f64(self.start_time_sec)
    }

    pub fn stop(&self) -> SimTime {
        SimTime::from_secs_f64(self.start_time_sec + self.duration_sec)
    }

    pub fn data_rate_bps(&self) -> u64 {
        let bps = self.data_rate_mbps * 1e6;
        if bps.is_finite() && bps > 0.0 {
            bps as u64
        } else {
            0
        }
    }
}

pub fn parse_demands<R: Read>(reader: R) -> Result<Vec<TrafficDemand>> {
    parse_rows(reader, "demand", TrafficDemand::from_row)
}

#[tracing::instrument]
pub fn load_demands(path: &Path) -> Result<Vec<TrafficDemand>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let demands = parse_demands(file)?;
    info!(demands = demands.len(), "Loaded {} traffic demands", demands.len());
    if demands.is_empty() {
        return Err(Error::NoDemands {
            path: path.to_path_buf(),
        });
    }
    Ok(demands)
}
