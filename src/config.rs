//! 仿真参数
//!
//! 所有字段都有默认值；JSON 配置文件可以只写需要覆盖的字段，
//! 命令行参数再覆盖配置文件。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::SimTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// 仿真总时长（秒）
    pub sim_time_sec: f64,
    /// 应用层数据包大小（字节）
    pub packet_size_bytes: u32,
    /// 每个设备的 DropTail 队列容量（包）
    pub queue_size_packets: usize,
    /// OnOff 应用 ON 时段的指数分布均值（秒），0 表示一直 ON
    pub on_time_mean_sec: f64,
    /// OnOff 应用 OFF 时段的指数分布均值（秒），0 表示没有 OFF
    pub off_time_mean_sec: f64,
    /// 队列采样周期（秒）
    pub monitor_interval_sec: f64,
    /// 第一个流使用的端口，之后每个流 +1
    pub start_port: u16,
    /// 随机数种子（丢包注入与 OnOff 时段）
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sim_time_sec: 10.0,
            packet_size_bytes: 1024,
            queue_size_packets: 500,
            on_time_mean_sec: 1.0,
            off_time_mean_sec: 0.5,
            monitor_interval_sec: 0.1,
            start_port: 9000,
            seed: 1,
        }
    }
}

impl SimConfig {
    /// 从 JSON 文件读取配置
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn sim_time(&self) -> SimTime {
        SimTime::from_secs_f64(self.sim_time_sec)
    }

    /// 采样周期；非正数时为 100ms
    pub fn monitor_interval(&self) -> SimTime {
        let t = SimTime::from_secs_f64(self.monitor_interval_sec);
        if t == SimTime::ZERO {
            SimTime::from_millis(100)
        } else {
            t
        }
    }
}
