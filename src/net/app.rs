//! OnOff 流量源
//!
//! ON 时段内按恒定速率发包，ON/OFF 时段长度服从指数分布。

use std::net::SocketAddrV4;

use super::id::NodeId;
use super::net_world::NetWorld;
use crate::sim::{Event, SimTime, Simulator, World, downcast_world};
use crate::stack::OnOffSpec;
use tracing::warn;

/// 第一个源端口（临时端口段起点）
pub const EPHEMERAL_PORT_BASE: u16 = 49153;

#[derive(Debug, Clone)]
pub struct OnOffApp {
    pub node: NodeId,
    pub remote: SocketAddrV4,
    pub src_port: u16,
    pub spec: OnOffSpec,
    pub start: SimTime,
    pub stop: SimTime,
    /// 当前 ON 时段的结束时间；None 表示尚未启动
    pub on_until: Option<SimTime>,
    pub tx_packets: u64,
}

impl OnOffApp {
    /// ON 时段内的发包间隔
    pub fn send_interval(&self) -> SimTime {
        let bits = u128::from(self.spec.packet_size_bytes) * 8;
        let bps = u128::from(self.spec.data_rate_bps.max(1));
        SimTime(((bits * 1_000_000_000).div_ceil(bps)).min(u128::from(u64::MAX)) as u64)
    }
}

/// 事件：OnOff 应用的下一次动作（发包或进入 OFF）
#[derive(Debug)]
pub struct AppTick {
    pub app: usize,
}

impl Event for AppTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let AppTick { app } = *self;
        let Some(w) = downcast_world::<NetWorld>(world) else {
            warn!("world must be NetWorld");
            return;
        };
        w.net.on_app_tick(app, sim);
    }
}
