//! 点到点网络设备
//!
//! 每条链路在两端各有一个设备。设备持有出口队列、发送速率、
//! 信道时延和接收侧丢包模型。

use std::fmt;

use super::id::{DeviceId, NodeId};
use crate::queue::{DropTailQueue, PacketQueue};
use crate::sim::SimTime;
use crate::stack::TraceSink;

pub struct NetDevice {
    pub node: NodeId,
    pub peer: DeviceId,
    pub data_rate_bps: u64,
    pub delay: SimTime,
    /// 接收侧丢包概率；None 表示不注入丢包
    pub rx_loss: Option<f64>,
    /// 正在序列化一个包
    pub busy: bool,
    pub queue: Box<dyn PacketQueue>,
    pub(crate) mac_tx: Vec<TraceSink>,
    pub(crate) mac_rx: Vec<TraceSink>,
}

impl fmt::Debug for NetDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetDevice")
            .field("node", &self.node)
            .field("peer", &self.peer)
            .field("data_rate_bps", &self.data_rate_bps)
            .field("delay", &self.delay)
            .field("rx_loss", &self.rx_loss)
            .field("busy", &self.busy)
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl NetDevice {
    pub fn new(
        node: NodeId,
        peer: DeviceId,
        data_rate_bps: u64,
        delay: SimTime,
        rx_loss: Option<f64>,
        queue_packets: usize,
    ) -> Self {
        Self {
            node,
            peer,
            data_rate_bps,
            delay,
            rx_loss,
            busy: false,
            queue: Box::new(DropTailQueue::new(queue_packets)),
            mac_tx: Vec::new(),
            mac_rx: Vec::new(),
        }
    }

    /// 计算传输指定字节数所需的时间
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        // ceil(bytes*8 / bps) 秒 -> 纳秒
        if self.data_rate_bps == 0 {
            return SimTime(u64::MAX / 4);
        }
        let bits = u128::from(bytes) * 8;
        let bps = u128::from(self.data_rate_bps);
        let nanos = (bits * 1_000_000_000 + (bps - 1)) / bps;
        SimTime(nanos.min(u128::from(u64::MAX)) as u64)
    }

    pub(crate) fn fire_mac_tx(&mut self) {
        for sink in &mut self.mac_tx {
            sink();
        }
    }

    pub(crate) fn fire_mac_rx(&mut self) {
        for sink in &mut self.mac_rx {
            sink();
        }
    }
}
