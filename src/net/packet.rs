//! 数据包类型

use super::flow_monitor::FiveTuple;
use crate::sim::SimTime;

/// 默认 TTL；静态路由配置出错形成环路时靠它终止转发
pub const DEFAULT_TTL: u8 = 64;

/// 网络数据包（UDP）
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: u64,
    pub tuple: FiveTuple,
    pub size_bytes: u32,
    /// 源节点发出的时间，用于计算端到端时延
    pub sent_at: SimTime,
    pub ttl: u8,
}

impl Packet {
    pub fn new(id: u64, tuple: FiveTuple, size_bytes: u32, sent_at: SimTime) -> Self {
        Self {
            id,
            tuple,
            size_bytes,
            sent_at,
            ttl: DEFAULT_TTL,
        }
    }

    /// 经过一跳转发，TTL 减一；耗尽时返回 None
    pub fn hop(mut self) -> Option<Self> {
        self.ttl = self.ttl.checked_sub(1).filter(|t| *t > 0)?;
        Some(self)
    }
}
