//! 统计信息
//!
//! 网络层的全局计数，主要用于日志和排查丢包原因。

/// 网络统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub sent_pkts: u64,
    pub delivered_pkts: u64,
    pub delivered_bytes: u64,
    /// 出口队列已满
    pub queue_drops: u64,
    /// 接收侧丢包模型
    pub error_drops: u64,
    /// 找不到路由
    pub no_route_drops: u64,
    /// TTL 耗尽
    pub ttl_drops: u64,
}

impl Stats {
    pub fn dropped_pkts(&self) -> u64 {
        self.queue_drops + self.error_drops + self.no_route_drops + self.ttl_drops
    }
}
