//! 队列策略（Queue disciplines）
//!
//! 设备出口队列。目前只有按包数限长的 DropTail。

use crate::net::Packet;

mod drop_tail;

pub use drop_tail::DropTailQueue;

/// 默认队列容量（包）
pub const DEFAULT_QUEUE_PACKETS: usize = 500;

/// Packet 队列抽象
pub trait PacketQueue: std::fmt::Debug + Send {
    /// 入队：成功返回 Ok；若被丢弃则返回 Err(pkt)
    fn enqueue(&mut self, pkt: Packet) -> Result<(), Packet>;
    /// 出队：按队列策略返回下一个 packet
    fn dequeue(&mut self) -> Option<Packet>;

    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn bytes(&self) -> u64;
    fn capacity_packets(&self) -> usize;
}
