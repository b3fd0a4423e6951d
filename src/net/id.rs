//! 标识符类型
//!
//! 定义节点和网络设备的唯一标识符。

use std::fmt;

/// 节点标识符（与链路文件中的 srcId/dstId 一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// 网络设备标识符：每条链路在两端各有一个设备
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
