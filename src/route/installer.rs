//! 路由安装
//!
//! 把一条节点路径翻译成沿途每个节点上的主机路由，
//! 得到真正逐跳转发的静态路由状态（不是源路由）。

use std::net::Ipv4Addr;

use tracing::{trace, warn};

use super::bindings::InterfaceBindings;
use crate::net::NodeId;
use crate::stack::NetStack;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: usize,
    /// 缺少接口绑定而跳过的 (当前, 下一) 跳
    pub skipped: Vec<(NodeId, NodeId)>,
}

impl InstallReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// 在路径上除终点外的每个节点安装到 `dst_addr` 的主机路由
pub fn install_path(
    stack: &mut dyn NetStack,
    bindings: &InterfaceBindings,
    path: &[NodeId],
    dst_addr: Ipv4Addr,
) -> InstallReport {
    let mut report = InstallReport::default();
    for hop in path.windows(2) {
        let (cur, next) = (hop[0], hop[1]);
        let Some(b) = bindings.get(cur, next) else {
            warn!(
                current = cur.0,
                next = next.0,
                "Warning: No interface found for {} -> {}",
                cur.0,
                next.0
            );
            report.skipped.push((cur, next));
            continue;
        };
        trace!(node = cur.0, %dst_addr, next_hop = %b.next_hop, if_index = b.if_index, "安装主机路由");
        stack.add_host_route(cur, dst_addr, b.next_hop, b.if_index);
        report.installed += 1;
    }
    report
}
