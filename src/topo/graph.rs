//! 邻接表
//!
//! 由链路集合派生，不是权威数据；每个时间片重新构建一次。
//! 边权取链路时延：最短路径最小化的是时延而不是拥塞或跳数。

use super::links::LinkParam;
use crate::net::NodeId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    adj: Vec<Vec<(NodeId, f64)>>,
}

impl Graph {
    /// 无向图：每条链路在两端各加一条边
    pub fn from_links(node_count: usize, links: &[LinkParam]) -> Self {
        let needed = links
            .iter()
            .map(|l| l.src.0.max(l.dst.0) + 1)
            .max()
            .unwrap_or(0);
        let mut adj = vec![Vec::new(); node_count.max(needed)];
        for link in links {
            adj[link.src.0].push((link.dst, link.delay_ms));
            adj[link.dst.0].push((link.src, link.delay_ms));
        }
        Self { adj }
    }

    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// `(邻居, 边权)`；越界的节点没有邻居
    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, f64)] {
        self.adj.get(node.0).map(Vec::as_slice).unwrap_or(&[])
    }
}
