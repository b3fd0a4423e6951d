//! 最短时延路径（Dijkstra）
//!
//! 纯函数：只读邻接表，每次调用都分配自己的距离/前驱数组，
//! 因此可以按需求逐个源节点反复调用。

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::net::NodeId;
use crate::topo::Graph;

/// 单源最短路径结果，数组长度等于节点数
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    pub source: NodeId,
    pub dist: Vec<f64>,
    pub prev: Vec<Option<NodeId>>,
}

impl ShortestPaths {
    pub fn distance(&self, node: NodeId) -> f64 {
        self.dist.get(node.0).copied().unwrap_or(f64::INFINITY)
    }

    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance(node).is_finite()
    }

    /// 从 source 到 `dst` 的节点序列（含两端）；不可达时为空
    pub fn path_to(&self, dst: NodeId) -> Vec<NodeId> {
        if !self.is_reachable(dst) {
            return Vec::new();
        }
        let mut path = vec![dst];
        let mut at = dst;
        while let Some(p) = self.prev[at.0] {
            path.push(p);
            at = p;
        }
        path.reverse();
        path
    }
}

/// 优先队列元素：距离小的先出，距离相同按节点 id 小的先出
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    dist: f64,
    node: NodeId,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.node.cmp(&other.node))
            .reverse()
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 以链路时延为边权，计算 `source` 到所有节点的最短路径
#[tracing::instrument(level = "debug", skip(graph), fields(nodes = graph.node_count()))]
pub fn dijkstra(graph: &Graph, source: NodeId) -> ShortestPaths {
    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev = vec![None; n];

    if source.0 < n {
        let mut frontier = BinaryHeap::new();
        dist[source.0] = 0.0;
        frontier.push(Frontier {
            dist: 0.0,
            node: source,
        });

        while let Some(Frontier { dist: d, node: u }) = frontier.pop() {
            // 过期的队列项
            if d > dist[u.0] {
                continue;
            }
            for &(v, w) in graph.neighbors(u) {
                let nd = d + w;
                if nd < dist[v.0] {
                    dist[v.0] = nd;
                    prev[v.0] = Some(u);
                    frontier.push(Frontier { dist: nd, node: v });
                }
            }
        }
    }

    ShortestPaths { source, dist, prev }
}
