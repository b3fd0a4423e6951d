//! 路由计算与安装

mod bindings;
mod dijkstra;
mod installer;

pub use bindings::{Binding, InterfaceBindings};
pub use dijkstra::{ShortestPaths, dijkstra};
pub use installer::{InstallReport, install_path};

use crate::net::NodeId;

/// 路径的可读形式：节点名用 `->` 连接
pub fn path_string(path: &[NodeId], name: impl Fn(NodeId) -> String) -> String {
    path.iter().map(|&n| name(n)).collect::<Vec<_>>().join("->")
}
