//! 接口绑定表
//!
//! 链路实例化成设备时建立，每条链路每个方向一条：
//! (当前节点, 下一节点) -> (出接口编号, 下一跳地址)。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use crate::net::NodeId;
use crate::stack::InterfaceAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub if_index: u32,
    pub next_hop: Ipv4Addr,
}

#[derive(Debug, Clone, Default)]
pub struct InterfaceBindings {
    map: HashMap<(NodeId, NodeId), Binding>,
}

impl InterfaceBindings {
    /// 记录一条链路两个方向的绑定。`a`/`b` 是链路两端设备分到的接口。
    ///
    /// 平行链路时后记录的覆盖先记录的。
    pub fn bind_link(&mut self, src: NodeId, dst: NodeId, a: InterfaceAddr, b: InterfaceAddr) {
        self.map.insert(
            (src, dst),
            Binding {
                if_index: a.if_index,
                next_hop: b.addr,
            },
        );
        self.map.insert(
            (dst, src),
            Binding {
                if_index: b.if_index,
                next_hop: a.addr,
            },
        );
    }

    pub fn get(&self, from: NodeId, to: NodeId) -> Option<Binding> {
        self.map.get(&(from, to)).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
