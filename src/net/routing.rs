//! 静态主机路由
//!
//! 每个节点一张表：目的地址（/32）-> (下一跳地址, 出接口)。
//! 路由全部在仿真开始前由路由安装器写入，运行期间不再变化。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostRoute {
    pub next_hop: Ipv4Addr,
    pub if_index: u32,
}

#[derive(Debug, Default, Clone)]
pub struct StaticRouting {
    host_routes: HashMap<Ipv4Addr, HostRoute>,
}

impl StaticRouting {
    /// 添加主机路由；同一目的地址已有路由时由后安装的替换，返回被替换的那条
    pub fn add_host_route(
        &mut self,
        dst: Ipv4Addr,
        next_hop: Ipv4Addr,
        if_index: u32,
    ) -> Option<HostRoute> {
        let old = self
            .host_routes
            .insert(dst, HostRoute { next_hop, if_index });
        if let Some(prev) = old {
            trace!(%dst, ?prev, next_hop = %next_hop, "替换已有主机路由");
        }
        old
    }

    pub fn lookup(&self, dst: Ipv4Addr) -> Option<HostRoute> {
        self.host_routes.get(&dst).copied()
    }

    pub fn len(&self) -> usize {
        self.host_routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.host_routes.is_empty()
    }
}
