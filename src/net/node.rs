//! 节点
//!
//! 节点持有接口列表（0 号为回环接口）、静态路由表和 UDP 接收端。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use super::id::{DeviceId, NodeId};
use super::routing::StaticRouting;
use crate::sim::SimTime;

/// 节点上的一个接口
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// 回环接口没有设备
    pub dev: Option<DeviceId>,
    pub addr: Ipv4Addr,
}

/// UDP 接收端
#[derive(Debug, Clone, Default)]
pub struct PacketSink {
    pub start: SimTime,
    pub stop: SimTime,
    pub rx_packets: u64,
    pub rx_bytes: u64,
}

impl PacketSink {
    pub fn is_active(&self, now: SimTime) -> bool {
        now >= self.start && now < self.stop
    }
}

#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub interfaces: Vec<Interface>,
    pub routing: StaticRouting,
    pub sinks: HashMap<u16, PacketSink>,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            interfaces: vec![Interface {
                dev: None,
                addr: Ipv4Addr::LOCALHOST,
            }],
            routing: StaticRouting::default(),
            sinks: HashMap::new(),
        }
    }

    /// 添加一个设备接口，返回接口编号
    pub fn add_interface(&mut self, dev: DeviceId) -> u32 {
        self.interfaces.push(Interface {
            dev: Some(dev),
            addr: Ipv4Addr::UNSPECIFIED,
        });
        (self.interfaces.len() - 1) as u32
    }

    pub fn interface_of(&self, dev: DeviceId) -> Option<u32> {
        self.interfaces
            .iter()
            .position(|i| i.dev == Some(dev))
            .map(|i| i as u32)
    }

    /// 地址是否属于本节点
    pub fn owns(&self, addr: Ipv4Addr) -> bool {
        self.interfaces.iter().any(|i| i.addr == addr)
    }

    /// 第一个已分配的非回环地址
    pub fn primary_addr(&self) -> Option<Ipv4Addr> {
        self.interfaces
            .iter()
            .skip(1)
            .map(|i| i.addr)
            .find(|a| !a.is_unspecified())
    }
}
