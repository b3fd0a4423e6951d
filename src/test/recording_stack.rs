//! 记录调用的 `NetStack` 替身

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddrV4};

use crate::net::{DeviceId, FlowEntry, NodeId};
use crate::sim::SimTime;
use crate::stack::{
    ChannelSpec, DevicePair, InterfaceAddr, NetStack, OnOffSpec, PeriodicTask, QueueProbe,
    TimerFlag, TimerGuard, TraceSink,
};

#[derive(Debug, Clone, PartialEq)]
pub(super) struct RouteCall {
    pub node: NodeId,
    pub dst: Ipv4Addr,
    pub next_hop: Ipv4Addr,
    pub if_index: u32,
}

pub(super) struct Periodic {
    pub next: SimTime,
    pub period: SimTime,
    pub task: PeriodicTask,
    pub flag: TimerFlag,
}

#[derive(Default)]
pub(super) struct RecordingStack {
    pub nodes: usize,
    pub links: Vec<(NodeId, NodeId, ChannelSpec)>,
    /// 设备所在节点与接口编号
    pub devices: Vec<(NodeId, u32)>,
    next_if: HashMap<NodeId, u32>,
    pub routes: Vec<RouteCall>,
    pub sinks: Vec<(NodeId, u16, SimTime, SimTime)>,
    pub sources: Vec<(NodeId, SocketAddrV4, OnOffSpec, SimTime, SimTime)>,
    pub mac_tx: HashMap<DeviceId, Vec<TraceSink>>,
    pub mac_rx: HashMap<DeviceId, Vec<TraceSink>>,
    pub periodic: Vec<Periodic>,
    pub queue_len: HashMap<DeviceId, usize>,
    pub flows: Vec<FlowEntry>,
    pub now: SimTime,
    pub torn_down: bool,
}

impl RecordingStack {
    pub fn fire_tx(&mut self, dev: DeviceId) {
        for sink in self.mac_tx.get_mut(&dev).into_iter().flatten() {
            sink();
        }
    }

    pub fn fire_rx(&mut self, dev: DeviceId) {
        for sink in self.mac_rx.get_mut(&dev).into_iter().flatten() {
            sink();
        }
    }

    pub fn routes_at(&self, node: NodeId) -> Vec<&RouteCall> {
        self.routes.iter().filter(|r| r.node == node).collect()
    }
}

impl QueueProbe for RecordingStack {
    fn queue_packets(&self, dev: DeviceId) -> usize {
        self.queue_len.get(&dev).copied().unwrap_or(0)
    }
}

impl NetStack for RecordingStack {
    fn create_nodes(&mut self, n: usize) {
        self.nodes = self.nodes.max(n);
    }

    fn install_link(&mut self, a: NodeId, b: NodeId, spec: &ChannelSpec) -> DevicePair {
        self.links.push((a, b, spec.clone()));
        let first = self.devices.len();
        for node in [a, b] {
            let idx = self.next_if.entry(node).or_insert(0);
            *idx += 1;
            self.devices.push((node, *idx));
        }
        DevicePair {
            a: DeviceId(first),
            b: DeviceId(first + 1),
        }
    }

    fn assign_addresses(&mut self, devs: &DevicePair, subnet_base: Ipv4Addr) -> [InterfaceAddr; 2] {
        let base = subnet_base.to_bits();
        [(devs.a, 1), (devs.b, 2)].map(|(dev, host)| InterfaceAddr {
            if_index: self.devices[dev.0].1,
            addr: Ipv4Addr::from_bits(base + host),
        })
    }

    fn trace_mac_tx(&mut self, dev: DeviceId, sink: TraceSink) {
        self.mac_tx.entry(dev).or_default().push(sink);
    }

    fn trace_mac_rx(&mut self, dev: DeviceId, sink: TraceSink) {
        self.mac_rx.entry(dev).or_default().push(sink);
    }

    fn add_host_route(&mut self, node: NodeId, dst: Ipv4Addr, next_hop: Ipv4Addr, if_index: u32) {
        self.routes.push(RouteCall {
            node,
            dst,
            next_hop,
            if_index,
        });
    }

    fn install_sink(&mut self, node: NodeId, port: u16, start: SimTime, stop: SimTime) {
        self.sinks.push((node, port, start, stop));
    }

    fn install_on_off(
        &mut self,
        node: NodeId,
        remote: SocketAddrV4,
        spec: &OnOffSpec,
        start: SimTime,
        stop: SimTime,
    ) {
        self.sources.push((node, remote, spec.clone(), start, stop));
    }

    fn schedule_periodic(
        &mut self,
        first: SimTime,
        period: SimTime,
        task: PeriodicTask,
    ) -> TimerGuard {
        let (guard, flag) = TimerGuard::pair();
        self.periodic.push(Periodic {
            next: first,
            period,
            task,
            flag,
        });
        guard
    }

    /// 只驱动周期任务
    fn run_until(&mut self, stop: SimTime) {
        let mut periodic = std::mem::take(&mut self.periodic);
        for p in &mut periodic {
            while p.next <= stop && !p.flag.is_cancelled() {
                (p.task)(p.next, &*self);
                p.next = p.next.saturating_add(p.period);
            }
        }
        self.periodic = periodic;
        self.now = stop;
    }

    fn flow_records(&self) -> Vec<FlowEntry> {
        self.flows.clone()
    }

    fn teardown(&mut self) {
        self.periodic.clear();
        self.torn_down = true;
    }
}
