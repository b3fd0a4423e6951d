//! 基于本仓库离散事件仿真器的 `NetStack` 实现

use std::net::{Ipv4Addr, SocketAddrV4};

use tracing::{debug, info, warn};

use super::flow_monitor::FlowEntry;
use super::id::{DeviceId, NodeId};
use super::net_world::NetWorld;
use super::periodic::PeriodicTick;
use crate::sim::{SimTime, Simulator};
use crate::stack::{
    ChannelSpec, DevicePair, InterfaceAddr, NetStack, OnOffSpec, PeriodicTask, QueueProbe,
    TimerGuard, TraceSink,
};

/// 仿真器 + 网络世界
#[derive(Default)]
pub struct SimStack {
    pub sim: Simulator,
    pub world: NetWorld,
}

impl SimStack {
    pub fn new(seed: u64) -> Self {
        Self {
            sim: Simulator::default(),
            world: NetWorld::with_seed(seed),
        }
    }
}

impl QueueProbe for SimStack {
    fn queue_packets(&self, dev: DeviceId) -> usize {
        self.world.net.queue_packets(dev)
    }
}

impl NetStack for SimStack {
    fn create_nodes(&mut self, n: usize) {
        self.world.net.create_nodes(n);
    }

    fn install_link(&mut self, a: NodeId, b: NodeId, spec: &ChannelSpec) -> DevicePair {
        self.world.net.connect(a, b, spec)
    }

    fn assign_addresses(&mut self, devs: &DevicePair, subnet_base: Ipv4Addr) -> [InterfaceAddr; 2] {
        self.world.net.assign(devs, subnet_base)
    }

    fn trace_mac_tx(&mut self, dev: DeviceId, sink: TraceSink) {
        match self.world.net.device_mut(dev) {
            Some(d) => d.mac_tx.push(sink),
            None => warn!(?dev, "订阅 MacTx 的设备不存在"),
        }
    }

    fn trace_mac_rx(&mut self, dev: DeviceId, sink: TraceSink) {
        match self.world.net.device_mut(dev) {
            Some(d) => d.mac_rx.push(sink),
            None => warn!(?dev, "订阅 MacRx 的设备不存在"),
        }
    }

    fn add_host_route(&mut self, node: NodeId, dst: Ipv4Addr, next_hop: Ipv4Addr, if_index: u32) {
        match self.world.net.node_mut(node) {
            Some(n) => {
                n.routing.add_host_route(dst, next_hop, if_index);
            }
            None => warn!(?node, %dst, "添加路由的节点不存在"),
        }
    }

    fn install_sink(&mut self, node: NodeId, port: u16, start: SimTime, stop: SimTime) {
        self.world.net.install_sink(node, port, start, stop);
    }

    fn install_on_off(
        &mut self,
        node: NodeId,
        remote: SocketAddrV4,
        spec: &OnOffSpec,
        start: SimTime,
        stop: SimTime,
    ) {
        self.world
            .net
            .install_on_off(node, remote, spec, start, stop, &mut self.sim);
    }

    fn schedule_periodic(
        &mut self,
        first: SimTime,
        period: SimTime,
        task: PeriodicTask,
    ) -> TimerGuard {
        let (guard, flag) = TimerGuard::pair();
        self.sim.schedule(first, PeriodicTick { period, task, flag });
        guard
    }

    fn run_until(&mut self, stop: SimTime) {
        self.sim.run_until(stop, &mut self.world);
        let stats = &self.world.net.stats;
        info!(
            sent = stats.sent_pkts,
            delivered = stats.delivered_pkts,
            dropped = stats.dropped_pkts(),
            "网络层统计"
        );
        debug!(?stats, "丢包明细");
    }

    fn flow_records(&self) -> Vec<FlowEntry> {
        self.world.net.flow_monitor.entries()
    }

    fn teardown(&mut self) {
        self.sim.clear();
    }
}
