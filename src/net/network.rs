//! 网络拓扑管理
//!
//! 持有节点、设备、应用和流监控，实现逐跳的 IP 转发：
//! 源节点查主机路由选出口设备，设备排队、序列化、经信道时延到达对端，
//! 对端设备按丢包模型决定是否收下，再由节点上交或继续转发。

use std::net::{Ipv4Addr, SocketAddrV4};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use tracing::{debug, trace};

use super::app::{AppTick, EPHEMERAL_PORT_BASE, OnOffApp};
use super::deliver_packet::DeliverPacket;
use super::device::NetDevice;
use super::flow_monitor::{FiveTuple, FlowMonitor, PROTO_UDP};
use super::id::{DeviceId, NodeId};
use super::link_ready::LinkReady;
use super::node::{Node, PacketSink};
use super::packet::Packet;
use super::stats::Stats;
use crate::sim::{SimTime, Simulator};
use crate::stack::{ChannelSpec, DevicePair, InterfaceAddr, OnOffSpec, QueueProbe};

pub struct Network {
    nodes: Vec<Node>,
    devices: Vec<NetDevice>,
    apps: Vec<OnOffApp>,
    next_pkt_id: u64,
    rng: StdRng,
    pub flow_monitor: FlowMonitor,
    pub stats: Stats,
}

impl Default for Network {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Network {
    pub fn new(seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            devices: Vec::new(),
            apps: Vec::new(),
            next_pkt_id: 0,
            rng: StdRng::seed_from_u64(seed),
            flow_monitor: FlowMonitor::default(),
            stats: Stats::default(),
        }
    }

    /// 追加节点直到共有 `n` 个
    pub fn create_nodes(&mut self, n: usize) {
        while self.nodes.len() < n {
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node::new(id));
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn device(&self, id: DeviceId) -> Option<&NetDevice> {
        self.devices.get(id.0)
    }

    pub fn device_mut(&mut self, id: DeviceId) -> Option<&mut NetDevice> {
        self.devices.get_mut(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 连接两个节点（创建一对设备和一条信道）
    pub fn connect(&mut self, a: NodeId, b: NodeId, spec: &ChannelSpec) -> DevicePair {
        self.create_nodes(a.0.max(b.0) + 1);
        let da = DeviceId(self.devices.len());
        let db = DeviceId(da.0 + 1);
        for (node, peer) in [(a, db), (b, da)] {
            self.devices.push(NetDevice::new(
                node,
                peer,
                spec.data_rate_bps,
                spec.delay,
                spec.loss,
                spec.queue_packets,
            ));
        }
        self.nodes[a.0].add_interface(da);
        self.nodes[b.0].add_interface(db);
        debug!(?a, ?b, ?da, ?db, rate = spec.data_rate_bps, delay = %spec.delay, "创建链路");
        DevicePair { a: da, b: db }
    }

    /// 给一对设备分配 /30 子网地址
    pub fn assign(&mut self, devs: &DevicePair, subnet_base: Ipv4Addr) -> [InterfaceAddr; 2] {
        let base = subnet_base.to_bits();
        let mut out = [InterfaceAddr {
            if_index: 0,
            addr: Ipv4Addr::UNSPECIFIED,
        }; 2];
        for (slot, (dev, host)) in [(devs.a, 1u32), (devs.b, 2u32)].into_iter().enumerate() {
            let addr = Ipv4Addr::from_bits(base.wrapping_add(host));
            let node_id = self.devices[dev.0].node;
            let node = &mut self.nodes[node_id.0];
            let if_index = node.interface_of(dev).unwrap_or_else(|| node.add_interface(dev));
            node.interfaces[if_index as usize].addr = addr;
            out[slot] = InterfaceAddr { if_index, addr };
        }
        out
    }

    pub fn install_sink(&mut self, node: NodeId, port: u16, start: SimTime, stop: SimTime) {
        self.create_nodes(node.0 + 1);
        self.nodes[node.0].sinks.insert(
            port,
            PacketSink {
                start,
                stop,
                ..PacketSink::default()
            },
        );
    }

    pub fn install_on_off(
        &mut self,
        node: NodeId,
        remote: SocketAddrV4,
        spec: &OnOffSpec,
        start: SimTime,
        stop: SimTime,
        sim: &mut Simulator,
    ) {
        self.create_nodes(node.0 + 1);
        let idx = self.apps.len();
        let src_port = EPHEMERAL_PORT_BASE.wrapping_add(idx as u16);
        self.apps.push(OnOffApp {
            node,
            remote,
            src_port,
            spec: spec.clone(),
            start,
            stop,
            on_until: None,
            tx_packets: 0,
        });
        sim.schedule(start, AppTick { app: idx });
    }

    pub fn apps(&self) -> &[OnOffApp] {
        &self.apps
    }

    fn sample_exp(&mut self, mean_sec: f64) -> SimTime {
        if mean_sec.is_nan() || mean_sec <= 0.0 {
            return SimTime::ZERO;
        }
        match Exp::new(1.0 / mean_sec) {
            Ok(exp) => SimTime::from_secs_f64(exp.sample(&mut self.rng)),
            Err(_) => SimTime::ZERO,
        }
    }

    /// OnOff 应用的一次动作
    pub(crate) fn on_app_tick(&mut self, idx: usize, sim: &mut Simulator) {
        let now = sim.now();
        let Some(app) = self.apps.get(idx) else {
            return;
        };
        if now >= app.stop || app.spec.data_rate_bps == 0 {
            return;
        }
        let (on_mean, off_mean) = (app.spec.on_time_mean_sec, app.spec.off_time_mean_sec);
        let current = app.on_until;

        let on_until = match current {
            Some(t) => t,
            None => {
                let t = if on_mean > 0.0 {
                    now.saturating_add(self.sample_exp(on_mean))
                } else {
                    SimTime::MAX
                };
                self.apps[idx].on_until = Some(t);
                t
            }
        };

        if now >= on_until {
            let next_on = now.saturating_add(self.sample_exp(off_mean));
            let next_off = next_on.saturating_add(self.sample_exp(on_mean));
            self.apps[idx].on_until = Some(next_off);
            trace!(app = idx, next_on = %next_on, "进入 OFF 时段");
            if next_on < self.apps[idx].stop {
                sim.schedule(next_on, AppTick { app: idx });
            }
            return;
        }

        self.app_send(idx, sim);
        let next = now.saturating_add(self.apps[idx].send_interval());
        if next < self.apps[idx].stop {
            sim.schedule(next, AppTick { app: idx });
        }
    }

    /// 源节点发包。没有路由时发送直接失败，流监控看不到这个包。
    fn app_send(&mut self, idx: usize, sim: &mut Simulator) {
        let app = &self.apps[idx];
        let node = &self.nodes[app.node.0];
        let dst = *app.remote.ip();
        let egress = node
            .routing
            .lookup(dst)
            .and_then(|r| node.interfaces.get(r.if_index as usize))
            .filter(|i| i.dev.is_some());
        let src_addr = match egress {
            Some(i) => i.addr,
            None if node.owns(dst) => node.primary_addr().unwrap_or(Ipv4Addr::LOCALHOST),
            None => {
                trace!(app = idx, node = ?app.node, %dst, "无路由，发送失败");
                self.stats.no_route_drops += 1;
                return;
            }
        };
        let tuple = FiveTuple {
            protocol: PROTO_UDP,
            src_addr,
            dst_addr: dst,
            src_port: app.src_port,
            dst_port: app.remote.port(),
        };
        let size = app.spec.packet_size_bytes;
        let from = app.node;

        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        let now = sim.now();
        let pkt = Packet::new(id, tuple, size, now);

        self.apps[idx].tx_packets += 1;
        self.stats.sent_pkts += 1;
        self.flow_monitor.record_tx(tuple, size, now);
        self.ip_output(from, pkt, sim);
    }

    /// 节点的 IP 输出：本地地址直接上交，否则查主机路由
    fn ip_output(&mut self, at: NodeId, pkt: Packet, sim: &mut Simulator) {
        let node = &self.nodes[at.0];
        let dst = pkt.tuple.dst_addr;
        if node.owns(dst) {
            self.local_deliver(at, pkt, sim);
            return;
        }
        let egress = node
            .routing
            .lookup(dst)
            .and_then(|r| node.interfaces.get(r.if_index as usize))
            .and_then(|i| i.dev);
        match egress {
            Some(dev) => self.device_send(dev, pkt, sim),
            None => {
                trace!(node = ?at, %dst, pkt_id = pkt.id, "无路由，丢弃");
                self.stats.no_route_drops += 1;
            }
        }
    }

    /// 设备发送：先触发 MacTx，再入队；空闲时立即开始序列化
    fn device_send(&mut self, dev: DeviceId, pkt: Packet, sim: &mut Simulator) {
        let d = &mut self.devices[dev.0];
        d.fire_mac_tx();
        if let Err(pkt) = d.queue.enqueue(pkt) {
            trace!(?dev, pkt_id = pkt.id, "队列已满，丢弃");
            self.stats.queue_drops += 1;
            return;
        }
        if !d.busy {
            self.start_tx(dev, sim);
        }
    }

    fn start_tx(&mut self, dev: DeviceId, sim: &mut Simulator) {
        let d = &mut self.devices[dev.0];
        let Some(pkt) = d.queue.dequeue() else {
            d.busy = false;
            return;
        };
        d.busy = true;
        let depart = sim.now().saturating_add(d.tx_time(pkt.size_bytes));
        let arrive = depart.saturating_add(d.delay);
        let peer = d.peer;
        sim.schedule(depart, LinkReady { dev });
        sim.schedule(arrive, DeliverPacket { to: peer, pkt });
    }

    pub(crate) fn on_link_ready(&mut self, dev: DeviceId, sim: &mut Simulator) {
        self.devices[dev.0].busy = false;
        if !self.devices[dev.0].queue.is_empty() {
            self.start_tx(dev, sim);
        }
    }

    /// 对端设备收到包：先过丢包模型，再触发 MacRx，然后交给节点
    pub(crate) fn on_device_receive(&mut self, dev: DeviceId, pkt: Packet, sim: &mut Simulator) {
        let lost = match self.devices[dev.0].rx_loss {
            Some(p) => self.rng.gen_bool(p),
            None => false,
        };
        if lost {
            trace!(?dev, pkt_id = pkt.id, "接收侧丢包");
            self.stats.error_drops += 1;
            return;
        }
        let d = &mut self.devices[dev.0];
        d.fire_mac_rx();
        let at = d.node;

        if self.nodes[at.0].owns(pkt.tuple.dst_addr) {
            self.local_deliver(at, pkt, sim);
            return;
        }
        match pkt.hop() {
            Some(pkt) => self.ip_output(at, pkt, sim),
            None => {
                trace!(node = ?at, "TTL 耗尽，丢弃");
                self.stats.ttl_drops += 1;
            }
        }
    }

    fn local_deliver(&mut self, at: NodeId, pkt: Packet, sim: &mut Simulator) {
        let now = sim.now();
        self.flow_monitor
            .record_rx(pkt.tuple, pkt.size_bytes, pkt.sent_at, now);
        self.stats.delivered_pkts += 1;
        self.stats.delivered_bytes += u64::from(pkt.size_bytes);
        if let Some(sink) = self.nodes[at.0].sinks.get_mut(&pkt.tuple.dst_port) {
            if sink.is_active(now) {
                sink.rx_packets += 1;
                sink.rx_bytes += u64::from(pkt.size_bytes);
            }
        }
    }
}

impl QueueProbe for Network {
    fn queue_packets(&self, dev: DeviceId) -> usize {
        self.devices.get(dev.0).map_or(0, |d| d.queue.len())
    }
}
