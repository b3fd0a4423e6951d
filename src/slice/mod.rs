//! 单个时间片的仿真上下文
//!
//! 一个时间片用到的全部可变状态（节点名、地址表、接口绑定、链路计数、
//! 队列采样）都归 [`SliceContext`] 所有，每个时间片新建一个，
//! 不同时间片之间不共享任何状态。

mod address_book;

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;

use tracing::{debug, info, warn};

pub use address_book::{AddressBook, UNKNOWN_NAME};

use crate::config::SimConfig;
use crate::net::NodeId;
use crate::route::{InterfaceBindings, dijkstra, install_path, path_string};
use crate::sim::SimTime;
use crate::stack::{ChannelSpec, NetStack, OnOffSpec};
use crate::stats::{
    FlowSummary, LinkSnapshot, LinkStatsTable, MonitoredDevice, QueueMonitor, QueueSample,
    summarize_flow,
};
use crate::topo::{Graph, Topology, TrafficDemand};

/// 第 `k` 条链路使用的 /30 子网：`10.<(k/256)%256>.<k%256>.0`
pub fn subnet_base(k: usize) -> Ipv4Addr {
    Ipv4Addr::new(10, ((k / 256) % 256) as u8, (k % 256) as u8, 0)
}

/// 一个需求算出的路由
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub flow_id: u64,
    pub src_name: String,
    pub dst_name: String,
    pub path: Vec<NodeId>,
    pub path_string: String,
    /// 因缺少接口绑定而没装上的跳数
    pub skipped_hops: usize,
}

impl RouteRecord {
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// 一条链路的收发计数
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSummary {
    pub src_name: String,
    pub dst_name: String,
    pub counters: LinkSnapshot,
}

/// 一个时间片的全部结果
#[derive(Debug, Clone, Default)]
pub struct SliceReport {
    pub routes: Vec<RouteRecord>,
    pub flows: Vec<FlowSummary>,
    pub links: Vec<LinkSummary>,
    pub queue_samples: Vec<QueueSample>,
    pub addresses: AddressBook,
}

pub struct SliceContext {
    config: SimConfig,
    topology: Topology,
    demands: Vec<TrafficDemand>,
    graph: Graph,
    bindings: InterfaceBindings,
    addresses: AddressBook,
    node_addr: HashMap<NodeId, Ipv4Addr>,
    link_stats: Arc<LinkStatsTable>,
    monitor: QueueMonitor,
    routes: Vec<RouteRecord>,
}

impl SliceContext {
    pub fn new(topology: Topology, demands: Vec<TrafficDemand>, config: SimConfig) -> Self {
        let graph = topology.graph();
        let link_stats = LinkStatsTable::new(topology.links.len());
        Self {
            config,
            topology,
            demands,
            graph,
            bindings: InterfaceBindings::default(),
            addresses: AddressBook::default(),
            node_addr: HashMap::new(),
            link_stats,
            monitor: QueueMonitor::default(),
            routes: Vec::new(),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn bindings(&self) -> &InterfaceBindings {
        &self.bindings
    }

    pub fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    pub fn link_stats(&self) -> &Arc<LinkStatsTable> {
        &self.link_stats
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    pub fn monitor(&self) -> &QueueMonitor {
        &self.monitor
    }

    /// 流的目的地址：节点第一次分到的地址
    pub fn node_addr(&self, node: NodeId) -> Option<Ipv4Addr> {
        self.node_addr.get(&node).copied()
    }

    /// 把链路实例化为设备：分配地址、建立接口绑定、订阅收发计数、登记队列监控
    #[tracing::instrument(skip_all, fields(links = self.topology.links.len()))]
    pub fn realize(&mut self, stack: &mut dyn NetStack) {
        info!("Creating {} links...", self.topology.links.len());
        stack.create_nodes(self.topology.node_count());

        let mut monitored = Vec::with_capacity(self.topology.links.len() * 2);
        for (i, link) in self.topology.links.iter().enumerate() {
            let spec = ChannelSpec {
                data_rate_bps: link.data_rate_bps,
                delay: SimTime::from_millis_f64(link.delay_ms),
                loss: link.loss_injection(),
                queue_packets: self.config.queue_size_packets,
            };
            let devs = stack.install_link(link.src, link.dst, &spec);

            monitored.push(MonitoredDevice {
                src_name: link.src_name.clone(),
                dst_name: link.dst_name.clone(),
                dev: devs.a,
            });
            monitored.push(MonitoredDevice {
                src_name: link.dst_name.clone(),
                dst_name: link.src_name.clone(),
                dev: devs.b,
            });

            stack.trace_mac_tx(devs.a, self.link_stats.tx_sink(i));
            stack.trace_mac_rx(devs.b, self.link_stats.rx_sink(i));

            let [ia, ib] = stack.assign_addresses(&devs, subnet_base(i));
            self.bindings.bind_link(link.src, link.dst, ia, ib);

            self.addresses.insert(ia.addr, link.src_name.clone());
            self.addresses.insert(ib.addr, link.dst_name.clone());
            self.node_addr.entry(link.src).or_insert(ia.addr);
            self.node_addr.entry(link.dst).or_insert(ib.addr);
        }
        self.monitor = QueueMonitor::new(monitored);
    }

    /// 一个需求的最短路径；目的节点没有地址或不可达时返回 None
    pub fn route_demand(&self, demand: &TrafficDemand) -> Option<Vec<NodeId>> {
        if !self.node_addr.contains_key(&demand.dst) {
            debug!(demand = demand.demand_id, dst = demand.dst.0, "目的节点没有地址，丢弃需求");
            return None;
        }
        let path = dijkstra(&self.graph, demand.src).path_to(demand.dst);
        if path.len() < 2 {
            debug!(demand = demand.demand_id, "目的节点不可达，丢弃需求");
            return None;
        }
        Some(path)
    }

    /// 为每个需求计算路径、沿途安装主机路由、安装收发应用
    #[tracing::instrument(skip_all, fields(demands = self.demands.len()))]
    pub fn install_routes(&mut self, stack: &mut dyn NetStack) -> &[RouteRecord] {
        info!("Creating flows with static routing...");
        let stop = self.config.sim_time();
        let app = OnOffSpec {
            data_rate_bps: 0,
            packet_size_bytes: self.config.packet_size_bytes,
            on_time_mean_sec: self.config.on_time_mean_sec,
            off_time_mean_sec: self.config.off_time_mean_sec,
        };
        let mut port = self.config.start_port;

        for demand in &self.demands {
            let Some(path) = self.route_demand(demand) else {
                continue;
            };
            let Some(dst_addr) = self.node_addr(demand.dst) else {
                continue;
            };
            let path_str = path_string(&path, |n| self.topology.node_name(n));
            info!("  Flow {}: {}", demand.demand_id, path_str);

            let report = install_path(stack, &self.bindings, &path, dst_addr);
            if !report.is_complete() {
                warn!(
                    demand = demand.demand_id,
                    skipped = report.skipped.len(),
                    "路由只安装了一部分"
                );
            }

            stack.install_sink(demand.dst, port, SimTime::ZERO, stop);
            stack.install_on_off(
                demand.src,
                SocketAddrV4::new(dst_addr, port),
                &OnOffSpec {
                    data_rate_bps: demand.data_rate_bps(),
                    ..app.clone()
                },
                demand.start(),
                demand.stop(),
            );

            self.routes.push(RouteRecord {
                flow_id: demand.flow_id(),
                src_name: demand.src_node.clone(),
                dst_name: demand.dst_node.clone(),
                path,
                path_string: path_str,
                skipped_hops: report.skipped.len(),
            });
            port = port.wrapping_add(1);
        }
        &self.routes
    }

    /// 链路计数快照（按链路文件顺序）
    pub fn link_summaries(&self) -> Vec<LinkSummary> {
        self.topology
            .links
            .iter()
            .enumerate()
            .map(|(i, l)| LinkSummary {
                src_name: l.src_name.clone(),
                dst_name: l.dst_name.clone(),
                counters: self.link_stats.snapshot(i),
            })
            .collect()
    }

    /// 跑完整个时间片：实例化、装路由、周期采样、推进时钟、汇总、销毁
    #[tracing::instrument(skip_all)]
    pub fn run(mut self, stack: &mut dyn NetStack) -> SliceReport {
        self.realize(stack);
        self.install_routes(stack);

        let period = self.config.monitor_interval();
        let sampler = self.monitor.start(stack, period);

        let stop = self.config.sim_time();
        info!("Running {}s simulation...", stop.as_secs_f64());
        stack.run_until(stop);

        let flows = stack
            .flow_records()
            .iter()
            .map(summarize_flow)
            .collect::<Vec<_>>();
        drop(sampler);
        stack.teardown();

        SliceReport {
            links: self.link_summaries(),
            queue_samples: self.monitor.take_samples(),
            routes: self.routes,
            flows,
            addresses: self.addresses,
        }
    }
}
