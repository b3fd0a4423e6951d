//! 网络模拟模块
//!
//! 点到点设备、静态主机路由、UDP 流量源/接收端与流监控，
//! 以及把它们包装成 [`crate::stack::NetStack`] 的 [`SimStack`]。

// 子模块声明
mod app;
mod deliver_packet;
mod device;
mod flow_monitor;
mod id;
mod link_ready;
mod net_world;
mod network;
mod node;
mod packet;
mod periodic;
mod routing;
mod sim_stack;
mod stats;

// 重新导出公共接口
pub use app::{AppTick, EPHEMERAL_PORT_BASE, OnOffApp};
pub use deliver_packet::DeliverPacket;
pub use device::NetDevice;
pub use flow_monitor::{FiveTuple, FlowEntry, FlowMonitor, FlowRecord, PROTO_UDP};
pub use id::{DeviceId, NodeId};
pub use link_ready::LinkReady;
pub use net_world::NetWorld;
pub use network::Network;
pub use node::{Interface, Node, PacketSink};
pub use packet::{DEFAULT_TTL, Packet};
pub use periodic::PeriodicTick;
pub use routing::{HostRoute, StaticRouting};
pub use sim_stack::SimStack;
pub use stats::Stats;
