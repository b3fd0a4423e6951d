//! 数据包到达事件
//!
//! 包离开发送设备、经过信道时延后，在对端设备上触发。

use super::id::DeviceId;
use super::net_world::NetWorld;
use super::packet::Packet;
use crate::sim::{Event, Simulator, World, downcast_world};
use tracing::{trace, warn};

/// 事件：把一个 packet 交给某个设备接收。
#[derive(Debug)]
pub struct DeliverPacket {
    pub to: DeviceId,
    pub pkt: Packet,
}

impl Event for DeliverPacket {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DeliverPacket { to, pkt } = *self;
        trace!(pkt_id = pkt.id, dev = ?to, now = %sim.now(), "📨 数据包到达设备");

        let Some(w) = downcast_world::<NetWorld>(world) else {
            warn!("world must be NetWorld");
            return;
        };
        w.net.on_device_receive(to, pkt, sim);
    }
}
