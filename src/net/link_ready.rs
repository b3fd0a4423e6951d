//! 链路就绪事件（用于驱动队列出队）

use super::id::DeviceId;
use super::net_world::NetWorld;
use crate::sim::{Event, Simulator, World, downcast_world};
use tracing::warn;

/// 事件：设备完成一次序列化发送后触发，尝试发送队列中的下一个 packet。
#[derive(Debug)]
pub struct LinkReady {
    pub dev: DeviceId,
}

impl Event for LinkReady {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let LinkReady { dev } = *self;
        let Some(w) = downcast_world::<NetWorld>(world) else {
            warn!("world must be NetWorld");
            return;
        };
        w.net.on_link_ready(dev, sim);
    }
}
