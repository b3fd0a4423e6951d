//! 世界 trait
//!
//! 定义仿真世界接口。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：由业务层实现（例如网络设备/流统计等）。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}

/// 把 `dyn World` 还原为具体类型；类型不符时返回 None。
pub fn downcast_world<W: World>(world: &mut dyn World) -> Option<&mut W> {
    world.as_any_mut().downcast_mut::<W>()
}
