//! 事件 trait

use super::simulator::Simulator;
use super::world::World;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
///
/// 事件在执行时拿到仿真器（用于继续调度）和世界（业务状态），
/// 同一时刻的事件按调度顺序执行。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
