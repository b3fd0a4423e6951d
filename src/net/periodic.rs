//! 周期任务事件
//!
//! 每次执行后按周期重新调度自己，直到取消标志被置位。

use super::net_world::NetWorld;
use crate::sim::{Event, SimTime, Simulator, World, downcast_world};
use crate::stack::{PeriodicTask, TimerFlag};
use tracing::{trace, warn};

pub struct PeriodicTick {
    pub period: SimTime,
    pub task: PeriodicTask,
    pub flag: TimerFlag,
}

impl Event for PeriodicTick {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let mut me = *self;
        if me.flag.is_cancelled() {
            trace!("周期任务已取消");
            return;
        }
        let Some(w) = downcast_world::<NetWorld>(world) else {
            warn!("world must be NetWorld");
            return;
        };
        (me.task)(sim.now(), &w.net);
        sim.schedule_in(me.period, me);
    }
}
