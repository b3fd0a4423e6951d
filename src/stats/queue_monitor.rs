//! 队列长度周期采样

use std::sync::{Arc, Mutex, PoisonError};

use crate::net::DeviceId;
use crate::sim::SimTime;
use crate::stack::{NetStack, QueueProbe, TimerGuard};

/// 被监控的单向链路端点（每条链路两个）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredDevice {
    pub src_name: String,
    pub dst_name: String,
    pub dev: DeviceId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueSample {
    pub time: SimTime,
    pub src_name: String,
    pub dst_name: String,
    pub packets: usize,
}

#[derive(Debug, Clone, Default)]
pub struct QueueMonitor {
    devices: Arc<Vec<MonitoredDevice>>,
    samples: Arc<Mutex<Vec<QueueSample>>>,
}

impl QueueMonitor {
    pub fn new(devices: Vec<MonitoredDevice>) -> Self {
        Self {
            devices: Arc::new(devices),
            samples: Arc::default(),
        }
    }

    /// 对每个被监控设备读一次队列长度
    pub fn sample(&self, now: SimTime, probe: &dyn QueueProbe) {
        let mut out = self.samples.lock().unwrap_or_else(PoisonError::into_inner);
        for m in self.devices.iter() {
            out.push(QueueSample {
                time: now,
                src_name: m.src_name.clone(),
                dst_name: m.dst_name.clone(),
                packets: probe.queue_packets(m.dev),
            });
        }
    }

    /// 注册为周期任务：从 `period` 时刻开始，每个周期采样一次。
    /// 返回的句柄被 drop 后不再采样。
    pub fn start(&self, stack: &mut dyn NetStack, period: SimTime) -> TimerGuard {
        let me = self.clone();
        stack.schedule_periodic(
            period,
            period,
            Box::new(move |now: SimTime, probe: &dyn QueueProbe| me.sample(now, probe)),
        )
    }

    /// 按时间顺序取出全部采样
    pub fn take_samples(&self) -> Vec<QueueSample> {
        let mut out = self.samples.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *out)
    }

    pub fn devices(&self) -> &[MonitoredDevice] {
        &self.devices
    }
}
