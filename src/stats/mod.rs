//! 链路与流统计

mod flow_stats;
mod link_stats;
mod queue_monitor;

pub use flow_stats::{FlowMetrics, FlowSummary, summarize_flow};
pub use link_stats::{LinkCounters, LinkSnapshot, LinkStatsTable};
pub use queue_monitor::{MonitoredDevice, QueueMonitor, QueueSample};
