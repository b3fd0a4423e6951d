//! 网络协议栈能力接口
//!
//! 路由/统计核心只通过这个 trait 使用外部仿真器：建节点、把链路实例化成
//! 两个设备、分配地址、订阅收发事件、安装主机路由、安装应用、读取队列长度、
//! 注册周期任务、推进时钟、读取流统计。单元测试可以用一个记录调用的替身实现。

use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::net::{DeviceId, FlowEntry, NodeId};
use crate::sim::SimTime;

/// 一条点到点信道的参数
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    pub data_rate_bps: u64,
    pub delay: SimTime,
    /// `Some(p)` 时在两端的接收侧按概率 p 丢包
    pub loss: Option<f64>,
    /// 每个设备的 DropTail 队列容量（包）
    pub queue_packets: usize,
}

/// 一条链路实例化出的两个设备：`a` 在源节点，`b` 在目的节点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevicePair {
    pub a: DeviceId,
    pub b: DeviceId,
}

/// 设备所在节点上的接口编号与地址
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub if_index: u32,
    pub addr: Ipv4Addr,
}

/// OnOff 流量源参数
#[derive(Debug, Clone, PartialEq)]
pub struct OnOffSpec {
    pub data_rate_bps: u64,
    pub packet_size_bytes: u32,
    pub on_time_mean_sec: f64,
    pub off_time_mean_sec: f64,
}

/// 设备收发事件回调
pub type TraceSink = Box<dyn FnMut() + Send>;

/// 读取设备队列长度
pub trait QueueProbe {
    fn queue_packets(&self, dev: DeviceId) -> usize;
}

/// 周期任务：每个周期以当前时间和队列探针调用一次
pub type PeriodicTask = Box<dyn FnMut(SimTime, &dyn QueueProbe) + Send>;

/// 周期任务的取消句柄。句柄被 drop 时任务不再重新调度。
#[derive(Debug)]
pub struct TimerGuard {
    cancelled: Arc<AtomicBool>,
}

impl TimerGuard {
    /// 返回句柄和由调度方持有的取消标志
    pub fn pair() -> (Self, TimerFlag) {
        let cancelled = Arc::new(AtomicBool::new(false));
        (
            Self {
                cancelled: Arc::clone(&cancelled),
            },
            TimerFlag { cancelled },
        )
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 调度方一侧的取消标志
#[derive(Debug, Clone)]
pub struct TimerFlag {
    cancelled: Arc<AtomicBool>,
}

impl TimerFlag {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

pub trait NetStack: QueueProbe {
    /// 创建 `n` 个可寻址节点，id 为 `0..n`
    fn create_nodes(&mut self, n: usize);

    /// 在 `a`、`b` 之间建立点到点链路
    fn install_link(&mut self, a: NodeId, b: NodeId, spec: &ChannelSpec) -> DevicePair;

    /// 给两个设备分配 /30 子网中的地址：`a` 取 base+1，`b` 取 base+2
    fn assign_addresses(&mut self, devs: &DevicePair, subnet_base: Ipv4Addr) -> [InterfaceAddr; 2];

    /// 设备把包交给 MAC 层发送时回调
    fn trace_mac_tx(&mut self, dev: DeviceId, sink: TraceSink);

    /// 设备成功接收一个包时回调（接收侧丢包之后）
    fn trace_mac_rx(&mut self, dev: DeviceId, sink: TraceSink);

    /// 在 `node` 的转发表中添加一条主机路由
    fn add_host_route(&mut self, node: NodeId, dst: Ipv4Addr, next_hop: Ipv4Addr, if_index: u32);

    /// 在 `node` 上安装一个 UDP 接收端
    fn install_sink(&mut self, node: NodeId, port: u16, start: SimTime, stop: SimTime);

    /// 在 `node` 上安装一个发往 `remote` 的 OnOff 流量源
    fn install_on_off(
        &mut self,
        node: NodeId,
        remote: SocketAddrV4,
        spec: &OnOffSpec,
        start: SimTime,
        stop: SimTime,
    );

    /// 注册一个从 `first` 开始、每 `period` 执行一次的任务
    fn schedule_periodic(&mut self, first: SimTime, period: SimTime, task: PeriodicTask)
    -> TimerGuard;

    /// 推进时钟到 `stop`
    fn run_until(&mut self, stop: SimTime);

    /// 仿真结束后的流统计
    fn flow_records(&self) -> Vec<FlowEntry>;

    /// 释放仿真资源，丢弃尚未执行的事件
    fn teardown(&mut self);
}
