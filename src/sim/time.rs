//! 仿真时间类型
//!
//! 定义仿真时间及其单位转换。输入文件里的时间是浮点秒/毫秒，
//! 内部统一用整数纳秒，保证事件排序确定。

use std::fmt;

/// 仿真时间（纳秒）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    pub fn from_micros(us: u64) -> SimTime {
        SimTime(us.saturating_mul(1_000))
    }
    pub fn from_millis(ms: u64) -> SimTime {
        SimTime(ms.saturating_mul(1_000_000))
    }
    pub fn from_secs(s: u64) -> SimTime {
        SimTime(s.saturating_mul(1_000_000_000))
    }

    /// 浮点秒 -> 纳秒（负数/NaN 视为 0，四舍五入）
    pub fn from_secs_f64(s: f64) -> SimTime {
        Self::from_nanos_f64(s * 1e9)
    }

    /// 浮点毫秒 -> 纳秒
    pub fn from_millis_f64(ms: f64) -> SimTime {
        Self::from_nanos_f64(ms * 1e6)
    }

    fn from_nanos_f64(ns: f64) -> SimTime {
        if ns.is_nan() || ns <= 0.0 {
            return SimTime::ZERO;
        }
        if ns >= u64::MAX as f64 {
            return SimTime::MAX;
        }
        SimTime(ns.round() as u64)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1e9
    }

    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / 1e6
    }

    pub fn saturating_add(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: SimTime) -> SimTime {
        SimTime(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}s", self.as_secs_f64())
    }
}
