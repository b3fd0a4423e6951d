//! 拓扑与流量需求
//!
//! 链路文件和需求文件是两份独立的数据集，分别加载。

mod demands;
mod graph;
mod links;
mod rows;

pub use demands::{TrafficDemand, load_demands, parse_demands};
pub use graph::Graph;
pub use links::{
    DEFAULT_DATA_RATE_BPS, DEFAULT_DELAY_MS, LinkParam, MIN_DATA_RATE_BPS, Topology, load_links,
    parse_links,
};
pub use rows::RowError;
