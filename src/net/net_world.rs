//! 网络世界实现
//!
//! 定义网络仿真的世界（World）实现，持有 Network。

use super::network::Network;
use crate::sim::World;
use std::any::Any;

#[derive(Default)]
pub struct NetWorld {
    pub net: Network,
}

impl NetWorld {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            net: Network::new(seed),
        }
    }
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
