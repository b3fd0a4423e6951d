//! 地址 -> 节点名称

use std::collections::HashMap;
use std::net::Ipv4Addr;

pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressBook {
    names: HashMap<Ipv4Addr, String>,
}

impl AddressBook {
    pub fn insert(&mut self, addr: Ipv4Addr, name: impl Into<String>) {
        self.names.insert(addr, name.into());
    }

    /// 未分配过的地址解析为 `Unknown`
    pub fn name_of(&self, addr: Ipv4Addr) -> &str {
        self.names.get(&addr).map_or(UNKNOWN_NAME, String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ipv4Addr, &str)> {
        self.names.iter().map(|(a, n)| (*a, n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
