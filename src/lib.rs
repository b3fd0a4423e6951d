pub mod config;
pub mod error;
pub mod net;
pub mod queue;
pub mod report;
pub mod route;
pub mod sim;
pub mod slice;
pub mod stack;
pub mod stats;
pub mod topo;

pub use error::{Error, Result};

#[cfg(test)]
mod test;
