//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod client;
pub mod llm;

pub use client::*;
pub use llm::*;
