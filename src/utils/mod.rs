//! 通用工具：执行器共用的分组辅助函数。
//!
//! Structural helpers shared by the executors.

pub mod chunk;

pub use chunk::{chunk, chunk_stream, Chunks};
