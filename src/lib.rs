//! # Ying (影)
//!
//! 纯 Rust 实现的 VC-1 (SMPTE 421M) Advanced Profile 基本流解析库.
//!
//! Ying 提供增量式的基本流解析能力:
//! - **帧边界定位**: 输入可按任意边界切块, 扫描进度跨调用恢复
//! - **选择性去防竞争**: 每段只物化头部解码所需的少量字节
//! - **头部字段提取**: 序列头部 / 入口点头部 / 帧头部的时序相关字段
//! - **帧重组**: 跨 chunk 拼接可直接送入解码器的完整帧
//!
//! # 快速开始
//!
//! ```rust
//! use ying::codec::parsers::vc1::Vc1FrameReader;
//!
//! let mut reader = Vc1FrameReader::new();
//! // 按任意块大小投喂原始基本流字节
//! let frames = reader.push_chunk(&[0x00, 0x00, 0x01, 0x0D, 0x12, 0x34]);
//! assert!(frames.is_empty()); // 帧尚未结束, 继续投喂或冲刷
//! assert!(reader.finish().is_some());
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `ying-core` | 核心类型与位流工具 |
//! | `ying-codec` | VC-1 基本流解析器 |

/// 核心类型与位流工具
pub use ying_core as core;

/// VC-1 基本流解析器
pub use ying_codec as codec;

/// 获取 Ying 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
