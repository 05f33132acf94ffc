//! # ying-codec
//!
//! Ying VC-1 基本流解析库, 提供增量式帧边界定位与头部字段提取.
//!
//! 本 crate 实现对 VC-1 (SMPTE 421M) Advanced Profile 基本流的解析:
//! - 起始码扫描与防竞争字节 (emulation prevention) 去除
//! - 任意切块输入下的帧边界定位, 跨调用可恢复
//! - 序列头部 / 入口点头部 / 帧头部字段提取
//!
//! ## 使用示例
//!
//! ```rust
//! use ying_codec::parsers::vc1::split_frames;
//!
//! // 原始 Advanced Profile 基本流 → 帧列表
//! let frames = split_frames(&[0x00, 0x00, 0x01, 0x0D, 0x12, 0x34]);
//! assert!(frames.is_empty() || !frames[0].data.is_empty());
//! ```

pub mod parsers;

// 重导出常用类型
pub use parsers::vc1::{
    FrameAssembler, FrameInfo, HeaderExtractor, ParsedFrame, StartCode, Vc1FrameReader,
    Vc1Headers, Vc1Parser, split_frames,
};
