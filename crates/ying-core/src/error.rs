//! 统一错误类型定义.
//!
//! 所有 Ying crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// Ying 框架统一错误类型
#[derive(Debug, Error)]
pub enum YingError {
    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 不支持的操作
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// 无效数据 (损坏的码流等)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// 已到达流末尾
    #[error("已到达流末尾")]
    Eof,
}

/// Ying 框架统一 Result 类型
pub type YingResult<T> = Result<T, YingError>;
