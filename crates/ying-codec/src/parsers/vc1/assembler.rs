//! 帧重组器: 跨 chunk 拼接完整帧.
//!
//! 解析器本身从不复制或拼接载荷, 它只报告边界偏移. 本模块负责把
//! 若干次输入累积成一个连续的完整帧缓冲区, 并保留边界之后的余量
//! (以下一帧的起始码开头), 由调用方在下一轮重新递给解析器,
//! 这正是解析器 `bytes_to_skip` 状态存在的原因.

use bytes::{Bytes, BytesMut};
use log::warn;

/// 帧重组器
///
/// 驱动循环的约定:
/// - 解析器未报告边界 → [`retain`](Self::retain) 整个 chunk, 等待更多输入;
/// - 解析器报告边界 `next` → [`combine`](Self::combine) 物化完整帧,
///   然后把 `chunk[next.max(0)..]` 重新递给解析器.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    /// 已累积的下一帧前缀 (始终从帧边界开始)
    buffer: BytesMut,
}

impl FrameAssembler {
    /// 创建空的帧重组器
    pub fn new() -> Self {
        Self::default()
    }

    /// 已累积的字节数
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// 边界未找到: 吸收整个 chunk, 等待更多输入
    pub fn retain(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// 在 chunk 内偏移 `next` 处存在帧边界: 物化完整帧
    ///
    /// `next` 为负表示关闭边界的起始码横跨了此前的输入,
    /// 此时从累积缓冲区尾部裁掉相应字节归还给下一帧.
    /// 物化结果为空时返回 `None` (数据不足, 状态保留).
    pub fn combine(&mut self, chunk: &[u8], next: isize) -> Option<Bytes> {
        let frame = if next >= 0 {
            let mut frame = self.buffer.split();
            frame.extend_from_slice(&chunk[..next as usize]);
            frame.freeze()
        } else {
            let Some(cut) = self.buffer.len().checked_add_signed(next) else {
                warn!(
                    "VC-1: 边界回退 {} 超过累积量 {}, 丢弃边界",
                    next,
                    self.buffer.len()
                );
                return None;
            };
            let tail = self.buffer.split_off(cut);
            std::mem::replace(&mut self.buffer, tail).freeze()
        };

        if frame.is_empty() { None } else { Some(frame) }
    }

    /// 清空累积状态 (流结束或重新定位后使用)
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
