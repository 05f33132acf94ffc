//! 起始码候选搜索原语.
//!
//! 当一个段的头部字节已全部捕获后, 其余载荷只需要做边界探测.
//! 此时解析器处于 `NoMatch` 状态, 可以整块跳过所有非零字节,
//! 只在下一个可能构成起始码前缀的 0x00 处恢复逐字节确认.
//!
//! 实现必须满足两条约束: 不允许漏报 (候选之前不能存在任何 0x00),
//! 不允许越过给定窗口读取. 误报是允许的, 因为候选之后仍会经过
//! 状态机逐字节验证.

/// 起始码候选搜索策略
pub trait CandidateSearch {
    /// 返回 `window` 中下一个 0x00 字节的偏移; 不存在时返回 `window.len()`
    fn next_candidate(&self, window: &[u8]) -> usize;
}

/// 基于 memchr 的候选搜索 (默认实现)
#[derive(Debug, Default)]
pub struct MemchrSearch;

impl CandidateSearch for MemchrSearch {
    fn next_candidate(&self, window: &[u8]) -> usize {
        memchr::memchr(0x00, window).unwrap_or(window.len())
    }
}

/// 可移植的标量候选搜索
///
/// 与 [`MemchrSearch`] 行为完全一致, 用于交叉验证和无依赖场景.
#[derive(Debug, Default)]
pub struct ScalarSearch;

impl CandidateSearch for ScalarSearch {
    fn next_candidate(&self, window: &[u8]) -> usize {
        window.iter().position(|&b| b == 0x00).unwrap_or(window.len())
    }
}
