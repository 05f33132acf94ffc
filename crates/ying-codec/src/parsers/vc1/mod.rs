//! VC-1 (SMPTE 421M) Advanced Profile 基本流解析器.
//!
//! # 码流结构
//!
//! Advanced Profile 基本流由起始码分隔的段 (BDU) 组成:
//! ```text
//! [00 00 01 <ID>] 段数据 [00 00 01 <ID>] 段数据 ...
//! ```
//! 起始码前允许出现多余的 0x00 填充. 段数据内部用防竞争字节转义,
//! `00 00 03` 中的 0x03 是编码器插入的, 解码前需要去除.
//!
//! 一个可解码帧由一个帧/场段及其后续的场/切片段组成; 序列头部和
//! 入口点头部段属于它们之后的帧.
//!
//! # 模块划分
//!
//! - [`parser`]: 增量扫描核心 (状态机 + 选择性去防竞争 + 边界判定)
//! - [`headers`]: 头部字段语义解码
//! - [`assembler`]: 跨 chunk 的完整帧重组
//! - [`search`]: 起始码候选快速搜索

pub mod assembler;
pub mod headers;
pub mod parser;
pub mod search;

pub use assembler::FrameAssembler;
pub use headers::{
    EntryPoint, FrameCoding, FrameInfo, HeaderExtractor, PictureType, SequenceHeader, Vc1Headers,
};
pub use parser::{UNESCAPED_LIMIT, UNESCAPED_THRESHOLD, Vc1Parser};
pub use search::{CandidateSearch, MemchrSearch, ScalarSearch};

use bytes::Bytes;

/// VC-1 起始码类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCode {
    /// 序列结束 (0x0A)
    EndOfSequence,
    /// 切片 (0x0B)
    Slice,
    /// 场 (0x0C)
    Field,
    /// 帧 (0x0D)
    Frame,
    /// 入口点头部 (0x0E)
    EntryPoint,
    /// 序列头部 (0x0F)
    SequenceHeader,
    /// 各级用户数据 (0x1B-0x1F)
    UserData(u8),
    /// 保留/未定义
    Reserved(u8),
}

impl StartCode {
    /// 从起始码 ID 字节识别类型
    pub fn from_byte(id: u8) -> Self {
        match id {
            0x0A => Self::EndOfSequence,
            0x0B => Self::Slice,
            0x0C => Self::Field,
            0x0D => Self::Frame,
            0x0E => Self::EntryPoint,
            0x0F => Self::SequenceHeader,
            0x1B..=0x1F => Self::UserData(id),
            other => Self::Reserved(other),
        }
    }

    /// 获取 ID 字节
    pub fn byte(&self) -> u8 {
        match self {
            Self::EndOfSequence => 0x0A,
            Self::Slice => 0x0B,
            Self::Field => 0x0C,
            Self::Frame => 0x0D,
            Self::EntryPoint => 0x0E,
            Self::SequenceHeader => 0x0F,
            Self::UserData(id) | Self::Reserved(id) => *id,
        }
    }

    /// 此段是否能打开一个新帧 (帧或首场)
    pub fn starts_frame(&self) -> bool {
        matches!(self, Self::Frame | Self::Field)
    }

    /// 此段是否延续已打开的帧 (后续场/切片)
    pub fn extends_frame(&self) -> bool {
        matches!(self, Self::Field | Self::Slice)
    }
}

/// 一个被切分出来的完整帧
#[derive(Debug, Clone)]
pub struct ParsedFrame {
    /// 帧数据 (含起始码, 可直接送入解码器)
    pub data: Bytes,
    /// 帧在源流中的字节偏移
    pub offset: usize,
    /// 帧头部信息 (头部损坏或缺少序列头部时为 None)
    pub info: Option<FrameInfo>,
}

/// 流式帧读取器: 解析器与重组器的驱动循环
///
/// 封装"报边界 → 物化 → 重递余量"的固定套路, 调用方只需要按任意
/// 块大小投喂字节, 每次拿回零个或多个完整帧.
///
/// # 示例
/// ```
/// use ying_codec::parsers::vc1::Vc1FrameReader;
///
/// let mut reader = Vc1FrameReader::new();
/// let mut frames = Vec::new();
/// for chunk in [&[0x00u8, 0x00][..], &[0x01, 0x0D, 0xAA][..]] {
///     frames.extend(reader.push_chunk(chunk));
/// }
/// frames.extend(reader.finish());
/// ```
#[derive(Default)]
pub struct Vc1FrameReader {
    parser: Vc1Parser,
    assembler: FrameAssembler,
    /// 下一帧在源流中的起始偏移
    offset: usize,
}

impl Vc1FrameReader {
    /// 创建新的帧读取器
    pub fn new() -> Self {
        Self::default()
    }

    /// 访问头部解码状态 (流级属性: 尺寸、帧率等)
    pub fn headers(&self) -> &Vc1Headers {
        self.parser.headers()
    }

    /// 投喂一个输入块, 返回其中完成的帧
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<ParsedFrame> {
        let mut frames = Vec::new();
        if chunk.is_empty() {
            return frames;
        }

        let mut rest = chunk;
        loop {
            match self.parser.push(rest, false) {
                None => {
                    self.assembler.retain(rest);
                    break;
                }
                Some(next) => {
                    if let Some(data) = self.assembler.combine(rest, next) {
                        self.emit(&mut frames, data);
                    }
                    rest = &rest[next.max(0) as usize..];
                    if rest.is_empty() {
                        break;
                    }
                }
            }
        }
        frames
    }

    /// 流结束: 冲刷并返回最后一个未完成的帧
    pub fn finish(&mut self) -> Option<ParsedFrame> {
        self.parser.push(&[], false)?;
        let data = self.assembler.combine(&[], 0)?;
        let mut frames = Vec::with_capacity(1);
        self.emit(&mut frames, data);
        frames.pop()
    }

    fn emit(&mut self, frames: &mut Vec<ParsedFrame>, data: Bytes) {
        let offset = self.offset;
        self.offset += data.len();
        frames.push(ParsedFrame {
            info: self.parser.headers().frame_info().cloned(),
            offset,
            data,
        });
    }
}

/// 把一段完整的基本流切分为帧列表
///
/// 一次性接口: 内部以流式方式驱动 [`Vc1FrameReader`] 并在末尾冲刷.
pub fn split_frames(data: &[u8]) -> Vec<ParsedFrame> {
    let mut reader = Vc1FrameReader::new();
    let mut frames = reader.push_chunk(data);
    frames.extend(reader.finish());
    frames
}
