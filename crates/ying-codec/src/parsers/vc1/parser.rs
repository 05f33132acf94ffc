//! VC-1 基本流增量解析核心.
//!
//! 在一次遍历中同时完成三件事:
//! - 起始码探测: 4 状态机识别 `00 00 01 <ID>` (容忍多余前导零);
//! - 选择性去防竞争: 每段只把头部解码所需的前
//!   [`UNESCAPED_THRESHOLD`] 个去防竞争字节物化到固定缓冲区,
//!   其余载荷只做边界扫描, 从不复制;
//! - 帧边界判定: 依据起始码类型决定一个可解码帧在哪里结束.
//!
//! 输入可以按任意边界切块. 所有扫描进度 (状态机状态、部分捕获的
//! 头部字节、待跳过的重递字节数) 都保存在 [`Vc1Parser`] 中,
//! 下一次调用从中断处继续, 已消费的字节不会被重复处理.

use log::{debug, trace};

use super::StartCode;
use super::headers::{HeaderExtractor, Vc1Headers};
use super::search::{CandidateSearch, MemchrSearch};

/// 每段最多捕获的去防竞争头部字节数
///
/// 覆盖所有受支持头部类型中被提取字段的最大字节偏移.
pub const UNESCAPED_THRESHOLD: usize = 37;

/// 捕获缓冲区容量
///
/// 头部解码逻辑允许对可选尾部做推测性读取, 此上限保证即使在
/// 畸形码流上也不会越过缓冲区内存. 换用其他起始码格式时,
/// 两个上限都需要按该格式的字段布局重新推导.
pub const UNESCAPED_LIMIT: usize = 144;

const _: () = assert!(UNESCAPED_THRESHOLD <= UNESCAPED_LIMIT);

/// 起始码搜索状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchState {
    /// 未命中任何前缀字节
    NoMatch,
    /// 已见 1 个 0x00
    OneZero,
    /// 已见 2 个及以上 0x00
    TwoZeros,
    /// 已见 `00 00 01`, 下一个字节是起始码 ID
    One,
}

/// VC-1 基本流增量解析器
///
/// 每个流对应一个实例, 由调用方独占持有并在每次输入时复用.
/// 固定容量缓冲区直接内嵌, 核心路径无堆分配.
pub struct Vc1Parser<E: HeaderExtractor = Vc1Headers> {
    /// 头部提取协作者
    extractor: E,
    /// 起始码候选搜索策略 (捕获完成后的快速扫描)
    search: Box<dyn CandidateSearch>,
    /// 最近打开的段的起始码 (真正的流结束后为 None)
    prev_start_code: Option<StartCode>,
    /// 下次输入开头需要忽略的字节数 (重组器重递的起始码)
    bytes_to_skip: usize,
    /// 去防竞争捕获缓冲区
    unesc_buffer: [u8; UNESCAPED_LIMIT],
    /// 缓冲区中的有效字节数 (≤ UNESCAPED_THRESHOLD)
    unesc_index: usize,
    /// 搜索状态机状态
    search_state: SearchState,
    /// 流式模式: 当前是否有帧/场段处于打开状态
    frame_start_found: bool,
}

impl Vc1Parser<Vc1Headers> {
    /// 创建使用内置头部解码器的解析器
    pub fn new() -> Self {
        Self::with_extractor(Vc1Headers::new())
    }

    /// 访问内置头部解码状态
    pub fn headers(&self) -> &Vc1Headers {
        &self.extractor
    }
}

impl Default for Vc1Parser<Vc1Headers> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: HeaderExtractor> Vc1Parser<E> {
    /// 创建使用指定头部提取器的解析器
    pub fn with_extractor(extractor: E) -> Self {
        Self {
            extractor,
            search: Box::new(MemchrSearch),
            prev_start_code: None,
            bytes_to_skip: 0,
            unesc_buffer: [0; UNESCAPED_LIMIT],
            unesc_index: 0,
            search_state: SearchState::NoMatch,
            frame_start_found: false,
        }
    }

    /// 替换起始码候选搜索策略
    pub fn set_candidate_search(&mut self, search: Box<dyn CandidateSearch>) {
        self.search = search;
    }

    /// 访问头部提取器
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// 可变访问头部提取器
    pub fn extractor_mut(&mut self) -> &mut E {
        &mut self.extractor
    }

    /// 流式模式下当前是否有帧处于打开状态
    pub fn is_frame_open(&self) -> bool {
        self.frame_start_found
    }

    /// 重置全部扫描状态 (重新定位后使用), 头部解码状态保留
    pub fn reset(&mut self) {
        self.prev_start_code = None;
        self.bytes_to_skip = 0;
        self.unesc_index = 0;
        self.search_state = SearchState::NoMatch;
        self.frame_start_found = false;
    }

    /// 送入下一个输入块, 返回帧边界
    ///
    /// - 流式模式 (`complete_frames = false`): 返回 `Some(next)` 表示
    ///   当前帧结束于相对本 chunk 偏移 `next` 处 (起始码横跨上一个
    ///   chunk 时为负); 返回 `None` 表示还需要更多输入. 找到边界后
    ///   调用方应把 `chunk[next.max(0)..]` 重新递入, 其开头的起始码
    ///   字节已被消费, 解析器会自行跳过.
    /// - 完整帧模式 (`complete_frames = true`): 调用方保证每个 chunk
    ///   恰为一帧, 始终返回 `Some(chunk.len())`; 帧头部字节捕获完成后
    ///   即停止扫描, 不再触碰其余内容.
    /// - 空 chunk 表示流结束: 若有帧处于打开状态, 以零填充冲刷其
    ///   头部并返回 `Some(0)`.
    pub fn push(&mut self, chunk: &[u8], complete_frames: bool) -> Option<isize> {
        if chunk.is_empty() {
            return self.flush_eof(complete_frames);
        }

        let mut pic_found = self.frame_start_found;
        let mut next: Option<isize> = None;

        // 上一轮边界处的起始码由重组器重递, 跳过已消费的部分
        let consumed_skip = self.bytes_to_skip.min(chunk.len());
        self.bytes_to_skip -= consumed_skip;
        let mut i = consumed_skip;

        'scan: while i < chunk.len() {
            let mut start_code: Option<u8> = None;

            // 捕获阶段: 逐字节去防竞争并累积头部字节
            while i < chunk.len() && self.unesc_index < UNESCAPED_THRESHOLD {
                let b = chunk[i];
                i += 1;
                self.unesc_buffer[self.unesc_index] = b;
                self.unesc_index += 1;
                match self.search_state {
                    SearchState::NoMatch => {
                        if b == 0x00 {
                            self.search_state = SearchState::OneZero;
                        }
                    }
                    SearchState::OneZero => {
                        self.search_state = if b == 0x00 {
                            SearchState::TwoZeros
                        } else {
                            SearchState::NoMatch
                        };
                    }
                    SearchState::TwoZeros => {
                        if b == 0x01 {
                            self.search_state = SearchState::One;
                        } else if b == 0x03 {
                            // 吞掉防竞争字节: 00 00 03 → 00 00
                            self.unesc_index -= 1;
                            self.search_state = SearchState::NoMatch;
                        } else if b != 0x00 {
                            self.search_state = SearchState::NoMatch;
                        }
                        // b == 0x00: 起始码前多余的前导零, 维持现状
                    }
                    SearchState::One => {
                        // b 是起始码 ID, 当前段到此为止
                        self.search_state = SearchState::NoMatch;
                        start_code = Some(b);
                        break;
                    }
                }
            }

            // 完整帧模式短路: 帧头部已捕获完毕, 其余内容无需扫描
            if complete_frames
                && self.unesc_index >= UNESCAPED_THRESHOLD
                && self.prev_start_code == Some(StartCode::Frame)
            {
                self.dispatch(UNESCAPED_THRESHOLD);
                self.unesc_index = 0;
                self.prev_start_code = None;
                break 'scan;
            }

            // 快速扫描阶段: 头部字节已捕获完毕, 剩余载荷只找边界
            if self.unesc_index >= UNESCAPED_THRESHOLD && start_code.is_none() {
                while i < chunk.len() {
                    match self.search_state {
                        SearchState::NoMatch => {
                            i += self.search.next_candidate(&chunk[i..]);
                            if i < chunk.len() {
                                self.search_state = SearchState::OneZero;
                            }
                            i += 1;
                        }
                        SearchState::OneZero => {
                            let b = chunk[i];
                            i += 1;
                            self.search_state = if b == 0x00 {
                                SearchState::TwoZeros
                            } else {
                                SearchState::NoMatch
                            };
                        }
                        SearchState::TwoZeros => {
                            let b = chunk[i];
                            i += 1;
                            if b == 0x01 {
                                self.search_state = SearchState::One;
                            } else if b != 0x00 {
                                // 窗口之外不做去防竞争, 0x03 同样只是回退
                                self.search_state = SearchState::NoMatch;
                            }
                        }
                        SearchState::One => {
                            let b = chunk[i];
                            i += 1;
                            self.search_state = SearchState::NoMatch;
                            start_code = Some(b);
                            break;
                        }
                    }
                }
            }

            let Some(id) = start_code else {
                // chunk 耗尽, 状态已保存, 下次调用续扫
                break 'scan;
            };

            // 段关闭: 分发已捕获的头部字节, 切换到新段
            self.dispatch(self.unesc_index);
            let code = StartCode::from_byte(id);
            trace!("VC-1: 起始码 {:?} @ {}", code, i);
            self.prev_start_code = Some(code);
            self.unesc_index = 0;

            if !complete_frames {
                if !pic_found && code.starts_frame() {
                    pic_found = true;
                } else if pic_found && !code.extends_frame() {
                    // 当前帧结束于刚发现的起始码之前 (4 字节标记不属于它)
                    next = Some(i as isize - 4);
                    pic_found = code == StartCode::Frame;
                    break 'scan;
                }
            }
        }

        if complete_frames {
            // 每次调用恰为一帧, 段状态不跨调用保留
            if self.prev_start_code.is_some() {
                self.unesc_buffer[self.unesc_index..UNESCAPED_THRESHOLD].fill(0);
                self.dispatch(UNESCAPED_THRESHOLD);
            }
            self.prev_start_code = None;
            self.unesc_index = 0;
            self.search_state = SearchState::NoMatch;
            self.bytes_to_skip = 0;
            return Some(chunk.len() as isize);
        }

        self.frame_start_found = pic_found;
        if let Some(n) = next {
            // 重组器会把刚发现的起始码重新递到下次输入的开头
            self.bytes_to_skip = (4 + n.min(0)) as usize;
        }
        next
    }

    /// 流结束: 以零填充冲刷仍处于打开状态的帧头部
    fn flush_eof(&mut self, complete_frames: bool) -> Option<isize> {
        let mut next = None;
        if self.frame_start_found {
            self.unesc_buffer[self.unesc_index..UNESCAPED_THRESHOLD].fill(0);
            self.dispatch(UNESCAPED_THRESHOLD);
            next = Some(0);
        }
        self.prev_start_code = None;
        self.unesc_index = 0;
        self.search_state = SearchState::NoMatch;
        self.frame_start_found = false;
        self.bytes_to_skip = 0;
        if complete_frames { Some(0) } else { next }
    }

    /// 把当前段已捕获的头部字节交给提取器
    ///
    /// 提取失败只记录日志, 既有解码状态由提取器自身保证不变;
    /// 扫描在任何输入畸形下都继续前进.
    fn dispatch(&mut self, len: usize) {
        let Some(code) = self.prev_start_code else {
            return;
        };
        debug_assert!(len <= UNESCAPED_THRESHOLD);
        if let Err(err) = self.extractor.extract(code, &self.unesc_buffer[..len]) {
            debug!("VC-1: {:?} 段头部解码失败, 保留既有状态: {}", code, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::vc1::search::ScalarSearch;
    use ying_core::YingResult;

    /// 记录所有分发的桩提取器
    #[derive(Default)]
    struct RecordingExtractor {
        calls: Vec<(StartCode, Vec<u8>)>,
    }

    impl HeaderExtractor for RecordingExtractor {
        fn extract(&mut self, code: StartCode, unescaped: &[u8]) -> YingResult<()> {
            self.calls.push((code, unescaped.to_vec()));
            Ok(())
        }
    }

    fn recording_parser() -> Vc1Parser<RecordingExtractor> {
        Vc1Parser::with_extractor(RecordingExtractor::default())
    }

    fn marker(id: u8) -> [u8; 4] {
        [0x00, 0x00, 0x01, id]
    }

    #[test]
    fn test_single_chunk_frame_boundary() {
        // 帧标记 + 10 字节 + 帧标记 + 10 字节 → 边界在第二个标记前
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0x11; 10]);
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0x22; 10]);

        let mut parser = recording_parser();
        let next = parser.push(&data, false);
        assert_eq!(next, Some(14), "边界应在第二个起始码之前 4 字节处");
        assert!(parser.is_frame_open(), "新帧应处于打开状态");

        // 第一段的头部字节在第二个标记处分发 (含标记尾部字节)
        let calls = &parser.extractor().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, StartCode::Frame);
        let mut expected = vec![0x11; 10];
        expected.extend_from_slice(&marker(0x0D));
        assert_eq!(calls[0].1, expected);
    }

    #[test]
    fn test_field_and_slice_extend_frame() {
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0x11; 6]);
        data.extend_from_slice(&marker(0x0C)); // 场
        data.extend_from_slice(&[0x22; 6]);
        data.extend_from_slice(&marker(0x0B)); // 切片
        data.extend_from_slice(&[0x33; 6]);
        data.extend_from_slice(&marker(0x0D)); // 下一帧

        let mut parser = recording_parser();
        let next = parser.push(&data, false);
        assert_eq!(
            next,
            Some((data.len() - 4) as isize),
            "场/切片段不应结束当前帧"
        );
        assert!(parser.is_frame_open());
    }

    #[test]
    fn test_sequence_header_closes_frame() {
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0x11; 8]);
        data.extend_from_slice(&marker(0x0F)); // 序列头部属于下一个单元

        let mut parser = recording_parser();
        let next = parser.push(&data, false);
        assert_eq!(next, Some(12));
        assert!(!parser.is_frame_open(), "序列头部不是帧, 打开标志应清除");
    }

    #[test]
    fn test_extra_leading_zeros_before_marker() {
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0x11; 5]);
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x01, 0x0D]); // 多余前导零
        data.extend_from_slice(&[0x22; 4]);

        let mut parser = recording_parser();
        let next = parser.push(&data, false);
        assert_eq!(next, Some(11), "多余前导零不应破坏探测, 边界仍在 ID 前 4 字节");
    }

    #[test]
    fn test_emulation_prevention_unescaped_inside_window() {
        // 窗口内的 00 00 03 01 → 00 00 01, 且内嵌的 01 不触发起始码
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0F));
        data.extend_from_slice(&[0xAA, 0x00, 0x00, 0x03, 0x01, 0xBB]);
        data.extend_from_slice(&marker(0x0D));

        let mut parser = recording_parser();
        let next = parser.push(&data, false);
        assert_eq!(next, None, "首个帧标记只是打开新帧, 不产生边界");
        assert!(parser.is_frame_open());

        let calls = &parser.extractor().calls;
        assert_eq!(calls.len(), 1, "只应有序列头部段被分发");
        assert_eq!(calls[0].0, StartCode::SequenceHeader);
        let mut expected = vec![0xAA, 0x00, 0x00, 0x01, 0xBB];
        expected.extend_from_slice(&marker(0x0D));
        assert_eq!(calls[0].1, expected, "防竞争字节应被吞掉且 01 保留为数据");
    }

    #[test]
    fn test_unescape_identity_without_escape_triple() {
        let payload = [0x01, 0x02, 0x00, 0x03, 0x00, 0x00, 0x02, 0x7F];
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0F));
        data.extend_from_slice(&payload);
        data.extend_from_slice(&marker(0x0D));

        let mut parser = recording_parser();
        parser.push(&data, false);
        let calls = &parser.extractor().calls;
        let mut expected = payload.to_vec();
        expected.extend_from_slice(&marker(0x0D));
        assert_eq!(calls[0].1, expected, "无防竞争序列的数据应原样保留");
    }

    #[test]
    fn test_dispatch_bounded_by_threshold() {
        // 远超阈值的长段: 只有前 THRESHOLD 个字节被物化
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0F));
        data.extend_from_slice(&[0x55; 400]);
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0x66; 8]);

        let mut parser = recording_parser();
        parser.push(&data, false);
        let calls = &parser.extractor().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1.len(),
            UNESCAPED_THRESHOLD,
            "分发不应超过捕获阈值"
        );
        assert_eq!(calls[0].1, vec![0x55; UNESCAPED_THRESHOLD]);
    }

    #[test]
    fn test_escape_beyond_threshold_only_resets_state() {
        // 阈值之后的 00 00 03 01 不做内容编辑, 也不触发起始码
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0F));
        data.extend_from_slice(&[0x55; 60]);
        data.extend_from_slice(&[0x00, 0x00, 0x03, 0x01]);
        data.extend_from_slice(&[0x55; 20]);

        let mut parser = recording_parser();
        let next = parser.push(&data, false);
        assert_eq!(next, None);
        assert!(
            parser.extractor().calls.is_empty(),
            "段仍处于打开状态, 不应有分发"
        );
        // 真正的起始码仍能在其后被发现
        let next = parser.push(&marker(0x0D), false);
        assert_eq!(next, None, "首个帧标记只打开新帧");
        assert_eq!(parser.extractor().calls.len(), 1);
        assert_eq!(
            parser.extractor().calls[0].1.len(),
            UNESCAPED_THRESHOLD,
            "快速扫描阶段不应再追加捕获字节"
        );
    }

    #[test]
    fn test_marker_straddles_chunk_boundary() {
        let mut chunk1 = Vec::new();
        chunk1.extend_from_slice(&marker(0x0D));
        chunk1.extend_from_slice(&[0x11; 10]);
        chunk1.extend_from_slice(&[0x00, 0x00]); // 下一个标记的前半
        let chunk2 = [0x01, 0x0D, 0x77, 0x88];

        let mut parser = recording_parser();
        assert_eq!(parser.push(&chunk1, false), None);
        let next = parser.push(&chunk2, false);
        assert_eq!(next, Some(-2), "横跨的起始码应产生负的回退边界");

        // 重组器把同一 chunk 重新递入: 已消费的标记字节被跳过, 不再重复分发
        let dispatched = parser.extractor().calls.len();
        assert_eq!(parser.push(&chunk2, false), None);
        assert_eq!(
            parser.extractor().calls.len(),
            dispatched,
            "重递的标记字节不应被再次探测或分发"
        );
        assert!(parser.is_frame_open());
    }

    #[test]
    fn test_skip_consumed_across_tiny_chunks() {
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0x11; 10]);
        data.extend_from_slice(&marker(0x0D));

        let mut parser = recording_parser();
        let next = parser.push(&data, false);
        assert_eq!(next, Some(14));

        // 以 1 字节为单位重递标记: 跳过量应跨调用递减
        for &b in &marker(0x0D) {
            assert_eq!(parser.push(&[b], false), None);
        }
        assert_eq!(
            parser.extractor().calls.len(),
            1,
            "重递的标记不应产生新的分发"
        );
        // 随后的载荷字节正常进入捕获
        parser.push(&[0xAB, 0xCD], false);
        parser.push(&marker(0x0F), false);
        let calls = &parser.extractor().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1[..2], [0xAB, 0xCD]);
    }

    #[test]
    fn test_eof_flush_zero_padded() {
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0xA1, 0xA2, 0xA3, 0xA4, 0xA5]);

        let mut parser = recording_parser();
        assert_eq!(parser.push(&data, false), None);
        let next = parser.push(&[], false);
        assert_eq!(next, Some(0), "EOF 应视为帧结束");
        assert!(!parser.is_frame_open());

        let calls = &parser.extractor().calls;
        assert_eq!(calls.len(), 1);
        let mut expected = vec![0xA1, 0xA2, 0xA3, 0xA4, 0xA5];
        expected.resize(UNESCAPED_THRESHOLD, 0x00);
        assert_eq!(calls[0].1, expected, "冲刷应零填充到捕获阈值");
    }

    #[test]
    fn test_eof_without_open_frame_is_silent() {
        let mut parser = recording_parser();
        assert_eq!(parser.push(&[], false), None);
        assert!(parser.extractor().calls.is_empty());
    }

    #[test]
    fn test_complete_frame_mode_short_circuit() {
        // 标记 + 阈值字节 + 任意垃圾 (含假标记与防竞争序列)
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0D));
        let header: Vec<u8> = (0u8..UNESCAPED_THRESHOLD as u8).map(|v| v | 0x80).collect();
        data.extend_from_slice(&header);
        data.extend_from_slice(&marker(0x0F));
        data.extend_from_slice(&[0x00, 0x00, 0x03, 0x01]);
        data.extend_from_slice(&[0xEE; 50]);

        let mut parser = recording_parser();
        let next = parser.push(&data, true);
        assert_eq!(next, Some(data.len() as isize), "完整帧模式总是返回整个输入长度");

        let calls = &parser.extractor().calls;
        assert_eq!(calls.len(), 1, "捕获完成后不应再扫描垃圾内容");
        assert_eq!(calls[0].0, StartCode::Frame);
        assert_eq!(calls[0].1, header, "头部字节之外的内容不应影响分发");
    }

    #[test]
    fn test_complete_frame_mode_short_frame_flushed() {
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0xC1, 0xC2, 0xC3]);

        let mut parser = recording_parser();
        let next = parser.push(&data, true);
        assert_eq!(next, Some(data.len() as isize));

        let calls = &parser.extractor().calls;
        assert_eq!(calls.len(), 1);
        let mut expected = vec![0xC1, 0xC2, 0xC3];
        expected.resize(UNESCAPED_THRESHOLD, 0x00);
        assert_eq!(calls[0].1, expected, "短帧应零填充分发");
    }

    #[test]
    fn test_complete_frame_mode_state_reset_between_calls() {
        let mut frame1 = Vec::new();
        frame1.extend_from_slice(&marker(0x0D));
        frame1.extend_from_slice(&[0xD1; 40]);
        let mut frame2 = Vec::new();
        frame2.extend_from_slice(&marker(0x0D));
        frame2.extend_from_slice(&[0xD2; 40]);

        let mut parser = recording_parser();
        parser.push(&frame1, true);
        parser.push(&frame2, true);

        let calls = &parser.extractor().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, vec![0xD1; UNESCAPED_THRESHOLD]);
        assert_eq!(calls[1].1, vec![0xD2; UNESCAPED_THRESHOLD], "第二帧应独立捕获");
    }

    #[test]
    fn test_scalar_search_behaves_identically() {
        let mut data = Vec::new();
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0x31; 80]);
        data.extend_from_slice(&marker(0x0D));
        data.extend_from_slice(&[0x32; 5]);

        let mut fast = recording_parser();
        let mut scalar = recording_parser();
        scalar.set_candidate_search(Box::new(ScalarSearch));

        assert_eq!(fast.push(&data, false), scalar.push(&data, false));
        assert_eq!(fast.extractor().calls, scalar.extractor().calls);
    }
}
