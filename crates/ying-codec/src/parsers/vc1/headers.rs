//! VC-1 头部语义解码.
//!
//! 对去除防竞争字节后的头部前缀做字段级解码, 覆盖三类头部:
//! - 序列头部 (sequence header): 规格、尺寸、隔行/下拉等全局属性
//! - 入口点头部 (entry point): 随机访问点处的编码工具开关
//! - 帧头部 (frame header): 图像类型、场序、重复帧计数等逐帧属性
//!
//! 解码范围止于时序相关字段, 不涉及宏块层. 输入窗口最多只有
//! [`UNESCAPED_THRESHOLD`](super::parser::UNESCAPED_THRESHOLD) 字节,
//! 所有关心的字段都落在窗口之内; 窗口之外的可选尾部 (HRD 参数等)
//! 截断时按已解码字段生效处理.

use log::{debug, warn};
use ying_core::bitreader::BitReader;
use ying_core::{Rational, YingError, YingResult};

use super::StartCode;

/// Advanced Profile 的 PROFILE 字段取值
const PROFILE_ADVANCED: u32 = 3;

/// 预定义像素宽高比表 (SMPTE 421M 表 41, 索引 15 为显式宽高比)
const ASPECT_RATIO_TABLE: [(i32, i32); 14] = [
    (0, 1),
    (1, 1),
    (12, 11),
    (10, 11),
    (16, 11),
    (40, 33),
    (24, 11),
    (20, 11),
    (32, 11),
    (80, 33),
    (18, 11),
    (15, 11),
    (64, 33),
    (160, 99),
];

/// 帧率分子表 (FRAMERATENR, 单位 1000/s)
const FRAME_RATE_NR: [i32; 7] = [24, 25, 30, 50, 60, 48, 72];

/// 帧率分母表 (FRAMERATEDR)
const FRAME_RATE_DR: [i32; 2] = [1000, 1001];

/// 图像类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureType {
    /// 帧内编码图像
    I,
    /// 前向预测图像
    P,
    /// 双向预测图像
    B,
    /// 帧内编码的 B 图像
    Bi,
    /// 被跳过的 P 图像 (复制参考帧)
    Skipped,
}

impl std::fmt::Display for PictureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::I => write!(f, "I"),
            Self::P => write!(f, "P"),
            Self::B => write!(f, "B"),
            Self::Bi => write!(f, "BI"),
            Self::Skipped => write!(f, "Skipped"),
        }
    }
}

/// 帧编码模式 (FCM)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCoding {
    /// 逐行
    Progressive,
    /// 帧隔行
    FrameInterlace,
    /// 场隔行 (两场分别编码)
    FieldInterlace,
}

/// 场对图像类型表 (FPTYPE): 场隔行模式下两场各自的图像类型
const FIELD_PAIR_TABLE: [(PictureType, PictureType); 8] = [
    (PictureType::I, PictureType::I),
    (PictureType::I, PictureType::P),
    (PictureType::P, PictureType::I),
    (PictureType::P, PictureType::P),
    (PictureType::B, PictureType::B),
    (PictureType::B, PictureType::Bi),
    (PictureType::Bi, PictureType::B),
    (PictureType::Bi, PictureType::Bi),
];

/// 序列头部解码结果 (Advanced Profile)
#[derive(Debug, Clone)]
pub struct SequenceHeader {
    /// LEVEL 字段 (0-4 有定义)
    pub level: u8,
    /// 色度格式 (仅 1 = 4:2:0 有定义)
    pub chroma_format: u8,
    /// 是否存在后处理指示
    pub postproc_flag: bool,
    /// 最大编码宽度 (像素)
    pub coded_width: u32,
    /// 最大编码高度 (像素)
    pub coded_height: u32,
    /// PULLDOWN: 帧头部是否携带重复帧/场计数
    pub pulldown: bool,
    /// INTERLACE: 序列是否允许隔行编码
    pub interlace: bool,
    /// TFCNTRFLAG: 帧头部是否携带场计数器
    pub tfcntr_flag: bool,
    /// FINTERPFLAG: 帧头部是否携带插帧提示
    pub finterp_flag: bool,
    /// PSF: progressive segmented frame
    pub psf: bool,
    /// 显示尺寸 (来自 display extension)
    pub display_size: Option<(u32, u32)>,
    /// 像素宽高比 (未指定时为 UNDEFINED)
    pub sar: Rational,
    /// 帧率 (来自 display extension)
    pub frame_rate: Option<Rational>,
    /// HRD leaky bucket 数量 (入口点头部需要按此数量跳字段)
    pub hrd_num_leaky_buckets: u8,
}

/// 入口点头部解码结果
#[derive(Debug, Clone)]
pub struct EntryPoint {
    /// BROKEN_LINK: 此入口点之前的 B 帧不可解码
    pub broken_link: bool,
    /// CLOSED_ENTRY: 此入口点之后不引用之前的参考帧
    pub closed_entry: bool,
    /// PANSCAN_FLAG
    pub panscan_flag: bool,
    /// REFDIST_FLAG
    pub refdist_flag: bool,
    /// LOOPFILTER
    pub loopfilter: bool,
    /// FASTUVMC
    pub fastuvmc: bool,
    /// EXTENDED_MV
    pub extended_mv: bool,
    /// DQUANT (2 位)
    pub dquant: u8,
    /// VSTRANSFORM
    pub vstransform: bool,
    /// OVERLAP
    pub overlap: bool,
    /// QUANTIZER (2 位)
    pub quantizer: u8,
    /// 编码尺寸覆盖 (存在时取代序列头部的尺寸)
    pub coded_size: Option<(u32, u32)>,
    /// EXTENDED_DMV (仅当 EXTENDED_MV 置位)
    pub extended_dmv: bool,
    /// 亮度 range mapping
    pub range_map_y: Option<u8>,
    /// 色度 range mapping
    pub range_map_uv: Option<u8>,
}

/// 帧头部解码结果 (解析器关心的逐帧属性)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    /// 帧编码模式
    pub coding: FrameCoding,
    /// 图像类型 (场隔行时为首场类型)
    pub picture_type: PictureType,
    /// 场隔行时两场各自的图像类型
    pub field_types: Option<(PictureType, PictureType)>,
    /// RPTFRM: 重复帧计数 (逐行/PSF 下拉)
    pub repeat_frame: u8,
    /// TFF: 顶场在前 (隔行下拉)
    pub top_field_first: bool,
    /// RFF: 重复首场 (隔行下拉)
    pub repeat_first_field: bool,
    /// 是否为关键帧 (I 或首场为 I 的场对)
    pub keyframe: bool,
}

/// 头部提取协作者
///
/// 解析器在每个段关闭时, 把该段去除防竞争字节后的头部前缀交给提取器.
/// 失败时实现必须保持既有解码状态不变; 解析器只记录失败并继续扫描.
pub trait HeaderExtractor {
    /// 解码一个段的头部字节, 更新内部编解码状态
    fn extract(&mut self, code: StartCode, unescaped: &[u8]) -> YingResult<()>;
}

/// VC-1 头部解码状态
///
/// 跨段累积: 序列头部为后续入口点/帧头部提供解码上下文,
/// 解码失败的段不影响已就绪的字段.
#[derive(Debug, Default)]
pub struct Vc1Headers {
    /// 最近一次成功解码的序列头部
    pub sequence: Option<SequenceHeader>,
    /// 最近一次成功解码的入口点头部
    pub entry_point: Option<EntryPoint>,
    /// 最近一次成功解码的帧头部
    pub frame: Option<FrameInfo>,
}

impl Vc1Headers {
    /// 创建空的头部状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前编码尺寸 (入口点头部的覆盖优先于序列头部)
    pub fn coded_size(&self) -> Option<(u32, u32)> {
        if let Some(ep) = &self.entry_point {
            if let Some(size) = ep.coded_size {
                return Some(size);
            }
        }
        self.sequence
            .as_ref()
            .map(|seq| (seq.coded_width, seq.coded_height))
    }

    /// 当前帧率
    pub fn frame_rate(&self) -> Option<Rational> {
        self.sequence.as_ref().and_then(|seq| seq.frame_rate)
    }

    /// 最近关闭的帧的头部信息
    pub fn frame_info(&self) -> Option<&FrameInfo> {
        self.frame.as_ref()
    }
}

impl HeaderExtractor for Vc1Headers {
    fn extract(&mut self, code: StartCode, unescaped: &[u8]) -> YingResult<()> {
        match code {
            StartCode::SequenceHeader => {
                self.sequence = Some(decode_sequence_header(unescaped)?);
            }
            StartCode::EntryPoint => {
                let Some(seq) = self.sequence.as_ref() else {
                    return Err(YingError::InvalidData(
                        "VC-1: 入口点头部先于序列头部出现".into(),
                    ));
                };
                self.entry_point = Some(decode_entry_point(unescaped, seq)?);
            }
            StartCode::Frame => {
                let Some(seq) = self.sequence.as_ref() else {
                    return Err(YingError::InvalidData(
                        "VC-1: 帧头部先于序列头部出现".into(),
                    ));
                };
                self.frame = Some(decode_frame_header(unescaped, seq)?);
            }
            // 场与切片段只参与边界判定, 场自身的图像类型来自帧头部的 FPTYPE
            _ => {}
        }
        Ok(())
    }
}

/// 解码 Advanced Profile 序列头部
pub fn decode_sequence_header(data: &[u8]) -> YingResult<SequenceHeader> {
    let mut br = BitReader::new(data);

    let profile = br.read_bits(2)?;
    if profile != PROFILE_ADVANCED {
        return Err(YingError::Unsupported(format!(
            "VC-1: 仅支持 Advanced Profile 基本流, profile={}",
            profile
        )));
    }
    let level = br.read_bits(3)? as u8;
    if level > 4 {
        warn!("VC-1: 保留的 LEVEL 取值, level={}", level);
    }
    let chroma_format = br.read_bits(2)? as u8;
    if chroma_format != 1 {
        warn!("VC-1: 未定义的色度格式, chromaformat={}", chroma_format);
    }
    // 后处理质量指示, 字段取值与解析无关
    br.skip_bits(3)?; // frmrtq_postproc
    br.skip_bits(5)?; // bitrtq_postproc
    let postproc_flag = br.read_bit_flag()?;
    let coded_width = (br.read_bits(12)? + 1) * 2;
    let coded_height = (br.read_bits(12)? + 1) * 2;
    let pulldown = br.read_bit_flag()?;
    let interlace = br.read_bit_flag()?;
    let tfcntr_flag = br.read_bit_flag()?;
    let finterp_flag = br.read_bit_flag()?;
    br.skip_bits(1)?; // reserved
    let psf = br.read_bit_flag()?;

    let mut seq = SequenceHeader {
        level,
        chroma_format,
        postproc_flag,
        coded_width,
        coded_height,
        pulldown,
        interlace,
        tfcntr_flag,
        finterp_flag,
        psf,
        display_size: None,
        sar: Rational::UNDEFINED,
        frame_rate: None,
        hrd_num_leaky_buckets: 0,
    };

    // 可选尾部超出捕获窗口时, 已解码的字段照常生效
    match decode_sequence_tail(&mut br, &mut seq) {
        Ok(()) => {}
        Err(YingError::Eof) => {
            debug!("VC-1: 序列头部可选尾部超出捕获窗口, 按截断处理");
        }
        Err(err) => return Err(err),
    }
    Ok(seq)
}

/// 序列头部的可选尾部: display extension 与 HRD 参数
fn decode_sequence_tail(br: &mut BitReader<'_>, seq: &mut SequenceHeader) -> YingResult<()> {
    if br.read_bit_flag()? {
        let width = br.read_bits(14)? + 1;
        let height = br.read_bits(14)? + 1;
        seq.display_size = Some((width, height));

        if br.read_bit_flag()? {
            let index = br.read_bits(4)? as usize;
            seq.sar = if index == 15 {
                let num = br.read_bits(8)? as i32;
                let den = br.read_bits(8)? as i32;
                Rational::new(num, den)
            } else if index < ASPECT_RATIO_TABLE.len() {
                let (num, den) = ASPECT_RATIO_TABLE[index];
                Rational::new(num, den)
            } else {
                warn!("VC-1: 保留的宽高比索引, aspect_ratio={}", index);
                Rational::UNDEFINED
            };
        }

        if br.read_bit_flag()? {
            if br.read_bit_flag()? {
                // 指数形式: fps = (FRAMERATEEXP + 1) / 32
                let exp = br.read_bits(16)? as i32;
                seq.frame_rate = Some(Rational::new(exp + 1, 32).reduce());
            } else {
                let nr = br.read_bits(8)? as usize;
                let dr = br.read_bits(4)? as usize;
                if (1..=FRAME_RATE_NR.len()).contains(&nr)
                    && (1..=FRAME_RATE_DR.len()).contains(&dr)
                {
                    seq.frame_rate = Some(
                        Rational::new(FRAME_RATE_NR[nr - 1] * 1000, FRAME_RATE_DR[dr - 1])
                            .reduce(),
                    );
                } else {
                    warn!("VC-1: 无效的帧率索引, nr={}, dr={}", nr, dr);
                }
            }
        }

        if br.read_bit_flag()? {
            br.skip_bits(8)?; // color_prim
            br.skip_bits(8)?; // transfer_char
            br.skip_bits(8)?; // matrix_coef
        }
    }

    if br.read_bit_flag()? {
        seq.hrd_num_leaky_buckets = br.read_bits(5)? as u8;
        br.skip_bits(4)?; // bit_rate_exponent
        br.skip_bits(4)?; // buffer_size_exponent
        for _ in 0..seq.hrd_num_leaky_buckets {
            br.skip_bits(16)?; // hrd_rate
            br.skip_bits(16)?; // hrd_buffer
        }
    }
    Ok(())
}

/// 解码入口点头部
///
/// 需要序列头部提供 HRD leaky bucket 数量, 否则后续字段无法对齐.
pub fn decode_entry_point(data: &[u8], sequence: &SequenceHeader) -> YingResult<EntryPoint> {
    let mut br = BitReader::new(data);

    let broken_link = br.read_bit_flag()?;
    let closed_entry = br.read_bit_flag()?;
    let panscan_flag = br.read_bit_flag()?;
    let refdist_flag = br.read_bit_flag()?;
    let loopfilter = br.read_bit_flag()?;
    let fastuvmc = br.read_bit_flag()?;
    let extended_mv = br.read_bit_flag()?;
    let dquant = br.read_bits(2)? as u8;
    let vstransform = br.read_bit_flag()?;
    let overlap = br.read_bit_flag()?;
    let quantizer = br.read_bits(2)? as u8;

    let mut ep = EntryPoint {
        broken_link,
        closed_entry,
        panscan_flag,
        refdist_flag,
        loopfilter,
        fastuvmc,
        extended_mv,
        dquant,
        vstransform,
        overlap,
        quantizer,
        coded_size: None,
        extended_dmv: false,
        range_map_y: None,
        range_map_uv: None,
    };

    match decode_entry_point_tail(&mut br, sequence, &mut ep) {
        Ok(()) => {}
        Err(YingError::Eof) => {
            debug!("VC-1: 入口点头部可选尾部超出捕获窗口, 按截断处理");
        }
        Err(err) => return Err(err),
    }
    Ok(ep)
}

/// 入口点头部的可选尾部
fn decode_entry_point_tail(
    br: &mut BitReader<'_>,
    sequence: &SequenceHeader,
    ep: &mut EntryPoint,
) -> YingResult<()> {
    for _ in 0..sequence.hrd_num_leaky_buckets {
        br.skip_bits(8)?; // hrd_full
    }
    if br.read_bit_flag()? {
        let width = (br.read_bits(12)? + 1) * 2;
        let height = (br.read_bits(12)? + 1) * 2;
        ep.coded_size = Some((width, height));
    }
    if ep.extended_mv {
        ep.extended_dmv = br.read_bit_flag()?;
    }
    if br.read_bit_flag()? {
        ep.range_map_y = Some(br.read_bits(3)? as u8);
    }
    if br.read_bit_flag()? {
        ep.range_map_uv = Some(br.read_bits(3)? as u8);
    }
    Ok(())
}

/// 解码帧头部 (解析所需的前缀字段)
pub fn decode_frame_header(data: &[u8], sequence: &SequenceHeader) -> YingResult<FrameInfo> {
    let mut br = BitReader::new(data);

    let coding = if sequence.interlace {
        // FCM: 0 → 逐行, 10 → 帧隔行, 11 → 场隔行
        if !br.read_bit_flag()? {
            FrameCoding::Progressive
        } else if !br.read_bit_flag()? {
            FrameCoding::FrameInterlace
        } else {
            FrameCoding::FieldInterlace
        }
    } else {
        FrameCoding::Progressive
    };

    let (picture_type, field_types) = if coding == FrameCoding::FieldInterlace {
        let fptype = br.read_bits(3)? as usize;
        let pair = FIELD_PAIR_TABLE[fptype];
        (pair.0, Some(pair))
    } else {
        // PTYPE: 一元编码, 0 → P, 10 → B, 110 → I, 1110 → BI, 1111 → 跳帧
        let ptype = match br.read_unary(4)? {
            0 => PictureType::P,
            1 => PictureType::B,
            2 => PictureType::I,
            3 => PictureType::Bi,
            _ => PictureType::Skipped,
        };
        (ptype, None)
    };

    if sequence.tfcntr_flag {
        br.skip_bits(8)?; // tfcntr
    }

    let mut repeat_frame = 0u8;
    let mut top_field_first = false;
    let mut repeat_first_field = false;
    if sequence.pulldown {
        if !sequence.interlace || sequence.psf {
            repeat_frame = br.read_bits(2)? as u8;
        } else {
            top_field_first = br.read_bit_flag()?;
            repeat_first_field = br.read_bit_flag()?;
        }
    }

    Ok(FrameInfo {
        coding,
        picture_type,
        field_types,
        repeat_frame,
        top_field_first,
        repeat_first_field,
        keyframe: picture_type == PictureType::I,
    })
}
