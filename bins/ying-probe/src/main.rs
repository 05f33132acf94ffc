//! ying-probe - VC-1 基本流探测工具
//!
//! 读取原始 Advanced Profile 基本流 (.vc1), 以流式方式驱动解析器,
//! 输出逐帧信息与流级属性. 用于快速检查码流结构与时序字段.

use clap::Parser;
use log::debug;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::process;

use ying_codec::parsers::vc1::{ParsedFrame, Vc1FrameReader};

/// Ying VC-1 基本流探测工具
#[derive(Parser, Debug)]
#[command(name = "ying-probe", version, about = "纯 Rust VC-1 基本流探测工具")]
struct Cli {
    /// 输入文件路径 (原始 VC-1 Advanced Profile 基本流)
    input: String,

    /// 读取块大小 (字节), 用于模拟任意切块的流式输入
    #[arg(long, default_value_t = 4096)]
    chunk_size: usize,

    /// 显示逐帧信息
    #[arg(long, default_value_t = true)]
    show_frames: bool,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 静默模式 (只输出探测结果)
    #[arg(short, long)]
    quiet: bool,
}

// ============================================================
// JSON 输出结构体
// ============================================================

/// 完整探测结果
#[derive(Serialize)]
struct ProbeOutput {
    stream: StreamInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    frames: Option<Vec<FrameRecord>>,
}

/// 流级信息
#[derive(Serialize)]
struct StreamInfo {
    filename: String,
    nb_frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<u8>,
    interlace: bool,
}

/// 逐帧信息
#[derive(Serialize)]
struct FrameRecord {
    index: usize,
    offset: usize,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    picture_type: Option<String>,
    keyframe: bool,
    repeat_frame: u8,
    top_field_first: bool,
    repeat_first_field: bool,
}

impl FrameRecord {
    fn from_parsed(index: usize, frame: &ParsedFrame) -> Self {
        let info = frame.info.as_ref();
        Self {
            index,
            offset: frame.offset,
            size: frame.data.len(),
            picture_type: info.map(|i| i.picture_type.to_string()),
            keyframe: info.map(|i| i.keyframe).unwrap_or(false),
            repeat_frame: info.map(|i| i.repeat_frame).unwrap_or(0),
            top_field_first: info.map(|i| i.top_field_first).unwrap_or(false),
            repeat_first_field: info.map(|i| i.repeat_first_field).unwrap_or(false),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("ying-probe: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> std::io::Result<()> {
    if cli.chunk_size == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "chunk-size 不能为 0",
        ));
    }

    let mut file = File::open(&cli.input)?;
    let mut reader = Vc1FrameReader::new();
    let mut frames = Vec::new();
    let mut buf = vec![0u8; cli.chunk_size];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        let emitted = reader.push_chunk(&buf[..n]);
        if !emitted.is_empty() {
            debug!("本块 {} 字节, 产出 {} 帧", n, emitted.len());
        }
        frames.extend(emitted);
    }
    frames.extend(reader.finish());

    let headers = reader.headers();
    let coded_size = headers.coded_size();
    let stream = StreamInfo {
        filename: cli.input.clone(),
        nb_frames: frames.len(),
        width: coded_size.map(|(w, _)| w),
        height: coded_size.map(|(_, h)| h),
        frame_rate: headers.frame_rate().map(|r| r.to_f64()),
        level: headers.sequence.as_ref().map(|s| s.level),
        interlace: headers
            .sequence
            .as_ref()
            .map(|s| s.interlace)
            .unwrap_or(false),
    };

    if cli.json {
        let output = ProbeOutput {
            stream,
            frames: cli.show_frames.then(|| {
                frames
                    .iter()
                    .enumerate()
                    .map(|(i, f)| FrameRecord::from_parsed(i, f))
                    .collect()
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_text(&stream, &frames, cli.show_frames);
    Ok(())
}

fn print_text(stream: &StreamInfo, frames: &[ParsedFrame], show_frames: bool) {
    println!("输入: {}", stream.filename);
    match (stream.width, stream.height) {
        (Some(w), Some(h)) => println!("尺寸: {}x{}", w, h),
        _ => println!("尺寸: 未知 (未发现序列头部)"),
    }
    if let Some(fps) = stream.frame_rate {
        println!("帧率: {:.3} fps", fps);
    }
    if let Some(level) = stream.level {
        println!("级别: {}", level);
    }
    println!("隔行: {}", if stream.interlace { "是" } else { "否" });
    println!("帧数: {}", stream.nb_frames);

    if !show_frames {
        return;
    }
    for (i, frame) in frames.iter().enumerate() {
        let record = FrameRecord::from_parsed(i, frame);
        println!(
            "帧 {:>5}  offset={:<10} size={:<8} type={:<7} key={} rptfrm={} tff={} rff={}",
            record.index,
            record.offset,
            record.size,
            record.picture_type.as_deref().unwrap_or("?"),
            u8::from(record.keyframe),
            record.repeat_frame,
            u8::from(record.top_field_first),
            u8::from(record.repeat_first_field),
        );
    }
}
