//! 比特流读取器.
//!
//! 提供从字节缓冲区中按位读取数据的能力, 是头部字段解码的基础设施.
//!
//! 按大端位序读取 (MSB first), 这是视频编解码器中最常用的位序.
//! 越界读取返回 [`YingError::Eof`], 而不是未定义内容, 因此解码逻辑
//! 可以放心地对截断的输入做推测性读取.

use crate::{YingError, YingResult};

/// 比特流读取器
///
/// 从字节缓冲区中按位读取数据, 使用大端位序 (MSB first).
///
/// # 示例
/// ```
/// use ying_core::bitreader::BitReader;
///
/// let data = [0b1011_0001, 0b0101_0101];
/// let mut br = BitReader::new(&data);
/// assert_eq!(br.read_bits(4).unwrap(), 0b1011);
/// assert_eq!(br.read_bits(4).unwrap(), 0b0001);
/// assert_eq!(br.read_bits(8).unwrap(), 0b0101_0101);
/// ```
pub struct BitReader<'a> {
    /// 源数据
    data: &'a [u8],
    /// 当前字节索引
    byte_pos: usize,
    /// 当前字节中的位位置 (0-7, 0 表示最高位)
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    /// 创建新的比特流读取器
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// 获取已读取的总位数
    pub fn bits_read(&self) -> usize {
        self.byte_pos * 8 + self.bit_pos as usize
    }

    /// 获取剩余可读位数
    pub fn bits_left(&self) -> usize {
        if self.byte_pos >= self.data.len() {
            return 0;
        }
        (self.data.len() - self.byte_pos) * 8 - self.bit_pos as usize
    }

    /// 是否已到达末尾
    pub fn is_eof(&self) -> bool {
        self.bits_left() == 0
    }

    /// 读取 1 个位
    pub fn read_bit(&mut self) -> YingResult<u32> {
        if self.byte_pos >= self.data.len() {
            return Err(YingError::Eof);
        }

        let bit = (self.data[self.byte_pos] >> (7 - self.bit_pos)) & 1;
        self.bit_pos += 1;
        if self.bit_pos >= 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }

        Ok(u32::from(bit))
    }

    /// 读取 1 个位并转换为布尔标志
    pub fn read_bit_flag(&mut self) -> YingResult<bool> {
        Ok(self.read_bit()? != 0)
    }

    /// 读取 N 个位 (最多 32 位)
    ///
    /// 按大端位序读取, 返回值的低 N 位有效.
    pub fn read_bits(&mut self, n: u32) -> YingResult<u32> {
        if n == 0 {
            return Ok(0);
        }
        if n > 32 {
            return Err(YingError::InvalidArgument(format!(
                "read_bits: n={} 超过 32 位",
                n,
            )));
        }
        if (n as usize) > self.bits_left() {
            return Err(YingError::Eof);
        }

        let mut result: u32 = 0;
        let mut remaining = n;

        while remaining > 0 {
            let available = 8 - self.bit_pos as u32;
            let to_read = remaining.min(available);

            // 从当前字节中提取位
            let shift = available - to_read;
            let mask = ((1u32 << to_read) - 1) as u8;
            let bits = (self.data[self.byte_pos] >> shift) & mask;

            result = (result << to_read) | u32::from(bits);

            self.bit_pos += to_read as u8;
            if self.bit_pos >= 8 {
                self.bit_pos = 0;
                self.byte_pos += 1;
            }
            remaining -= to_read;
        }

        Ok(result)
    }

    /// 跳过 N 个位
    pub fn skip_bits(&mut self, n: u32) -> YingResult<()> {
        if (n as usize) > self.bits_left() {
            return Err(YingError::Eof);
        }
        let total = self.bits_read() + n as usize;
        self.byte_pos = total / 8;
        self.bit_pos = (total % 8) as u8;
        Ok(())
    }

    /// 读取一元编码值: 统计连续的 1 位个数, 直到读到 0 位或达到 `max`
    ///
    /// 返回统计到的 1 位个数 (0..=max). 读到终止 0 位时该位被消耗;
    /// 达到 `max` 时不再消耗额外位.
    pub fn read_unary(&mut self, max: u32) -> YingResult<u32> {
        let mut count = 0;
        while count < max {
            if self.read_bit()? == 0 {
                return Ok(count);
            }
            count += 1;
        }
        Ok(count)
    }
}
