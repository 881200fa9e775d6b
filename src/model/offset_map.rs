//! 字节偏移 → 字符偏移映射表
//!
//! 解析器在 UTF-8 字节上工作，编辑器按字符寻址。表中每个字节一项，
//! `T[i]` 为拥有第 i 个字节的字符的下标；续字节（`10xxxxxx`）与其首字节同值。

use serde::Deserialize;

use crate::model::node::Span;

/// 编辑器的字符单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextUnit {
    /// Unicode 标量值（Rust `char`）
    #[default]
    Scalar,
    /// UTF-16 码元（辅助平面字符占 2）
    Utf16,
}

impl TextUnit {
    /// 以首字节开头的字符在该单位下的宽度
    fn width_of_lead(self, lead: u8) -> usize {
        match self {
            TextUnit::Scalar => 1,
            TextUnit::Utf16 if lead >= 0xF0 => 2,
            TextUnit::Utf16 => 1,
        }
    }
}

/// 解析器报告区间的约定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanConvention {
    /// `start` 是节点拥有的第一个字节，`end` 是最后一个字节之后的位置
    #[default]
    HalfOpen,
    /// `end` 是节点拥有的最后一个字节
    Inclusive,
}

/// 编辑器中的半开字符区间 `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRange {
    pub from: usize,
    pub to: usize,
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0b1100_0000 == 0b1000_0000
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetTable {
    map: Vec<usize>,
    char_len: usize,
    unit: TextUnit,
}

impl OffsetTable {
    pub fn build(text: &str) -> Self {
        Self::build_with(text, TextUnit::Scalar)
    }

    pub fn build_with(text: &str, unit: TextUnit) -> Self {
        let bytes = text.as_bytes();
        let mut map = Vec::with_capacity(bytes.len());

        // 计数器在下一个首字节处才前进上一个字符的宽度
        let mut counter = 0usize;
        let mut pending = 0usize;
        for &b in bytes {
            if !is_continuation(b) {
                counter += pending;
                pending = unit.width_of_lead(b);
            }
            map.push(counter);
        }

        Self {
            map,
            char_len: counter + pending,
            unit,
        }
    }

    /// 源码的 UTF-8 字节数（即表长）
    pub fn byte_len(&self) -> usize {
        self.map.len()
    }

    /// 源码在编辑器单位下的长度
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn unit(&self) -> TextUnit {
        self.unit
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }

    /// 精确查表，越界返回 None
    pub fn char_offset(&self, byte: usize) -> Option<usize> {
        self.map.get(byte).copied()
    }

    /// 查表，字节偏移夹到 `[0, len-1]`；空表返回 0
    pub fn translate(&self, byte: usize) -> usize {
        match self.map.len() {
            0 => 0,
            len => self.map[byte.min(len - 1)],
        }
    }

    /// 按约定把字节区间转成字符区间；终点越界时夹到源码长度
    pub fn translate_span(&self, span: Span, convention: SpanConvention) -> CharRange {
        let from = self.translate(span.start);
        let end_byte = match convention {
            SpanConvention::HalfOpen => span.end,
            SpanConvention::Inclusive => span.end.saturating_add(1),
        };
        let to = self.char_offset(end_byte).unwrap_or(self.char_len);
        CharRange {
            from,
            to: to.max(from),
        }
    }
}
