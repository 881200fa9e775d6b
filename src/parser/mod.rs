//! 外部解析器模块的调用约定
//!
//! 解析器以线性内存 + 导出函数的形式提供：
//! `alloc(len) -> ptr`、`free(ptr, len)`、`parse_module(ptr, len) -> ptr`。
//! 请求与响应缓冲区都由调用方释放；响应以 NUL 结尾的 UTF-8 JSON 返回。

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseFailure {
    #[error("解析器内存分配失败（{len} 字节）")]
    AllocationFailed { len: usize },
    #[error("解析器没有返回结果")]
    NoResult,
    #[error("解析结果不是合法的 UTF-8")]
    InvalidUtf8,
    #[error("解析结果不是合法的 JSON: {0}")]
    MalformedJson(String),
    #[error("语法错误 {line}:{column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
}

/// 解析器模块导出的原始接口；指针为线性内存中的偏移，0 表示失败
pub trait ParserModule {
    fn alloc(&mut self, len: usize) -> usize;
    fn free(&mut self, ptr: usize, len: usize);
    fn parse_module(&mut self, ptr: usize, len: usize) -> usize;
    fn memory(&self) -> &[u8];
    fn memory_mut(&mut self) -> &mut [u8];
}

/// 源码 → 原始 AST
pub trait SourceParser {
    fn parse_module(&mut self, source: &str) -> Result<Value, ParseFailure>;
}

/// 按缓冲区约定驱动一个 `ParserModule`
#[derive(Debug)]
pub struct BufferedParser<M> {
    module: M,
}

impl<M: ParserModule> BufferedParser<M> {
    pub fn new(module: M) -> Self {
        Self { module }
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn into_inner(self) -> M {
        self.module
    }

    fn call(&mut self, source: &str) -> Result<Vec<u8>, ParseFailure> {
        let bytes = source.as_bytes();
        let len = bytes.len();

        let ptr = self.module.alloc(len);
        if ptr == 0 {
            return Err(ParseFailure::AllocationFailed { len });
        }
        let Some(slot) = self.module.memory_mut().get_mut(ptr..ptr + len) else {
            self.module.free(ptr, len);
            return Err(ParseFailure::AllocationFailed { len });
        };
        slot.copy_from_slice(bytes);

        let result = self.module.parse_module(ptr, len);
        self.module.free(ptr, len);
        if result == 0 {
            return Err(ParseFailure::NoResult);
        }

        let memory = self.module.memory();
        let tail = memory.get(result..).ok_or(ParseFailure::NoResult)?;
        let Some(nul) = tail.iter().position(|b| *b == 0) else {
            return Err(ParseFailure::NoResult);
        };
        let raw = tail[..nul].to_vec();
        // 响应缓冲区含结尾的 NUL
        self.module.free(result, nul + 1);
        Ok(raw)
    }
}

/// `{"error": {"message", "line", "column"}}` 形式的语法错误
fn syntax_failure(value: &Value) -> Option<ParseFailure> {
    let err = value.as_object()?.get("error")?.as_object()?;
    let position = |key: &str| {
        err.get(key)
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    };
    Some(ParseFailure::Syntax {
        message: err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        line: position("line"),
        column: position("column"),
    })
}

impl<M: ParserModule> SourceParser for BufferedParser<M> {
    fn parse_module(&mut self, source: &str) -> Result<Value, ParseFailure> {
        let raw = self.call(source)?;
        let text = String::from_utf8(raw).map_err(|_| ParseFailure::InvalidUtf8)?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| ParseFailure::MalformedJson(e.to_string()))?;
        match syntax_failure(&value) {
            Some(failure) => Err(failure),
            None => Ok(value),
        }
    }
}

/// 回放预先录制的 AST，不论输入为何
#[derive(Debug, Clone)]
pub struct ReplayParser {
    ast: Value,
}

impl ReplayParser {
    pub fn new(ast: Value) -> Self {
        Self { ast }
    }
}

impl SourceParser for ReplayParser {
    fn parse_module(&mut self, _source: &str) -> Result<Value, ParseFailure> {
        syntax_failure(&self.ast).map_or_else(|| Ok(self.ast.clone()), Err)
    }
}
