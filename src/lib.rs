//! AST 树视图库
//!
//! 把解析器输出的原始语法树规范化为统一的展示结构，渲染成可折叠的部件树，
//! 并通过字节 → 字符偏移表把树节点的悬停同步为源码编辑器中的高亮

pub mod model;
pub mod parser;
pub mod utils;
pub mod view;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{AppError, AppState};
pub use model::node::{NodeKind, NormalizedNode, Primitive, Span};
pub use model::normalize::{normalize, AstNormalizer, NormalizeError};
pub use model::offset_map::{CharRange, OffsetTable, SpanConvention, TextUnit};
pub use parser::{BufferedParser, ParseFailure, ParserModule, SourceParser};
pub use view::tree_view::{FullRenderer, HoverEvent, Renderer, TreeView};
pub use vm::bridge::HoverBridge;
pub use vm::controller::{Controller, RenderHost};
pub use vm::editor::{EditorEffect, EditorSurface, MemoryEditor};
