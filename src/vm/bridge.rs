//! VM桥接层：树视图悬停事件 → 编辑器高亮

use crate::model::node::NormalizedNode;
use crate::model::offset_map::{OffsetTable, SpanConvention};
use crate::view::theme::HighlightStyle;
use crate::view::tree_view::HoverEvent;
use crate::vm::editor::{EditorEffect, EditorSurface};

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_RENDERED: &str = "渲染完成";
pub const STATUS_COPIED: &str = "已复制节点";
pub const STATUS_THEME_CHANGED: &str = "主题已切换";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

#[derive(Debug, Clone, Copy, Default)]
pub struct HoverBridge {
    convention: SpanConvention,
}

impl HoverBridge {
    pub fn new(convention: SpanConvention) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> SpanConvention {
        self.convention
    }

    /// 进入带区间的节点 → 高亮对应字符区间；离开 → 清除高亮；
    /// 进入没有区间的节点不产生效果
    pub fn effect_for(
        &self,
        node: &NormalizedNode,
        event: HoverEvent,
        offsets: &OffsetTable,
        style: &HighlightStyle,
    ) -> Option<EditorEffect> {
        match event {
            HoverEvent::Enter => {
                let span = node.span()?;
                let range = offsets.translate_span(span, self.convention);
                Some(EditorEffect::Highlight {
                    from: range.from,
                    to: range.to,
                    style: style.clone(),
                })
            }
            HoverEvent::Exit => Some(EditorEffect::ClearHighlights),
        }
    }

    pub fn on_hover<E: EditorSurface + ?Sized>(
        &self,
        node: &NormalizedNode,
        event: HoverEvent,
        offsets: &OffsetTable,
        style: &HighlightStyle,
        editor: &mut E,
    ) {
        let Some(effect) = self.effect_for(node, event, offsets, style) else {
            return;
        };
        tracing::debug!("悬停{}: {:?} -> {:?}", event.as_str(), node.name(), effect);
        editor.apply(effect);
    }
}
