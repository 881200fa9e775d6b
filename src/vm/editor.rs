//! 编辑器接口：宿主编辑器只需提供文本与装饰效果

use crate::model::offset_map::CharRange;
use crate::view::theme::HighlightStyle;

/// 对编辑器的装饰操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEffect {
    /// 高亮半开字符区间 `[from, to)`，替换已有高亮
    Highlight {
        from: usize,
        to: usize,
        style: HighlightStyle,
    },
    ClearHighlights,
}

pub trait EditorSurface {
    fn text(&self) -> String;
    fn apply(&mut self, effect: EditorEffect);
}

/// 内存中的编辑器：回放工具与测试使用
#[derive(Debug, Clone, Default)]
pub struct MemoryEditor {
    text: String,
    highlights: Vec<(CharRange, HighlightStyle)>,
    applied: usize,
}

impl MemoryEditor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn highlights(&self) -> &[(CharRange, HighlightStyle)] {
        &self.highlights
    }

    /// 当前高亮覆盖的文本
    pub fn highlighted_text(&self) -> Vec<String> {
        self.highlights
            .iter()
            .map(|(range, _)| {
                self.text
                    .chars()
                    .skip(range.from)
                    .take(range.to.saturating_sub(range.from))
                    .collect()
            })
            .collect()
    }

    /// 已收到的效果数
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl EditorSurface for MemoryEditor {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn apply(&mut self, effect: EditorEffect) {
        self.applied += 1;
        match effect {
            EditorEffect::Highlight { from, to, style } => {
                self.highlights = vec![(CharRange { from, to }, style)];
            }
            EditorEffect::ClearHighlights => self.highlights.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_replaces_previous() {
        let mut editor = MemoryEditor::new("€ab x = 1;");
        editor.apply(EditorEffect::Highlight {
            from: 0,
            to: 3,
            style: HighlightStyle::dark(),
        });
        editor.apply(EditorEffect::Highlight {
            from: 4,
            to: 5,
            style: HighlightStyle::dark(),
        });
        assert_eq!(editor.highlighted_text(), vec!["x".to_string()]);

        editor.apply(EditorEffect::ClearHighlights);
        assert!(editor.highlights().is_empty());
        assert_eq!(editor.applied(), 3);
    }
}
