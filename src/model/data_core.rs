//! AppState：查看器的唯一状态记录，以及基于 JSONPath 的子树提取

use jsonpath_rust::{JsonPath, query::queryable::Queryable};
use serde_json::Value;
use thiserror::Error;

use crate::model::node::NormalizedNode;
use crate::model::normalize::NormalizeError;
use crate::model::offset_map::OffsetTable;
use crate::parser::ParseFailure;
use crate::view::theme::{HighlightStyle, Theme};
use crate::view::tree_view::TreeView;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("解析失败: {0}")]
    Parse(#[from] ParseFailure),
    #[error("规范化失败: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("没有可挂载的宿主元素")]
    MissingHostElement,
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSONPath错误: {0}")]
    JsonPath(String),
    #[error("状态错误: {0}")]
    State(String),
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 一次成功解析对应的源码与偏移表
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub source: String,
    pub offsets: OffsetTable,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub theme: Theme,
    pub highlight: HighlightStyle,
    pub snapshot: Option<Snapshot>,
    pub view: Option<TreeView>,
    pub last_failure: Option<String>,
    pub status: String,
}

impl AppState {
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            highlight: theme.highlight(),
            theme,
            ..Self::default()
        }
    }

    /// 源码、偏移表与视图一起替换
    pub fn commit(&mut self, source: String, offsets: OffsetTable, view: TreeView) {
        self.snapshot = Some(Snapshot { source, offsets });
        self.view = Some(view);
        self.last_failure = None;
    }

    pub fn source(&self) -> Option<&str> {
        self.snapshot.as_ref().map(|s| s.source.as_str())
    }

    pub fn tree(&self) -> Option<&NormalizedNode> {
        self.view.as_ref().map(TreeView::tree)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.highlight = theme.highlight();
        self.theme = theme;
    }

    pub fn record_failure(&mut self, err: &AppError) {
        let message = err.to_string();
        self.status = format!("{}{}", crate::vm::bridge::STATUS_ERROR_PREFIX, message);
        self.last_failure = Some(message);
    }

    /// 按 JSONPath 提取第一个匹配节点的 pretty 字符串（在展示 JSON 上查询）
    pub fn extract_subtree_pretty(&self, json_path: &str) -> Result<String, AppError> {
        let dom: Value = self
            .tree()
            .map(NormalizedNode::to_value)
            .ok_or_else(|| AppError::State("语法树尚未渲染".into()))?;
        let hits: Vec<&Value> = dom
            .query(json_path)
            .map_err(|e| AppError::JsonPath(e.to_string()))?;
        let first = hits
            .into_iter()
            .next()
            .ok_or_else(|| AppError::JsonPath("未匹配到任何节点".into()))?;
        Ok(serde_json::to_string_pretty(first)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize::normalize;
    use serde_json::json;

    fn loaded_state() -> AppState {
        let tree = normalize(&json!({
            "start": 0,
            "end": 10,
            "data": {"variable_declarator": {"id": "张三", "init": "30", "odd key": "true"}}
        }))
        .expect("规范化失败");
        let mut state = AppState::default();
        let source = "let 张三 = 30;".to_string();
        let offsets = OffsetTable::build(&source);
        state.commit(source, offsets, TreeView::render(tree));
        state
    }

    #[test]
    fn test_extract_subtree() {
        let state = loaded_state();

        let root = state.extract_subtree_pretty("$").expect("提取根节点应该成功");
        assert!(root.contains("\"$name\": \"VariableDeclarator\""), "根节点应包含名称: {}", root);

        let id = state.extract_subtree_pretty("$.id").expect("提取字段应该成功");
        assert!(id.contains("张三"), "结果应该包含标识符");

        let odd = state.extract_subtree_pretty("$['odd key']").expect("bracket-notation 应该可用");
        assert_eq!(odd, "true");
    }

    #[test]
    fn test_invalid_json_path() {
        let state = loaded_state();
        assert!(state.extract_subtree_pretty("$.nonexistent").is_err(), "无效路径应该返回错误");
    }

    #[test]
    fn test_extract_before_render() {
        let state = AppState::default();
        assert!(matches!(
            state.extract_subtree_pretty("$"),
            Err(AppError::State(_))
        ));
    }

    #[test]
    fn test_failure_is_surfaced_in_status() {
        let mut state = loaded_state();
        state.record_failure(&AppError::Parse(ParseFailure::Syntax {
            message: "unexpected token".into(),
            line: 2,
            column: 5,
        }));
        assert!(state.status.starts_with(crate::vm::bridge::STATUS_ERROR_PREFIX));
        assert!(state.status.contains("2:5"), "状态应包含行列号: {}", state.status);
        // 之前的视图保持不变
        assert!(state.view.is_some());
        assert_eq!(state.source(), Some("let 张三 = 30;"));
    }

    #[test]
    fn test_theme_switch_updates_highlight() {
        let mut state = AppState::with_theme(Theme::tokyo_night());
        assert_eq!(state.highlight, HighlightStyle::dark());
        state.set_theme(Theme::solarized_light());
        assert_eq!(state.highlight, HighlightStyle::light());
    }
}
