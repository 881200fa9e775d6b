//! 控制器：轮询编辑器文本，防抖后执行 解析 → 规范化 → 渲染，
//! 并把树视图上的交互（悬停、点击、主题、复制）接到 AppState 上

use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::model::config::ViewerConfig;
use crate::model::data_core::{AppError, AppState};
use crate::model::node::NormalizedNode;
use crate::model::normalize::AstNormalizer;
use crate::model::offset_map::OffsetTable;
use crate::parser::SourceParser;
use crate::utils::debounce::Debouncer;
use crate::view::theme::Theme;
use crate::view::tree_view::{FullRenderer, Renderer, TreeView};
use crate::view::widget::{ViewId, WidgetId};
use crate::vm::bridge::{HoverBridge, STATUS_COPIED, STATUS_READY, STATUS_RENDERED, STATUS_THEME_CHANGED};
use crate::vm::editor::EditorSurface;

/// 树视图的挂载点
pub trait RenderHost {
    fn present(&mut self, view: &TreeView, theme: &Theme) -> Result<(), AppError>;
}

pub struct Controller<P, E> {
    config: ViewerConfig,
    parser: P,
    editor: E,
    host: Option<Box<dyn RenderHost>>,
    renderer: Box<dyn Renderer>,
    bridge: HoverBridge,
    debouncer: Debouncer,
    last_poll: Option<u64>,
    last_source: Option<String>,
    state: AppState,
}

fn unknown_theme(name: &str) -> AppError {
    AppError::State(format!("未知主题: {}（可选: {}）", name, Theme::builtin_names().join(", ")))
}

impl<P: SourceParser, E: EditorSurface> Controller<P, E> {
    pub fn new(config: ViewerConfig, parser: P, editor: E) -> Result<Self, AppError> {
        let theme = Theme::by_name(&config.theme).ok_or_else(|| unknown_theme(&config.theme))?;
        let mut state = AppState::with_theme(theme);
        state.status = STATUS_READY.to_string();
        Ok(Self {
            bridge: HoverBridge::new(config.span_convention),
            debouncer: Debouncer::new(config.debounce),
            config,
            parser,
            editor,
            host: None,
            renderer: Box::new(FullRenderer),
            last_poll: None,
            last_source: None,
            state,
        })
    }

    pub fn attach_host(&mut self, host: Box<dyn RenderHost>) {
        self.host = Some(host);
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> Option<&TreeView> {
        self.state.view.as_ref()
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn status_message(&self) -> &str {
        &self.state.status
    }

    /// 宿主时钟推进到 `now`（毫秒）；本次执行了渲染则返回 true。
    /// 任何失败都只记录到状态中，不会中断轮询。
    pub fn tick(&mut self, now: u64) -> bool {
        let due = self
            .last_poll
            .map_or(true, |last| now.saturating_sub(last) >= self.config.poll_interval);
        // 先执行已到期的防抖，再在轮询点重新计时
        let fired = self.debouncer.fire(now);
        if due {
            self.last_poll = Some(now);
            if !fired {
                self.debouncer.trigger(now);
            }
        }
        if !fired {
            return false;
        }

        match self.run_cycle() {
            Ok(rendered) => rendered,
            Err(err) => {
                match &err {
                    AppError::Parse(failure) => warn!("解析失败，保留上一次的视图: {}", failure),
                    other => error!("渲染中止: {}", other),
                }
                self.state.record_failure(&err);
                false
            }
        }
    }

    /// 执行一轮 解析 → 规范化 → 渲染；文本为空或未变化时跳过
    pub fn run_cycle(&mut self) -> Result<bool, AppError> {
        let source = self.editor.text();
        if source.is_empty() || self.last_source.as_deref() == Some(source.as_str()) {
            return Ok(false);
        }
        self.last_source = Some(source.clone());

        let start = Instant::now();
        let raw = self.parser.parse_module(&source)?;
        let tree = AstNormalizer::with_source_len(source.len()).normalize(&raw)?;
        let offsets = OffsetTable::build_with(&source, self.config.text_unit);
        let node_count = tree.node_count();
        let view = self.renderer.render(tree);

        let host = self.host.as_mut().ok_or(AppError::MissingHostElement)?;
        host.present(&view, &self.state.theme)?;

        self.state.commit(source, offsets, view);
        self.state.status = STATUS_RENDERED.to_string();
        info!("渲染完成: {} 个节点，耗时 {:?}", node_count, start.elapsed());
        Ok(true)
    }

    /// 指针从部件 `prev` 移到 `next`，把悬停事件转成编辑器高亮
    pub fn hover(&mut self, prev: Option<WidgetId>, next: Option<WidgetId>) {
        let Self {
            state,
            editor,
            bridge,
            ..
        } = self;
        let (Some(view), Some(snapshot)) = (state.view.as_ref(), state.snapshot.as_ref()) else {
            return;
        };
        let style = &state.highlight;
        view.pointer_moved(prev, next, |node, event| {
            bridge.on_hover(node, event, &snapshot.offsets, style, &mut *editor);
        });
    }

    /// 点击部件；发生切换时重新呈现
    pub fn click(&mut self, widget: WidgetId) -> bool {
        let toggled = self.state.view.as_mut().map_or(false, |view| view.click(widget));
        if toggled {
            self.present_current();
        }
        toggled
    }

    /// 切换主题：以新主题重新渲染当前语法树（展开状态重置）
    pub fn set_theme(&mut self, name: &str) -> Result<(), AppError> {
        let theme = Theme::by_name(name).ok_or_else(|| unknown_theme(name))?;
        self.state.set_theme(theme);
        if let Some(view) = self.state.view.take() {
            self.state.view = Some(self.renderer.render(view.into_tree()));
            self.present_current();
        }
        self.state.status = STATUS_THEME_CHANGED.to_string();
        debug!("主题切换为 {}", name);
        Ok(())
    }

    /// 复制视图节点对应的子树（pretty JSON）
    pub fn copy_subtree_json(&mut self, view: ViewId) -> Result<String, AppError> {
        let value = self
            .view()
            .and_then(|v| v.node(view))
            .map(NormalizedNode::to_value)
            .ok_or_else(|| AppError::State(format!("视图节点不存在: {:?}", view)))?;
        let text = serde_json::to_string_pretty(&value)?;
        self.state.status = STATUS_COPIED.to_string();
        Ok(text)
    }

    fn present_current(&mut self) {
        let (Some(host), Some(view)) = (self.host.as_mut(), self.state.view.as_ref()) else {
            return;
        };
        if let Err(err) = host.present(view, &self.state.theme) {
            error!("重新呈现失败: {}", err);
            self.state.record_failure(&err);
        }
    }
}
