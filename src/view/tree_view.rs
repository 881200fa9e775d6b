//! 树视图：把 `NormalizedNode` 渲染成部件树，维护每个节点的展开状态
//!
//! 每个对象/数组节点拥有自己的 `is_open`，切换时只改动自身的内容区、
//! 括号与省略号；后代因容器隐藏而不可见，重新展开时保留各自原状态。

use crate::model::node::{NodePath, NormalizedNode, PathSegment, Primitive};
use crate::view::widget::{ClickAction, Display, StyleClass, ViewId, WidgetId, WidgetTree};

pub const TOGGLE_OPEN: &str = "-";
pub const TOGGLE_CLOSED: &str = "+";
pub const ELLIPSIS: &str = "...";
pub const EMPTY_ARRAY: &str = "[]";

/// 悬停事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    Enter,
    Exit,
}

impl HoverEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            HoverEvent::Enter => "enter",
            HoverEvent::Exit => "exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    NamedObject,
    Record,
    Array,
    EmptyArray,
    Primitive,
}

/// 节点在部件树中占用的部件
#[derive(Debug, Clone, Default)]
pub struct ViewParts {
    pub container: Option<WidgetId>,
    pub content: Option<WidgetId>,
    pub ellipsis: Option<WidgetId>,
    pub glyph: Option<WidgetId>,
    /// 自己画的括号，或父节点代画后登记过来的括号
    pub braces: Vec<WidgetId>,
}

#[derive(Debug, Clone)]
pub struct ViewNode {
    pub kind: ViewKind,
    pub is_open: bool,
    pub parts: ViewParts,
    /// 在规范化树中的位置
    pub source: NodePath,
}

/// 字符串按字符转义：换行、回车、制表、双引号、反斜杠
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

/// 嵌在字段值里时父节点代画的括号对
fn parent_drawn_braces(node: &NormalizedNode) -> Option<(&'static str, &'static str)> {
    match node {
        NormalizedNode::NamedObject { name: None, .. } => Some(("{", "}")),
        NormalizedNode::Array { items } if !items.is_empty() => Some(("[", "]")),
        NormalizedNode::NamedObject { name: Some(_), .. }
        | NormalizedNode::Array { .. }
        | NormalizedNode::Primitive { .. } => None,
    }
}

struct Builder<'a> {
    widgets: &'a mut WidgetTree,
    nodes: &'a mut Vec<ViewNode>,
}

impl Builder<'_> {
    fn reserve(&mut self, kind: ViewKind, source: NodePath) -> ViewId {
        let id = ViewId(self.nodes.len());
        self.nodes.push(ViewNode {
            kind,
            is_open: true,
            parts: ViewParts::default(),
            source,
        });
        id
    }

    fn trivia(&mut self, parent: WidgetId, text: &str, display: Display) -> WidgetId {
        self.widgets
            .push(Some(parent), StyleClass::Trivia, display, Some(text.to_string()))
    }

    fn render(
        &mut self,
        node: &NormalizedNode,
        parent: WidgetId,
        braces: bool,
        path: NodePath,
    ) -> ViewId {
        match node {
            NormalizedNode::NamedObject {
                name: Some(name),
                fields,
                ..
            } => self.render_named(name, fields, parent, path),
            NormalizedNode::NamedObject { name: None, fields, .. } => {
                self.render_record(fields, parent, braces, path)
            }
            NormalizedNode::Array { items } if items.is_empty() => {
                let view = self.reserve(ViewKind::EmptyArray, path);
                let leaf = self.widgets.push(
                    Some(parent),
                    StyleClass::ArrayEmpty,
                    Display::Inline,
                    Some(EMPTY_ARRAY.to_string()),
                );
                self.nodes[view.0].parts.container = Some(leaf);
                view
            }
            NormalizedNode::Array { items } => self.render_array(items, parent, braces, path),
            NormalizedNode::Primitive { value } => self.render_primitive(value, parent, path),
        }
    }

    fn render_named(
        &mut self,
        name: &str,
        fields: &[(String, NormalizedNode)],
        parent: WidgetId,
        path: NodePath,
    ) -> ViewId {
        let view = self.reserve(ViewKind::NamedObject, path.clone());
        let container = self
            .widgets
            .push(Some(parent), StyleClass::Object, Display::Block, None);
        self.set_hover(container, view);

        let header = self
            .widgets
            .push(Some(container), StyleClass::ObjectHeader, Display::Block, None);
        let glyph = self.widgets.push(
            Some(header),
            StyleClass::HeaderToggle,
            Display::Inline,
            Some(TOGGLE_OPEN.to_string()),
        );
        let title = self.widgets.push(
            Some(header),
            StyleClass::HeaderName,
            Display::Inline,
            Some(name.to_string()),
        );
        self.set_click(title, view);
        let lbrace = self.trivia(header, "{", Display::Inline);

        let ellipsis = self.trivia(container, ELLIPSIS, Display::None);
        let content = self
            .widgets
            .push(Some(container), StyleClass::ObjectContent, Display::Block, None);
        self.render_fields(fields, content, &path);
        let rbrace = self.trivia(container, "}", Display::Inline);

        let parts = &mut self.nodes[view.0].parts;
        parts.container = Some(container);
        parts.content = Some(content);
        parts.ellipsis = Some(ellipsis);
        parts.glyph = Some(glyph);
        parts.braces.extend([lbrace, rbrace]);
        view
    }

    /// 匿名对象：括号由调用方决定是否绘制
    fn render_record(
        &mut self,
        fields: &[(String, NormalizedNode)],
        parent: WidgetId,
        braces: bool,
        path: NodePath,
    ) -> ViewId {
        let view = self.reserve(ViewKind::Record, path.clone());
        let container = self
            .widgets
            .push(Some(parent), StyleClass::Object, Display::Block, None);
        self.set_hover(container, view);

        let lbrace = braces.then(|| self.trivia(container, "{", Display::Inline));
        let ellipsis = self.trivia(container, ELLIPSIS, Display::None);
        let content = self
            .widgets
            .push(Some(container), StyleClass::ObjectContent, Display::Block, None);
        self.render_fields(fields, content, &path);
        let rbrace = braces.then(|| self.trivia(container, "}", Display::Inline));

        let parts = &mut self.nodes[view.0].parts;
        parts.container = Some(container);
        parts.content = Some(content);
        parts.ellipsis = Some(ellipsis);
        parts.braces.extend(lbrace.into_iter().chain(rbrace));
        view
    }

    fn render_array(
        &mut self,
        items: &[NormalizedNode],
        parent: WidgetId,
        braces: bool,
        path: NodePath,
    ) -> ViewId {
        let view = self.reserve(ViewKind::Array, path.clone());
        let container = self
            .widgets
            .push(Some(parent), StyleClass::Array, Display::Block, None);
        self.set_hover(container, view);

        let lbrace = braces.then(|| self.trivia(container, "[", Display::Inline));
        let ellipsis = self.trivia(container, ELLIPSIS, Display::None);
        let content = self
            .widgets
            .push(Some(container), StyleClass::ArrayContent, Display::Block, None);
        for (idx, item) in items.iter().enumerate() {
            let slot = self
                .widgets
                .push(Some(content), StyleClass::ArrayItem, Display::Block, None);
            let mut item_path = path.clone();
            item_path.push(PathSegment::Item(idx));
            self.render(item, slot, true, item_path);
        }
        let rbrace = braces.then(|| self.trivia(container, "]", Display::Inline));

        let parts = &mut self.nodes[view.0].parts;
        parts.container = Some(container);
        parts.content = Some(content);
        parts.ellipsis = Some(ellipsis);
        parts.braces.extend(lbrace.into_iter().chain(rbrace));
        view
    }

    fn render_primitive(&mut self, value: &Primitive, parent: WidgetId, path: NodePath) -> ViewId {
        let view = self.reserve(ViewKind::Primitive, path);
        let (class, text) = match value {
            Primitive::String(s) => (StyleClass::String, escape_string(s)),
            Primitive::Number(_) => (StyleClass::Number, value.text()),
            Primitive::Bool(_) => (StyleClass::Boolean, value.text()),
            Primitive::Null => (StyleClass::Null, value.text()),
        };
        let leaf = self
            .widgets
            .push(Some(parent), class, Display::Inline, Some(text));
        self.nodes[view.0].parts.container = Some(leaf);
        view
    }

    fn render_fields(
        &mut self,
        fields: &[(String, NormalizedNode)],
        content: WidgetId,
        path: &NodePath,
    ) {
        for (idx, (key, value)) in fields.iter().enumerate() {
            let item = self
                .widgets
                .push(Some(content), StyleClass::ContentItem, Display::Block, None);
            let key_widget = self.widgets.push(
                Some(item),
                StyleClass::ItemKey,
                Display::Inline,
                Some(key.clone()),
            );
            let value_widget = self
                .widgets
                .push(Some(item), StyleClass::ItemValue, Display::Inline, None);

            let mut child_path = path.clone();
            child_path.push(PathSegment::Field(idx));

            let child = match parent_drawn_braces(value) {
                Some((open, close)) => {
                    let lbrace = self.trivia(value_widget, open, Display::Inline);
                    let child = self.render(value, value_widget, false, child_path);
                    let rbrace = self.trivia(value_widget, close, Display::Inline);
                    self.nodes[child.0].parts.braces.extend([lbrace, rbrace]);
                    child
                }
                None => self.render(value, value_widget, true, child_path),
            };

            if value.is_expandable() {
                if let Some(w) = self.widgets.get_mut(key_widget) {
                    w.classes.push(StyleClass::KeyButton);
                }
                self.set_click(key_widget, child);
            }
        }
    }

    fn set_hover(&mut self, widget: WidgetId, view: ViewId) {
        if let Some(w) = self.widgets.get_mut(widget) {
            w.hover = Some(view);
        }
    }

    fn set_click(&mut self, widget: WidgetId, view: ViewId) {
        if let Some(w) = self.widgets.get_mut(widget) {
            w.on_click = Some(ClickAction::Toggle(view));
        }
    }
}

/// 一次渲染的完整结果：规范化树、部件树与视图节点状态
#[derive(Debug, Clone)]
pub struct TreeView {
    tree: NormalizedNode,
    widgets: WidgetTree,
    nodes: Vec<ViewNode>,
    root_widget: WidgetId,
    root_view: ViewId,
}

impl TreeView {
    /// 从空容器开始完整渲染，所有节点默认展开
    pub fn render(tree: NormalizedNode) -> Self {
        let mut widgets = WidgetTree::new();
        let mut nodes = Vec::new();
        let root_widget = widgets.push(None, StyleClass::Container, Display::Block, None);
        let root_view = Builder {
            widgets: &mut widgets,
            nodes: &mut nodes,
        }
        .render(&tree, root_widget, true, NodePath::new());

        Self {
            tree,
            widgets,
            nodes,
            root_widget,
            root_view,
        }
    }

    pub fn tree(&self) -> &NormalizedNode {
        &self.tree
    }

    pub fn into_tree(self) -> NormalizedNode {
        self.tree
    }

    pub fn widgets(&self) -> &WidgetTree {
        &self.widgets
    }

    pub fn root_widget(&self) -> WidgetId {
        self.root_widget
    }

    pub fn root_view(&self) -> ViewId {
        self.root_view
    }

    pub fn view_node(&self, view: ViewId) -> Option<&ViewNode> {
        self.nodes.get(view.0)
    }

    pub fn views(&self) -> impl Iterator<Item = (ViewId, &ViewNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (ViewId(i), n))
    }

    pub fn view_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_open(&self, view: ViewId) -> Option<bool> {
        self.view_node(view).map(|n| n.is_open)
    }

    /// 视图节点对应的原始（渲染前）规范化节点
    pub fn node(&self, view: ViewId) -> Option<&NormalizedNode> {
        self.view_node(view)
            .and_then(|n| self.tree.resolve(&n.source))
    }

    pub fn find_view(&self, path: &[PathSegment]) -> Option<ViewId> {
        self.views()
            .find(|(_, n)| n.source.as_slice() == path)
            .map(|(id, _)| id)
    }

    pub fn json_path(&self, view: ViewId) -> Option<String> {
        self.view_node(view)
            .and_then(|n| self.tree.json_path(&n.source))
    }

    /// 切换节点展开状态，返回切换后的状态；叶子与空数组不可切换
    pub fn toggle(&mut self, view: ViewId) -> Option<bool> {
        let node = self.nodes.get_mut(view.0)?;
        match node.kind {
            ViewKind::NamedObject | ViewKind::Record | ViewKind::Array => {}
            ViewKind::EmptyArray | ViewKind::Primitive => return None,
        }
        node.is_open = !node.is_open;
        let open = node.is_open;
        let parts = node.parts.clone();

        let (content, brace, ellipsis) = if open {
            (Display::Block, Display::Inline, Display::None)
        } else {
            (Display::None, Display::None, Display::Inline)
        };
        if let Some(id) = parts.content {
            self.widgets.set_display(id, content);
        }
        for id in parts.braces {
            self.widgets.set_display(id, brace);
        }
        if let Some(id) = parts.ellipsis {
            self.widgets.set_display(id, ellipsis);
        }
        if let Some(id) = parts.glyph {
            self.widgets
                .set_text(id, if open { TOGGLE_OPEN } else { TOGGLE_CLOSED });
        }

        tracing::debug!("节点切换: {:?} -> {}", view, if open { "展开" } else { "折叠" });
        Some(open)
    }

    /// 点击部件：执行其点击动作（没有动作返回 false）
    pub fn click(&mut self, widget: WidgetId) -> bool {
        match self.widgets.get(widget).and_then(|w| w.on_click) {
            Some(ClickAction::Toggle(view)) => self.toggle(view).is_some(),
            None => false,
        }
    }

    /// 从内到外包含该部件的悬停区域
    fn hover_chain(&self, widget: Option<WidgetId>) -> Vec<ViewId> {
        widget
            .map(|w| {
                self.widgets
                    .ancestors(w)
                    .into_iter()
                    .filter_map(|id| self.widgets.get(id).and_then(|w| w.hover))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 指针从 `from` 移到 `to`：离开的区域由内到外触发 Exit，
    /// 进入的区域由外到内触发 Enter，回调收到区域对应的原始节点
    pub fn pointer_moved<F>(&self, from: Option<WidgetId>, to: Option<WidgetId>, mut callback: F)
    where
        F: FnMut(&NormalizedNode, HoverEvent),
    {
        let left = self.hover_chain(from);
        let entered = self.hover_chain(to);

        for view in left.iter().filter(|v| !entered.contains(*v)) {
            if let Some(node) = self.node(*view) {
                callback(node, HoverEvent::Exit);
            }
        }
        for view in entered.iter().rev().filter(|v| !left.contains(*v)) {
            if let Some(node) = self.node(*view) {
                callback(node, HoverEvent::Enter);
            }
        }
    }
}

/// 渲染策略：规范化树 → 视图
pub trait Renderer {
    fn render(&mut self, tree: NormalizedNode) -> TreeView;
}

/// 每次从空容器完整重建，不复用旧视图的任何状态
#[derive(Debug, Default, Clone, Copy)]
pub struct FullRenderer;

impl Renderer for FullRenderer {
    fn render(&mut self, tree: NormalizedNode) -> TreeView {
        TreeView::render(tree)
    }
}
