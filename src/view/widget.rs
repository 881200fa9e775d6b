//! 与宿主无关的部件树：扁平 arena，父子关系用下标表示

use crate::view::theme::TokenClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) usize);

/// 渲染出的可折叠节点（对象/数组/叶子）的编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) usize);

impl WidgetId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl ViewId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Inline,
    None,
}

/// 部件样式类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    Container,
    Object,
    ObjectHeader,
    HeaderToggle,
    HeaderName,
    ObjectContent,
    ContentItem,
    ItemKey,
    KeyButton,
    ItemValue,
    Trivia,
    Array,
    ArrayContent,
    ArrayItem,
    ArrayEmpty,
    String,
    Number,
    Boolean,
    Null,
}

impl StyleClass {
    /// 主题中对应的颜色类别（结构性类返回 None）
    pub fn token(self) -> Option<TokenClass> {
        match self {
            StyleClass::Container => Some(TokenClass::Background),
            StyleClass::HeaderName => Some(TokenClass::Title),
            StyleClass::HeaderToggle | StyleClass::ItemKey => Some(TokenClass::Key),
            StyleClass::String => Some(TokenClass::String),
            StyleClass::Number => Some(TokenClass::Number),
            StyleClass::Boolean => Some(TokenClass::Boolean),
            StyleClass::Null => Some(TokenClass::Null),
            StyleClass::Object
            | StyleClass::ObjectHeader
            | StyleClass::ObjectContent
            | StyleClass::ContentItem
            | StyleClass::KeyButton
            | StyleClass::ItemValue
            | StyleClass::Trivia
            | StyleClass::Array
            | StyleClass::ArrayContent
            | StyleClass::ArrayItem
            | StyleClass::ArrayEmpty => None,
        }
    }
}

/// 点击部件时执行的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Toggle(ViewId),
}

#[derive(Debug, Clone)]
pub struct Widget {
    pub classes: Vec<StyleClass>,
    pub text: Option<String>,
    pub display: Display,
    pub parent: Option<WidgetId>,
    pub children: Vec<WidgetId>,
    pub on_click: Option<ClickAction>,
    /// 悬停区域所属的视图节点
    pub hover: Option<ViewId>,
}

impl Widget {
    pub fn has_class(&self, class: StyleClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WidgetTree {
    widgets: Vec<Widget>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// 追加一个部件并挂到父部件下
    pub fn push(
        &mut self,
        parent: Option<WidgetId>,
        class: StyleClass,
        display: Display,
        text: Option<String>,
    ) -> WidgetId {
        let id = WidgetId(self.widgets.len());
        self.widgets.push(Widget {
            classes: vec![class],
            text,
            display,
            parent,
            children: Vec::new(),
            on_click: None,
            hover: None,
        });
        if let Some(parent) = parent {
            self.widgets[parent.0].children.push(id);
        }
        id
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &Widget)> {
        self.widgets.iter().enumerate().map(|(i, w)| (WidgetId(i), w))
    }

    pub fn set_display(&mut self, id: WidgetId, display: Display) {
        if let Some(w) = self.get_mut(id) {
            w.display = display;
        }
    }

    pub fn set_text(&mut self, id: WidgetId, text: &str) {
        if let Some(w) = self.get_mut(id) {
            w.text = Some(text.to_string());
        }
    }

    /// 自身在前，依次向上到根
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut current = self.get(id).map(|_| id);
        while let Some(cur) = current {
            out.push(cur);
            current = self.widgets[cur.0].parent;
        }
        out
    }

    /// 自身及所有祖先都未隐藏
    pub fn is_visible(&self, id: WidgetId) -> bool {
        let chain = self.ancestors(id);
        !chain.is_empty()
            && chain
                .iter()
                .all(|w| self.widgets[w.0].display != Display::None)
    }

    /// 按文本查找部件
    pub fn find_by_text(&self, text: &str) -> Vec<WidgetId> {
        self.iter()
            .filter(|(_, w)| w.text.as_deref() == Some(text))
            .map(|(id, _)| id)
            .collect()
    }

    /// 子树中的叶子部件（先序）
    pub fn leaves(&self, root: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(w) = self.get(id) else { continue };
            if w.is_leaf() {
                out.push(id);
            }
            stack.extend(w.children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_links_parent_and_child() {
        let mut tree = WidgetTree::new();
        let root = tree.push(None, StyleClass::Container, Display::Block, None);
        let a = tree.push(Some(root), StyleClass::Object, Display::Block, None);
        let b = tree.push(Some(a), StyleClass::Trivia, Display::Inline, Some("{".into()));

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(root).unwrap().children, vec![a]);
        assert_eq!(tree.get(b).unwrap().parent, Some(a));
        assert_eq!(tree.ancestors(b), vec![b, a, root]);
        assert_eq!(tree.leaves(root), vec![b]);
        assert_eq!(tree.find_by_text("{"), vec![b]);
    }

    #[test]
    fn test_visibility_follows_ancestors() {
        let mut tree = WidgetTree::new();
        let root = tree.push(None, StyleClass::Container, Display::Block, None);
        let content = tree.push(Some(root), StyleClass::ObjectContent, Display::Block, None);
        let leaf = tree.push(Some(content), StyleClass::String, Display::Inline, Some("x".into()));

        assert!(tree.is_visible(leaf));
        tree.set_display(content, Display::None);
        assert!(!tree.is_visible(leaf));
        assert_eq!(tree.get(leaf).unwrap().display, Display::Inline, "子部件自身状态不变");
        assert!(!tree.is_visible(WidgetId(42)));
    }

    #[test]
    fn test_style_tokens() {
        assert_eq!(StyleClass::HeaderName.token(), Some(TokenClass::Title));
        assert_eq!(StyleClass::Trivia.token(), None);
        assert_eq!(StyleClass::Boolean.token(), Some(TokenClass::Boolean));
    }
}
