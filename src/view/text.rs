//! 文本导出：按当前展开状态打印可见部件，可选按主题着色（ANSI 真彩色）

use crate::view::theme::{Style, Theme};
use crate::view::tree_view::TreeView;
use crate::view::widget::{Display, StyleClass, WidgetId};

const INDENT: &str = "  ";

#[derive(Default)]
struct Printer {
    out: String,
    line: Vec<String>,
    line_depth: usize,
}

impl Printer {
    fn push(&mut self, token: String, depth: usize) {
        if self.line.is_empty() {
            self.line_depth = depth;
        }
        self.line.push(token);
    }

    fn flush(&mut self) {
        if self.line.is_empty() {
            return;
        }
        self.out.push_str(&INDENT.repeat(self.line_depth));
        self.out.push_str(&self.line.join(" "));
        self.out.push('\n');
        self.line.clear();
    }
}

fn token(class: StyleClass, text: &str) -> String {
    match class {
        StyleClass::String => format!("\"{}\"", text),
        StyleClass::ItemKey => format!("{}:", text),
        _ => text.to_string(),
    }
}

/// `#rrggbb` / `#rrggbbaa` → RGB，忽略透明度
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn paint(style: &Style, text: String) -> String {
    let Some((r, g, b)) = parse_hex(&style.color) else {
        return text;
    };
    let bold = if style.bold { "\x1b[1m" } else { "" };
    format!("{}\x1b[38;2;{};{};{}m{}\x1b[0m", bold, r, g, b, text)
}

fn walk(view: &TreeView, id: WidgetId, depth: usize, theme: Option<&Theme>, printer: &mut Printer) {
    let Some(widget) = view.widgets().get(id) else {
        return;
    };
    if widget.display == Display::None {
        return;
    }

    let primary = widget.classes[0];
    match primary {
        StyleClass::ObjectContent | StyleClass::ArrayContent => {
            printer.flush();
            for child in &widget.children {
                walk(view, *child, depth + 1, theme, printer);
            }
            printer.flush();
            return;
        }
        StyleClass::ContentItem | StyleClass::ArrayItem => printer.flush(),
        _ => {}
    }

    if let Some(text) = &widget.text {
        let text = token(primary, text);
        let text = match (theme, primary.token()) {
            (Some(theme), Some(class)) => paint(theme.style(class), text),
            _ => text,
        };
        printer.push(text, depth);
    }
    for child in &widget.children {
        walk(view, *child, depth, theme, printer);
    }
}

/// 把视图中当前可见的部分渲染为缩进文本，每个字段/数组元素占一行
pub fn render_plain(view: &TreeView) -> String {
    let mut printer = Printer::default();
    walk(view, view.root_widget(), 0, None, &mut printer);
    printer.flush();
    printer.out
}

/// 与 `render_plain` 布局相同，按主题给键、标题与各类值着色
pub fn render_themed(view: &TreeView, theme: &Theme) -> String {
    let mut printer = Printer::default();
    walk(view, view.root_widget(), 0, Some(theme), &mut printer);
    printer.flush();
    printer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::{NormalizedNode, PathSegment};
    use crate::model::normalize::normalize;
    use serde_json::json;

    fn sample() -> TreeView {
        TreeView::render(
            normalize(&json!({
                "variable_declaration": {
                    "kind": "let",
                    "declarators": [{"variable_declarator": {"id": "x", "init": "1"}}],
                    "meta": {"text": "a\"b", "tags": []}
                }
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_expanded_tree() {
        let expected = "\
- VariableDeclaration {
  kind: \"let\"
  declarators: [
    - VariableDeclarator {
      id: \"x\"
      init: 1
    }
  ]
  meta: {
    text: \"a\\\"b\"
    tags: []
  }
}
";
        assert_eq!(render_plain(&sample()), expected);
    }

    #[test]
    fn test_collapsed_nodes_show_ellipsis() {
        let mut view = sample();
        let meta = view.find_view(&[PathSegment::Field(2)]).unwrap();
        view.toggle(meta);
        let text = render_plain(&view);
        assert!(text.contains("  meta: ...\n"), "折叠的对象应显示省略号: {}", text);
        assert!(!text.contains("tags"));

        view.toggle(view.root_view());
        assert_eq!(render_plain(&view), "+ VariableDeclaration ...\n");
    }

    #[test]
    fn test_themed_colors_follow_token_classes() {
        let view = TreeView::render(normalize(&json!({"text": "hi", "n": "1"})).unwrap());
        let text = render_themed(&view, &Theme::tokyo_night());
        // tokyo-night: 键 #7aa2f7，字符串 #9ece6a，数字 #ff9e64
        assert!(text.contains("\x1b[38;2;122;162;247mtext:\x1b[0m"), "键应按主题着色: {:?}", text);
        assert!(text.contains("\x1b[38;2;158;206;106m\"hi\"\x1b[0m"));
        assert!(text.contains("\x1b[38;2;255;158;100m1\x1b[0m"));
        // 括号等结构符号不着色
        assert!(text.starts_with("{\n"));

        let bold = render_themed(&TreeView::render(NormalizedNode::number(7.0)), &Theme::espresso());
        assert_eq!(bold, "\x1b[1m\x1b[38;2;207;79;95m7\x1b[0m\n");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#1a1b26"), Some((26, 27, 38)));
        assert_eq!(parse_hex("#15191EFA"), Some((21, 25, 30)));
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#12"), None);
    }

    #[test]
    fn test_bare_primitive_and_empty_array() {
        let view = TreeView::render(normalize(&json!("hello")).unwrap());
        assert_eq!(render_plain(&view), "\"hello\"\n");

        let view = TreeView::render(normalize(&json!([])).unwrap());
        assert_eq!(render_plain(&view), "[]\n");
    }
}
