//! 规范化节点：展示层使用的封闭标签树（NamedObject / Array / Primitive）

use serde_json::{Map, Number, Value};

/// 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

/// 半开字节区间 `[start, end)`，由解析器按 UTF-8 字节报告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 叶子值
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Primitive {
    pub fn kind(&self) -> NodeKind {
        match self {
            Primitive::Null => NodeKind::Null,
            Primitive::Bool(_) => NodeKind::Bool,
            Primitive::Number(_) => NodeKind::Number,
            Primitive::String(_) => NodeKind::String,
        }
    }

    /// 未转义的展示文本
    pub fn text(&self) -> String {
        match self {
            Primitive::Null => "null".to_string(),
            Primitive::Bool(b) => b.to_string(),
            Primitive::Number(n) => n.to_string(),
            Primitive::String(s) => s.clone(),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Primitive::Null => Value::Null,
            Primitive::Bool(b) => Value::Bool(*b),
            Primitive::Number(n) => Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
            Primitive::String(s) => Value::String(s.clone()),
        }
    }
}

/// 规范化后的 AST 节点
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedNode {
    NamedObject {
        name: Option<String>,
        fields: Vec<(String, NormalizedNode)>,
        span: Option<Span>,
    },
    Array {
        items: Vec<NormalizedNode>,
    },
    Primitive {
        value: Primitive,
    },
}

/// 从父节点走到子节点的一步：字段序号或数组下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(usize),
    Item(usize),
}

/// 从根出发的节点路径
pub type NodePath = Vec<PathSegment>;

/// `to_value` 中保存节点名的保留键
pub const NAME_KEY: &str = "$name";
/// `to_value` 中保存区间的保留键
pub const SPAN_KEY: &str = "$span";

impl NormalizedNode {
    pub fn null() -> Self {
        NormalizedNode::Primitive { value: Primitive::Null }
    }

    pub fn string(s: impl Into<String>) -> Self {
        NormalizedNode::Primitive { value: Primitive::String(s.into()) }
    }

    pub fn number(n: f64) -> Self {
        NormalizedNode::Primitive { value: Primitive::Number(n) }
    }

    pub fn boolean(b: bool) -> Self {
        NormalizedNode::Primitive { value: Primitive::Bool(b) }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NormalizedNode::NamedObject { .. } => NodeKind::Object,
            NormalizedNode::Array { .. } => NodeKind::Array,
            NormalizedNode::Primitive { value } => value.kind(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            NormalizedNode::NamedObject { name, .. } => name.as_deref(),
            NormalizedNode::Array { .. } | NormalizedNode::Primitive { .. } => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            NormalizedNode::NamedObject { span, .. } => *span,
            NormalizedNode::Array { .. } | NormalizedNode::Primitive { .. } => None,
        }
    }

    /// 按字段名查找（仅对象）
    pub fn field(&self, key: &str) -> Option<&NormalizedNode> {
        match self {
            NormalizedNode::NamedObject { fields, .. } => {
                fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            NormalizedNode::Array { .. } | NormalizedNode::Primitive { .. } => None,
        }
    }

    /// 可展开：对象，或非空数组
    pub fn is_expandable(&self) -> bool {
        match self {
            NormalizedNode::NamedObject { .. } => true,
            NormalizedNode::Array { items } => !items.is_empty(),
            NormalizedNode::Primitive { .. } => false,
        }
    }

    pub fn child(&self, segment: PathSegment) -> Option<&NormalizedNode> {
        match (self, segment) {
            (NormalizedNode::NamedObject { fields, .. }, PathSegment::Field(i)) => {
                fields.get(i).map(|(_, v)| v)
            }
            (NormalizedNode::Array { items }, PathSegment::Item(i)) => items.get(i),
            _ => None,
        }
    }

    /// 沿路径定位子节点
    pub fn resolve(&self, path: &[PathSegment]) -> Option<&NormalizedNode> {
        path.iter().try_fold(self, |node, seg| node.child(*seg))
    }

    /// 路径对应的 JSONPath（与 `to_value` 的结构一致）
    pub fn json_path(&self, path: &[PathSegment]) -> Option<String> {
        let mut out = String::from("$");
        let mut node = self;
        for seg in path {
            match (node, *seg) {
                (NormalizedNode::NamedObject { fields, .. }, PathSegment::Field(i)) => {
                    let (key, child) = fields.get(i)?;
                    // JSONPath 字段含特殊字符时使用 bracket-notation
                    if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        out.push('.');
                        out.push_str(key);
                    } else {
                        let escaped = key.replace('\\', "\\\\").replace('\'', "\\'");
                        out.push_str(&format!("['{}']", escaped));
                    }
                    node = child;
                }
                (NormalizedNode::Array { items }, PathSegment::Item(i)) => {
                    node = items.get(i)?;
                    out.push_str(&format!("[{}]", i));
                }
                _ => return None,
            }
        }
        Some(out)
    }

    /// 子树节点总数（含自身）
    pub fn node_count(&self) -> usize {
        1 + match self {
            NormalizedNode::NamedObject { fields, .. } => {
                fields.iter().map(|(_, v)| v.node_count()).sum()
            }
            NormalizedNode::Array { items } => items.iter().map(NormalizedNode::node_count).sum(),
            NormalizedNode::Primitive { .. } => 0,
        }
    }

    /// 转回展示用 JSON；节点名与区间放在 `$name` / `$span` 保留键下
    pub fn to_value(&self) -> Value {
        match self {
            NormalizedNode::NamedObject { name, fields, span } => {
                let mut map = Map::new();
                if let Some(name) = name {
                    map.insert(NAME_KEY.to_string(), Value::String(name.clone()));
                }
                if let Some(span) = span {
                    map.insert(SPAN_KEY.to_string(), serde_json::json!([span.start, span.end]));
                }
                for (key, value) in fields {
                    map.insert(key.clone(), value.to_value());
                }
                Value::Object(map)
            }
            NormalizedNode::Array { items } => {
                Value::Array(items.iter().map(NormalizedNode::to_value).collect())
            }
            NormalizedNode::Primitive { value } => value.to_value(),
        }
    }
}
