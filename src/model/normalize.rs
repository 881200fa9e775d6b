//! AST 规范化：把解析器输出的原始 JSON 转成展示用的 `NormalizedNode`
//!
//! 按顺序检查的形状：
//! 1. 字符串类型转换（"true"/"false"/数字样式的字符串）
//! 2. 数组逐项转换，保持嵌套形状
//! 3. 区间包装 `{start, end, data}` 解包并附加 span
//! 4. 单键包装 `{"snake_name": {...}}` 展平为带名称的对象
//! 5. 其余对象逐键递归，保持键顺序

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::node::{NormalizedNode, Primitive, Span};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("无法识别的值类型 {kind}（位置: {path}）")]
    UnknownValueKind { path: String, kind: &'static str },
    #[error("非法区间 [{start}, {end})（位置: {path}，源码字节数: {limit:?}）")]
    InvalidSpan {
        path: String,
        start: usize,
        end: usize,
        limit: Option<usize>,
    },
}

/// 规范化器；可选地携带源码字节长度用于校验 span 上界
#[derive(Debug, Clone, Copy, Default)]
pub struct AstNormalizer {
    source_len: Option<usize>,
}

/// 便捷入口：不校验 span 上界
pub fn normalize(raw: &Value) -> Result<NormalizedNode, NormalizeError> {
    AstNormalizer::new().normalize(raw)
}

// convert 'variable_declarator' to 'VariableDeclarator'
pub fn snake_to_pascal(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// "true"/"false" 转布尔，数字样式的字符串转数字，其余保持原样
pub fn coerce_string(s: &str) -> Primitive {
    match s {
        "true" => Primitive::Bool(true),
        "false" => Primitive::Bool(false),
        _ => match s.parse::<f64>() {
            // inf / nan 之类的单词不算数字
            Ok(n) if n.is_finite() => Primitive::Number(n),
            _ => Primitive::String(s.to_string()),
        },
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// 空值哨兵：`data` 为 null，或 `{"none": <真值>}`
fn is_null_sentinel(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Object(map) => map.get("none").map_or(false, is_truthy),
        _ => false,
    }
}

fn child_path(path: &str, key: &str) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!("{}.{}", path, key)
    } else {
        format!("{}['{}']", path, key.replace('\'', "\\'"))
    }
}

/// `{start, end, data}` 形式的区间包装
struct SpanWrapper<'a> {
    start: usize,
    end: usize,
    data: &'a Value,
}

impl<'a> SpanWrapper<'a> {
    fn detect(map: &'a Map<String, Value>) -> Option<Self> {
        let start = map.get("start")?.as_u64()?;
        let end = map.get("end")?.as_u64()?;
        let data = map.get("data")?;
        Some(Self {
            start: usize::try_from(start).ok()?,
            end: usize::try_from(end).ok()?,
            data,
        })
    }
}

impl AstNormalizer {
    pub fn new() -> Self {
        Self { source_len: None }
    }

    /// 携带源码字节长度，span 终点超出时报错
    pub fn with_source_len(source_len: usize) -> Self {
        Self {
            source_len: Some(source_len),
        }
    }

    pub fn normalize(&self, raw: &Value) -> Result<NormalizedNode, NormalizeError> {
        self.visit(raw, "$")
    }

    fn visit(&self, raw: &Value, path: &str) -> Result<NormalizedNode, NormalizeError> {
        match raw {
            Value::Null => Ok(NormalizedNode::null()),
            Value::Bool(b) => Ok(NormalizedNode::boolean(*b)),
            Value::Number(n) => n.as_f64().map(NormalizedNode::number).ok_or_else(|| {
                NormalizeError::UnknownValueKind {
                    path: path.to_string(),
                    kind: "number",
                }
            }),
            Value::String(s) => Ok(NormalizedNode::Primitive {
                value: coerce_string(s),
            }),
            // 长度为 1 且唯一元素为数组时也不折叠（优先级/运算符列表依赖这种形状）
            Value::Array(items) => {
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| self.visit(item, &format!("{}[{}]", path, idx)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(NormalizedNode::Array { items })
            }
            Value::Object(map) => self.visit_object(map, path),
        }
    }

    fn visit_object(
        &self,
        map: &Map<String, Value>,
        path: &str,
    ) -> Result<NormalizedNode, NormalizeError> {
        if let Some(wrapper) = SpanWrapper::detect(map) {
            return self.unwrap_span(wrapper, path);
        }

        if map.len() == 1 {
            if let Some((key, Value::Object(inner))) = map.iter().next() {
                if let Some(named) = self.flatten(key, inner, path)? {
                    return Ok(named);
                }
            }
        }

        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            let field_path = child_path(path, key);
            let node = match self.keyed_span_child(key, value, &field_path)? {
                Some(node) => node,
                None => self.visit(value, &field_path)?,
            };
            fields.push((key.clone(), node));
        }

        Ok(NormalizedNode::NamedObject {
            name: None,
            fields,
            span: None,
        })
    }

    fn unwrap_span(
        &self,
        wrapper: SpanWrapper<'_>,
        path: &str,
    ) -> Result<NormalizedNode, NormalizeError> {
        if is_null_sentinel(wrapper.data) {
            return Ok(NormalizedNode::null());
        }
        let span = self.check_span(wrapper.start, wrapper.end, path)?;
        let node = self.visit(wrapper.data, &format!("{}.data", path))?;
        Ok(attach_span(node, span))
    }

    /// 单键对象：值规范化为对象时，以键名（PascalCase）作为节点名
    fn flatten(
        &self,
        key: &str,
        inner: &Map<String, Value>,
        path: &str,
    ) -> Result<Option<NormalizedNode>, NormalizeError> {
        let name = snake_to_pascal(key);
        let node = self.visit_object(inner, &child_path(path, key))?;
        Ok(match node {
            NormalizedNode::NamedObject { fields, span, .. } => Some(NormalizedNode::NamedObject {
                name: Some(name),
                fields,
                span,
            }),
            NormalizedNode::Primitive {
                value: Primitive::Null,
            } => Some(NormalizedNode::NamedObject {
                name: Some(name),
                fields: Vec::new(),
                span: None,
            }),
            // 数组或非空叶子退回普通对象处理
            NormalizedNode::Array { .. } | NormalizedNode::Primitive { .. } => None,
        })
    }

    /// `"key": {start, end, data: {"key": ...}}`：区间挂到子节点上
    fn keyed_span_child(
        &self,
        key: &str,
        value: &Value,
        path: &str,
    ) -> Result<Option<NormalizedNode>, NormalizeError> {
        let Some(obj) = value.as_object() else {
            return Ok(None);
        };
        if obj.len() != 3 {
            return Ok(None);
        }
        let Some(wrapper) = SpanWrapper::detect(obj) else {
            return Ok(None);
        };
        let Some(inner) = wrapper
            .data
            .as_object()
            .and_then(|data| data.get(key))
            .filter(|inner| is_truthy(inner))
        else {
            return Ok(None);
        };

        let span = self.check_span(wrapper.start, wrapper.end, path)?;
        let node = self.visit(inner, &child_path(&format!("{}.data", path), key))?;
        Ok(Some(attach_span(node, span)))
    }

    fn check_span(&self, start: usize, end: usize, path: &str) -> Result<Span, NormalizeError> {
        let out_of_bounds = self.source_len.map_or(false, |limit| end > limit);
        if start > end || out_of_bounds {
            return Err(NormalizeError::InvalidSpan {
                path: path.to_string(),
                start,
                end,
                limit: self.source_len,
            });
        }
        Ok(Span::new(start, end))
    }
}

/// 只有对象节点携带 span；数组与叶子上的区间被丢弃
fn attach_span(node: NormalizedNode, span: Span) -> NormalizedNode {
    match node {
        NormalizedNode::NamedObject { name, fields, .. } => NormalizedNode::NamedObject {
            name,
            fields,
            span: Some(span),
        },
        other @ (NormalizedNode::Array { .. } | NormalizedNode::Primitive { .. }) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::NodeKind;
    use serde_json::json;

    #[test]
    fn test_named_wrapper_flattening() {
        let raw = json!({"variable_declarator": {"id": "x", "init": "1"}});
        let node = normalize(&raw).unwrap();

        assert_eq!(node.name(), Some("VariableDeclarator"));
        assert_eq!(node.field("id"), Some(&NormalizedNode::string("x")));
        assert_eq!(node.field("init"), Some(&NormalizedNode::number(1.0)));
    }

    #[test]
    fn test_primitive_coercion() {
        assert_eq!(normalize(&json!("true")).unwrap(), NormalizedNode::boolean(true));
        assert_eq!(normalize(&json!("false")).unwrap(), NormalizedNode::boolean(false));
        assert_eq!(normalize(&json!("42")).unwrap(), NormalizedNode::number(42.0));
        assert_eq!(normalize(&json!("foo")).unwrap(), NormalizedNode::string("foo"));
        assert_eq!(normalize(&json!(null)).unwrap(), NormalizedNode::null());
        assert_eq!(normalize(&json!(7)).unwrap(), NormalizedNode::number(7.0));
        assert_eq!(normalize(&json!(false)).unwrap(), NormalizedNode::boolean(false));
    }

    #[test]
    fn test_non_numeric_words_stay_strings() {
        for s in ["inf", "NaN", "infinity", "", "1_000", "0x10"] {
            assert_eq!(
                normalize(&json!(s)).unwrap(),
                NormalizedNode::string(s),
                "{} 应该保持字符串",
                s
            );
        }
        assert_eq!(normalize(&json!("-2.5e1")).unwrap(), NormalizedNode::number(-25.0));
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(snake_to_pascal("variable_declarator"), "VariableDeclarator");
        assert_eq!(snake_to_pascal("program"), "Program");
        assert_eq!(snake_to_pascal("__private_name_"), "PrivateName");
    }

    #[test]
    fn test_span_extraction() {
        let raw = json!({
            "start": 4,
            "end": 5,
            "data": {"identifier": {"name": "x"}}
        });
        let node = normalize(&raw).unwrap();

        assert_eq!(node.name(), Some("Identifier"));
        assert_eq!(node.span(), Some(Span::new(4, 5)));
        assert_eq!(node.field("name"), Some(&NormalizedNode::string("x")));
        assert!(node.field("start").is_none(), "包装层应该被丢弃");
    }

    #[test]
    fn test_null_sentinel_becomes_null() {
        let raw = json!({"start": 0, "end": 0, "data": {"none": true}});
        assert_eq!(normalize(&raw).unwrap(), NormalizedNode::null());

        let raw = json!({"start": 0, "end": 0, "data": null});
        assert_eq!(normalize(&raw).unwrap(), NormalizedNode::null());

        // none 为假值时不是哨兵
        let raw = json!({"start": 0, "end": 1, "data": {"none": false, "x": "1"}});
        let node = normalize(&raw).unwrap();
        assert_eq!(node.kind(), NodeKind::Object);
        assert_eq!(node.span(), Some(Span::new(0, 1)));
    }

    #[test]
    fn test_nested_arrays_are_not_collapsed() {
        let raw = json!([["+", "-"]]);
        let node = normalize(&raw).unwrap();
        assert_eq!(
            node,
            NormalizedNode::Array {
                items: vec![NormalizedNode::Array {
                    items: vec![NormalizedNode::string("+"), NormalizedNode::string("-")]
                }]
            }
        );
    }

    #[test]
    fn test_generic_object_keeps_key_order() {
        let raw = json!({"zeta": 1, "alpha": [], "mid": {"a": "b", "c": "d"}});
        let node = normalize(&raw).unwrap();
        match &node {
            NormalizedNode::NamedObject { name, fields, span } => {
                assert!(name.is_none());
                assert!(span.is_none());
                let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, ["zeta", "alpha", "mid"]);
            }
            other => panic!("应该是对象: {:?}", other),
        }
    }

    #[test]
    fn test_keyed_span_child_gets_span() {
        let raw = json!({
            "kind": "let",
            "declarator": {
                "start": 4,
                "end": 9,
                "data": {"declarator": {"id": "x"}}
            }
        });
        let node = normalize(&raw).unwrap();

        assert_eq!(node.span(), None, "区间不应挂到父节点上");
        let child = node.field("declarator").unwrap();
        assert_eq!(child.span(), Some(Span::new(4, 9)));
        assert_eq!(child.field("id"), Some(&NormalizedNode::string("x")));
    }

    #[test]
    fn test_single_key_with_null_sentinel_inner() {
        let raw = json!({"empty_statement": {"start": 0, "end": 1, "data": {"none": 1}}});
        let node = normalize(&raw).unwrap();
        assert_eq!(
            node,
            NormalizedNode::NamedObject {
                name: Some("EmptyStatement".into()),
                fields: vec![],
                span: None,
            }
        );
    }

    #[test]
    fn test_single_key_with_array_value_stays_generic() {
        let raw = json!({"body": []});
        let node = normalize(&raw).unwrap();
        assert_eq!(node.name(), None);
        assert_eq!(node.field("body"), Some(&NormalizedNode::Array { items: vec![] }));
    }

    #[test]
    fn test_empty_object_is_kept() {
        let node = normalize(&json!({})).unwrap();
        assert_eq!(
            node,
            NormalizedNode::NamedObject {
                name: None,
                fields: vec![],
                span: None
            }
        );
    }

    #[test]
    fn test_invalid_spans_are_rejected() {
        let reversed = json!({"start": 5, "end": 4, "data": {"x": "1"}});
        assert!(matches!(
            normalize(&reversed),
            Err(NormalizeError::InvalidSpan { start: 5, end: 4, .. })
        ));

        let too_long = json!({"program": {"start": 0, "end": 11, "data": {"body": []}}});
        let err = AstNormalizer::with_source_len(10).normalize(&too_long).unwrap_err();
        match err {
            NormalizeError::InvalidSpan { path, limit, .. } => {
                assert_eq!(path, "$.program");
                assert_eq!(limit, Some(10));
            }
            other => panic!("错误类型不符: {:?}", other),
        }

        assert!(AstNormalizer::with_source_len(11).normalize(&too_long).is_ok());
    }

    #[test]
    fn test_negative_bounds_are_not_span_wrappers() {
        let raw = json!({"start": -1, "end": 2, "data": "x"});
        let node = normalize(&raw).unwrap();
        assert_eq!(node.span(), None);
        assert_eq!(node.field("start"), Some(&NormalizedNode::number(-1.0)));
    }
}
