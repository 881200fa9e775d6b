//! 查看器配置：轮询/防抖时长、主题、编辑器字符单位

use serde::Deserialize;

use crate::model::data_core::AppError;
use crate::model::offset_map::{SpanConvention, TextUnit};
use crate::view::theme::DEFAULT_THEME;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_debounce() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewerConfig {
    /// 轮询编辑器文本的间隔（毫秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    /// 防抖等待（毫秒）
    #[serde(default = "default_debounce")]
    pub debounce: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub text_unit: TextUnit,
    #[serde(default)]
    pub span_convention: SpanConvention,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL_MS,
            debounce: DEFAULT_DEBOUNCE_MS,
            theme: default_theme(),
            text_unit: TextUnit::default(),
            span_convention: SpanConvention::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, AppError> {
        let config: ViewerConfig = serde_json::from_str(s)?;
        if config.poll_interval == 0 {
            return Err(AppError::State("poll_interval 必须大于 0".into()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.poll_interval, 100);
        assert_eq!(config.debounce, 50);
        assert_eq!(config.theme, "tokyo-night");
        assert_eq!(config.text_unit, TextUnit::Scalar);
        assert_eq!(config.span_convention, SpanConvention::HalfOpen);
    }

    #[test]
    fn test_overrides() {
        let config = ViewerConfig::from_json_str(
            r#"{"debounce": 10, "theme": "barf", "text_unit": "utf16", "span_convention": "inclusive"}"#,
        )
        .unwrap();
        assert_eq!(config.debounce, 10);
        assert_eq!(config.poll_interval, 100);
        assert_eq!(config.theme, "barf");
        assert_eq!(config.text_unit, TextUnit::Utf16);
        assert_eq!(config.span_convention, SpanConvention::Inclusive);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(ViewerConfig::from_json_str(r#"{"poll_interval": 0}"#).is_err(), "轮询间隔为 0 应报错");
        assert!(ViewerConfig::from_json_str(r#"{"colour": "red"}"#).is_err(), "未知字段应报错");
        assert!(ViewerConfig::from_json_str("not json").is_err());
    }
}
