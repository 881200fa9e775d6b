//! IO helper: 读取源码、录制的 AST 与配置文件

use std::{fs::File, io::BufReader, path::Path};

use serde_json::Value;

use crate::model::config::ViewerConfig;
use crate::model::data_core::AppError;

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path) -> Result<Value, AppError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Value = serde_json::from_reader(rdr)?;
    Ok(v)
}

/// 读取源码文本（必须是 UTF-8）
pub fn read_source_file(p: &Path) -> Result<String, AppError> {
    Ok(std::fs::read_to_string(p)?)
}

/// 读取查看器配置
pub fn read_config_file(p: &Path) -> Result<ViewerConfig, AppError> {
    let text = std::fs::read_to_string(p)?;
    ViewerConfig::from_json_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(content).expect("写入临时文件失败");
        file
    }

    #[test]
    fn test_read_json_keeps_key_order() {
        let file = temp_file(br#"{"b": 1, "a": {"start": 0, "end": 1, "data": null}}"#);
        let value = read_json_file(file.path()).expect("读取JSON应该成功");
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a"], "键顺序应保持原样");
    }

    #[test]
    fn test_read_errors() {
        let file = temp_file(b"{broken");
        assert!(matches!(read_json_file(file.path()), Err(AppError::Json(_))));

        let file = temp_file(&[0xff, 0xfe, 0x00]);
        assert!(matches!(read_source_file(file.path()), Err(AppError::Io(_))), "非 UTF-8 源码应报错");

        assert!(matches!(
            read_json_file(Path::new("/nonexistent/ast.json")),
            Err(AppError::Io(_))
        ));
    }

    #[test]
    fn test_read_source_and_config() {
        let file = temp_file("let € = 1;".as_bytes());
        assert_eq!(read_source_file(file.path()).unwrap(), "let € = 1;");

        let file = temp_file(br#"{"theme": "espresso"}"#);
        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.theme, "espresso");
    }
}
