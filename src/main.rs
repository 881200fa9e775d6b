//! 程序入口：初始化日志，回放一份录制的 AST 并把树视图打印到标准输出
//!
//! 用法: ast_tree_view <源码文件> <AST JSON 文件> [配置文件]
//!       ast_tree_view --bench

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing_subscriber::fmt::SubscriberBuilder;

use ast_tree_view::model::config::ViewerConfig;
use ast_tree_view::model::performance::run_performance_suite;
use ast_tree_view::parser::ReplayParser;
use ast_tree_view::utils::fs::{read_config_file, read_json_file, read_source_file};
use ast_tree_view::view::text::render_themed;
use ast_tree_view::view::theme::{Theme, TokenClass};
use ast_tree_view::view::tree_view::TreeView;
use ast_tree_view::vm::controller::{Controller, RenderHost};
use ast_tree_view::vm::editor::MemoryEditor;
use ast_tree_view::AppError;

/// 把视图按主题着色后打印到标准输出
struct StdoutHost;

impl RenderHost for StdoutHost {
    fn present(&mut self, view: &TreeView, theme: &Theme) -> Result<(), AppError> {
        println!(
            "# 主题 {}（背景 {}）",
            theme.name,
            theme.style(TokenClass::Background).color
        );
        print!("{}", render_themed(view, theme));
        Ok(())
    }
}

fn bench() {
    for result in run_performance_suite() {
        let mark = if result.success { "✓" } else { "✗" };
        println!("{} {:<32} {:>6}ms  {}", mark, result.operation, result.duration_ms, result.details);
    }
}

fn main() -> Result<()> {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("--bench") {
        bench();
        return Ok(());
    }
    let (source_path, ast_path) = match args.as_slice() {
        [source, ast, ..] => (PathBuf::from(source), PathBuf::from(ast)),
        _ => bail!("用法: ast_tree_view <源码文件> <AST JSON 文件> [配置文件] | --bench"),
    };

    let config = match args.get(2) {
        Some(path) => read_config_file(&PathBuf::from(path))
            .with_context(|| format!("读取配置失败: {}", path))?,
        None => ViewerConfig::default(),
    };
    let source = read_source_file(&source_path)
        .with_context(|| format!("读取源码失败: {}", source_path.display()))?;
    let ast = read_json_file(&ast_path)
        .with_context(|| format!("读取 AST 失败: {}", ast_path.display()))?;

    let debounce = config.debounce;
    let mut controller = Controller::new(config, ReplayParser::new(ast), MemoryEditor::new(source))?;
    controller.attach_host(Box::new(StdoutHost));

    controller.tick(0);
    if !controller.tick(debounce) {
        bail!("{}", controller.status_message());
    }
    tracing::info!("{}", controller.status_message());
    Ok(())
}
