//! 性能基准测试模块
//!
//! 生成带区间的大型合成 AST，测量 规范化 / 偏移表构建 / 渲染 / 子树提取 的耗时

use std::time::Instant;

use serde_json::{json, Value};
use tracing::info;

use crate::model::data_core::AppState;
use crate::model::node::NormalizedNode;
use crate::model::normalize::AstNormalizer;
use crate::model::offset_map::OffsetTable;
use crate::view::tree_view::TreeView;

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 合成的源码及其 AST
pub struct SyntheticProgram {
    pub source: String,
    pub ast: Value,
}

/// 生成 `width` 条声明语句，每条的初始值是深度为 `depth` 的二元表达式
pub fn generate_large_ast(depth: usize, width: usize) -> SyntheticProgram {
    fn nested_expression(depth: usize) -> Value {
        if depth == 0 {
            return json!("1");
        }
        json!({
            "binary_expression": {
                "operator": "+",
                "left": nested_expression(depth - 1),
                "right": {"number_literal": {"value": "1", "raw": "1"}}
            }
        })
    }

    let mut source = String::new();
    let mut body = Vec::with_capacity(width);
    for i in 0..width {
        let stmt_start = source.len();
        source.push_str("let ");
        let id_start = source.len();
        source.push_str(&format!("变量_{}", i));
        let id_end = source.len();
        source.push_str(" = ");
        source.push_str(&vec!["1"; depth + 1].join(" + "));
        let decl_end = source.len();
        source.push_str(";\n");
        let stmt_end = source.len();

        body.push(json!({
            "start": stmt_start,
            "end": stmt_end,
            "data": {"variable_declaration": {
                "kind": "let",
                "declarators": [{
                    "start": id_start,
                    "end": decl_end,
                    "data": {"variable_declarator": {
                        "id": {"start": id_start, "end": id_end, "data": {"identifier": {"name": format!("变量_{}", i)}}},
                        "init": nested_expression(depth)
                    }}
                }]
            }}
        }));
    }

    let ast = json!({
        "start": 0,
        "end": source.len(),
        "data": {"module": {"body": body}}
    });
    SyntheticProgram { source, ast }
}

/// 测试规范化性能
pub fn benchmark_normalize(ast: &Value, source_len: usize) -> (PerformanceResult, Option<NormalizedNode>) {
    let start = Instant::now();
    let result = AstNormalizer::with_source_len(source_len).normalize(ast);
    let duration = start.elapsed().as_millis();

    match result {
        Ok(tree) => (
            PerformanceResult::new("AST规范化", duration, true, &format!("规范化了 {} 个节点", tree.node_count())),
            Some(tree),
        ),
        Err(e) => (
            PerformanceResult::new("AST规范化", duration, false, &format!("规范化失败: {}", e)),
            None,
        ),
    }
}

/// 测试偏移表构建性能
pub fn benchmark_offset_table(source: &str) -> PerformanceResult {
    let start = Instant::now();
    let table = OffsetTable::build(source);
    let duration = start.elapsed();

    PerformanceResult::new(
        "偏移表构建",
        duration.as_millis(),
        table.byte_len() == source.len(),
        &format!("{} 字节 → {} 字符", table.byte_len(), table.char_len()),
    )
}

/// 测试完整渲染性能
pub fn benchmark_render(tree: NormalizedNode) -> (PerformanceResult, TreeView) {
    let start = Instant::now();
    let view = TreeView::render(tree);
    let duration = start.elapsed();

    let details = format!("{} 个视图节点，{} 个部件", view.view_count(), view.widgets().len());
    (
        PerformanceResult::new("树视图渲染", duration.as_millis(), !view.widgets().is_empty(), &details),
        view,
    )
}

/// 测试节点提取性能
pub fn benchmark_node_extraction(app_state: &AppState, paths: &[&str]) -> Vec<PerformanceResult> {
    let mut results = Vec::new();

    for path in paths {
        let start = Instant::now();
        let extract_result = app_state.extract_subtree_pretty(path);
        let duration = start.elapsed();

        match extract_result {
            Ok(json_str) => {
                results.push(PerformanceResult::new(
                    &format!("节点提取: {}", path),
                    duration.as_millis(),
                    true,
                    &format!("提取了 {} 字符", json_str.len()),
                ));
            }
            Err(e) => {
                results.push(PerformanceResult::new(
                    &format!("节点提取: {}", path),
                    duration.as_millis(),
                    false,
                    &format!("提取失败: {}", e),
                ));
            }
        }
    }

    results
}

/// 运行综合性能测试
pub fn run_performance_suite() -> Vec<PerformanceResult> {
    let mut results = Vec::new();

    // 测试不同规模的数据
    let test_cases = [
        (2, 10),   // 小型：深度2，10条语句
        (4, 100),  // 中型：深度4，100条语句
        (6, 1000), // 大型：深度6，1000条语句
    ];

    for (depth, width) in test_cases {
        info!("测试规模：深度{}，语句数{}", depth, width);

        let start = Instant::now();
        let program = generate_large_ast(depth, width);
        results.push(PerformanceResult::new(
            &format!("数据生成({}x{})", depth, width),
            start.elapsed().as_millis(),
            true,
            &format!("源码 {} 字节", program.source.len()),
        ));

        results.push(benchmark_offset_table(&program.source));

        let (normalize_result, tree) = benchmark_normalize(&program.ast, program.source.len());
        results.push(normalize_result);
        let Some(tree) = tree else {
            continue;
        };

        let (render_result, view) = benchmark_render(tree);
        results.push(render_result);

        let mut app_state = AppState::default();
        let offsets = OffsetTable::build(&program.source);
        app_state.commit(program.source, offsets, view);

        let test_paths = ["$", "$.body[0]", "$.body[0].declarators[0].init"];
        results.extend(benchmark_node_extraction(&app_state, &test_paths));
    }

    results
}
