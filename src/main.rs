use anyhow::{Context, Result};
use influxql_builder::config::QuerySpec;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = r#"输入一行JSON查询描述，或以下命令:
  :load <path>   编译JSON文件中的查询
  :help          显示帮助
  :quit          退出

示例:
  {"fields": [{"function": "mean", "field": "value"}], "from": "cpu",
   "conditions": [{"expr": "region", "values": ["uswest"]}],
   "group_by": [{"time": "10m"}], "fill": 0}"#;

/// 编译文件中的查询
fn compile_file(path: &str) -> Result<String> {
    let spec = QuerySpec::from_json_file(path).with_context(|| format!("加载 {} 失败", path))?;
    let statement = spec.compile().with_context(|| format!("编译 {} 失败", path))?;
    Ok(statement)
}

/// 处理REPL中的一行输入，返回 false 表示退出
fn handle_line(line: &str) -> bool {
    match line {
        ":quit" | ":q" | ":exit" => return false,
        ":help" | ":h" => println!("{}", HELP),
        _ if line.starts_with(":load") => {
            let path = line.trim_start_matches(":load").trim();
            if path.is_empty() {
                println!("用法: :load <path>");
            } else {
                match compile_file(path) {
                    Ok(statement) => println!("{}", statement),
                    Err(e) => println!("✗ {:#}", e),
                }
            }
        }
        _ => match QuerySpec::from_json_str(line).and_then(|spec| spec.compile()) {
            Ok(statement) => println!("{}", statement),
            Err(e) => println!("✗ {}", e),
        },
    }
    true
}

fn run_repl() -> Result<()> {
    println!("--- InfluxQL Builder: JSON 到 InfluxQL ---");
    println!("输入 :help 查看帮助");

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("influxql> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;
                if !handle_line(line) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "influxql_builder=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match std::env::args().nth(1) {
        Some(path) => {
            println!("{}", compile_file(&path)?);
            Ok(())
        }
        None => run_repl(),
    }
}
