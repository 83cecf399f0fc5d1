//! # 商品图片归一化工具 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与结果输出。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::process::ExitCode;

use clap::Parser;
use normalize_images::batch::{self, BatchRunner, CatalogOutcome};
use normalize_images::cli::Cli;
use normalize_images::error::AppError;
use normalize_images::prompt::Prompter;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("❌ 运行中止: {err}");
            eprintln!("✗ {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let dir = cli.working_dir();
    let mut settings = cli.resolve_settings()?;

    println!("{}", "=".repeat(60));
    println!("商品图片归一化（模式: {}）", cli.mode.as_str());
    println!("{}", "=".repeat(60));

    if let Some(catalog) = batch::locate_catalog(&dir, &settings)? {
        println!("✓ 找到目录表: {}", catalog.display());
    }

    let mut prompter = cli.interactive.then(Prompter::stdio);
    if let Some(prompter) = prompter.as_mut() {
        prompter.configure(&mut settings, cli.mode)?;
    }

    println!();
    for line in settings.describe() {
        println!("✓ {}", line);
    }

    if let Some(prompter) = prompter.as_mut() {
        if !cli.yes && !prompter.confirm()? {
            println!("已取消处理。");
            return Ok(());
        }
    }

    println!("{}", "-".repeat(60));
    let runner = BatchRunner::new(settings)?;
    let summary = runner.run(&dir)?;
    println!("{}", "-".repeat(60));

    println!("✓ 图片处理: {}/{}", summary.succeeded, summary.total);
    for failure in &summary.failures {
        println!("  ✗ {}: {}", failure.file_name, failure.reason);
    }
    match &summary.catalog {
        CatalogOutcome::Patched(report) => {
            println!("✓ 目录表: {} 条 URL 已更新", report.updated_rows);
        }
        CatalogOutcome::Failed(reason) => println!("⚠ 目录表未更新: {}", reason),
        CatalogOutcome::Skipped => {}
    }

    Ok(())
}
