//! 交互问答模块
//!
//! # 设计思路
//!
//! 保留历史脚本的问答体验（留白、备份、边框、缓存扰动、最终确认），
//! 但与流水线解耦：问答只负责把答案写进 `BatchSettings`。
//! 输入输出抽象为 `BufRead` / `Write`，测试时可直接喂字符串。
//!
//! # 实现思路
//!
//! - 空输入采用默认值；输入流结束（EOF）同样视为空输入，避免死循环。
//! - 留白必须是非负整数，否则重新提问。
//! - 是 / 否问题只识别明确的肯定或否定词，其余按默认值处理。
//! - 问题集合随模式变化：原地覆盖的模式问备份，目录表模式问边框与缓存扰动。

use std::io::{self, BufRead, Write};

use crate::settings::{BatchSettings, PipelineMode};

const YES_WORDS: [&str; 4] = ["o", "oui", "y", "yes"];
const NO_WORDS: [&str; 3] = ["n", "non", "no"];

/// 基于任意输入输出流的问答器。
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// 绑定标准输入输出。
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// 询问留白像素数，直到得到合法的非负整数。
    pub fn ask_padding(&mut self, default: u32) -> io::Result<u32> {
        loop {
            let answer = self.ask(&format!("留白像素（默认: {}）: ", default))?;
            if answer.is_empty() {
                return Ok(default);
            }

            match answer.parse::<i64>() {
                Ok(value) if value >= 0 => match u32::try_from(value) {
                    Ok(padding) => return Ok(padding),
                    Err(_) => writeln!(self.output, "⚠ 留白过大，请重新输入。")?,
                },
                Ok(_) => writeln!(self.output, "⚠ 留白必须是非负整数。")?,
                Err(_) => writeln!(self.output, "⚠ 请输入有效的数字。")?,
            }
        }
    }

    /// 询问是 / 否，空输入或无法识别时返回 `default`。
    pub fn ask_yes_no(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "O/n" } else { "o/N" };
        let answer = self.ask(&format!("{}（{}）: ", question, hint))?.to_lowercase();

        if YES_WORDS.contains(&answer.as_str()) {
            return Ok(true);
        }
        if NO_WORDS.contains(&answer.as_str()) {
            return Ok(false);
        }
        Ok(default)
    }

    /// 按模式询问对应开关并写回配置。
    pub fn configure(
        &mut self,
        settings: &mut BatchSettings,
        mode: PipelineMode,
    ) -> io::Result<()> {
        settings.normalize.padding = self.ask_padding(settings.normalize.padding)?;

        match mode {
            PipelineMode::Square | PipelineMode::Cream => {
                settings.create_backup =
                    self.ask_yes_no("是否备份原图?", settings.create_backup)?;
            }
            PipelineMode::Catalog => {
                settings.normalize.add_border =
                    self.ask_yes_no("是否添加防删除边框?", settings.normalize.add_border)?;
                settings.normalize.add_cache_buster = self
                    .ask_yes_no("是否添加缓存扰动像素?", settings.normalize.add_cache_buster)?;
            }
        }
        Ok(())
    }

    /// 最终确认，默认继续。
    pub fn confirm(&mut self) -> io::Result<bool> {
        self.ask_yes_no("继续处理?", true)
    }
}
