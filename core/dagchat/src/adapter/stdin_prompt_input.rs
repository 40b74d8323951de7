//! 標準入力から 1 行読む PromptInput 実装
//!
//! プロンプト文字列は stderr に出す（stdout は応答ストリーム専用）。

use crate::ports::outbound::PromptInput;
use common::error::Error;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "Say something... ";

/// 標準入出力で対話するプロンプト入力
pub struct StdinPromptInput;

impl StdinPromptInput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdinPromptInput {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptInput for StdinPromptInput {
    fn read_line(&self) -> Result<Option<String>, Error> {
        eprint!("{}", PROMPT);
        let _ = io::stderr().flush();

        let stdin = io::stdin();
        let mut line = String::new();
        let n = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| Error::io_msg(e.to_string()))?;
        if n == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// 非対話用: 常に EOF を返す（CI 等でプロンプトを出さない）
pub struct NonInteractivePromptInput;

impl NonInteractivePromptInput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NonInteractivePromptInput {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptInput for NonInteractivePromptInput {
    fn read_line(&self) -> Result<Option<String>, Error> {
        Ok(None)
    }
}
