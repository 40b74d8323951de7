//! 冗長モード用ロガー（-v/--verbose）
//!
//! 各レコードの要点を stderr に 1 行で出しつつ、内側のロガーへ委譲する。

use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

/// stderr への要約出力を内側のロガーに重ねる実装
pub struct VerboseLog {
    inner: Arc<dyn Log>,
}

impl VerboseLog {
    pub fn new(inner: Arc<dyn Log>) -> Self {
        Self { inner }
    }
}

fn level_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
    }
}

impl Log for VerboseLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        eprintln!(
            "[{}] {} {}",
            level_str(record.level),
            record.ts,
            record.message
        );
        self.inner.log(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::NoopLog;
    use common::ports::outbound::now_iso8601;

    #[test]
    fn test_delegates_to_inner() {
        let log = VerboseLog::new(Arc::new(NoopLog));
        let rec = LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command started".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: None,
        };
        assert!(log.log(&rec).is_ok());
    }
}
