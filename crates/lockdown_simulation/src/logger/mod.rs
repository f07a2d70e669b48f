//! Глобальный logger симуляции
//!
//! Хост (renderer, тесты, headless binary) подключает свой `LogPrinter`.
//! Без printer'а сообщения молча отбрасываются: симуляция не зависит от вывода.

use once_cell::sync::Lazy;
use std::sync::Mutex;

static LOGGER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));

static LOGGER_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

pub fn set_logger(logger: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(logger);
    }
}

pub fn set_log_level(level: LogLevel) {
    if let Ok(mut slot) = LOGGER_LEVEL.lock() {
        *slot = level;
    }
}

/// Проверка и установка под одним lock: не затирает printer, поставленный параллельно
pub fn set_logger_if_needed(logger: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        if slot.is_none() {
            *slot = Some(logger);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

/// Уровень ниже `set_log_level` отбрасывается до форматирования timestamp
pub fn log_with_level(level: LogLevel, message: &str) {
    let threshold = LOGGER_LEVEL.lock().map(|l| *l).unwrap_or(LogLevel::Debug);
    if level < threshold {
        return;
    }

    // Poisoned mutex (паника в чужом printer'е): просто теряем сообщение
    let Ok(guard) = LOGGER.lock() else {
        return;
    };
    if let Some(logger) = guard.as_ref() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        logger.log(level, &format!("[{}] {}", timestamp, message));
    }
}

pub struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert_eq!(LogLevel::Warning.as_str(), "WARNING");
    }

    struct CapturingLogger(Arc<Mutex<Vec<(LogLevel, String)>>>);

    impl LogPrinter for CapturingLogger {
        fn log(&self, level: LogLevel, message: &str) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push((level, message.to_string()));
            }
        }
    }

    #[test]
    fn test_level_below_threshold_is_dropped() {
        let captured = Arc::new(Mutex::new(Vec::new()));
        set_logger(Box::new(CapturingLogger(captured.clone())));
        set_log_level(LogLevel::Warning);

        log_info("level-filter: info dropped");
        log_warning("level-filter: warning kept");
        log_error("level-filter: error kept");

        set_log_level(LogLevel::Debug);

        // Другие тесты пишут в тот же глобальный logger параллельно
        let lines: Vec<_> = captured
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, message)| message.contains("level-filter:"))
            .cloned()
            .collect();
        assert_eq!(lines.len(), 2, "{:?}", lines);
        assert_eq!(lines[0].0, LogLevel::Warning);
        assert!(lines[0].1.ends_with("level-filter: warning kept"));
        assert_eq!(lines[1].0, LogLevel::Error);
    }
}
