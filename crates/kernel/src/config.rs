use std::env;
use std::path::PathBuf;

use bootloader::BootConfig;

/// Directory the guest's `C:\` is mapped to.
pub const BASE_PATH_ENV: &str = "TOS_BASE_PATH";
/// Any value other than empty or `0` turns on syscall tracing.
pub const TRACE_ENV: &str = "TOSEMU_TRACE";

/// Kernel configuration options.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Host directory that confines every guest path.
    pub base_path: PathBuf,
    /// Log every trap at info level instead of trace.
    pub trace_syscalls: bool,
    pub boot: BootConfig,
}

impl KernelConfig {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            trace_syscalls: false,
            boot: BootConfig::default(),
        }
    }

    /// Reads [`BASE_PATH_ENV`] and [`TRACE_ENV`], defaulting to the current
    /// directory with tracing off.
    pub fn from_env() -> Self {
        let base_path = env::var_os(BASE_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let trace_syscalls = env::var(TRACE_ENV)
            .map(|value| flag_enabled(&value))
            .unwrap_or(false);
        Self {
            base_path,
            trace_syscalls,
            boot: BootConfig::default(),
        }
    }
}

fn flag_enabled(value: &str) -> bool {
    !matches!(value.trim(), "" | "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_flag_values() {
        assert!(flag_enabled("1"));
        assert!(flag_enabled("yes"));
        assert!(!flag_enabled("0"));
        assert!(!flag_enabled(" "));
    }
}
