#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct StageStats {
    pub stage: String,
    pub elapsed: Duration,
    pub memory_usage_mb: Option<u64>,
    pub cpu_usage: Option<f32>,
}

/// 掃描過程的資源監控；未啟用時只記錄耗時
#[cfg(feature = "cli")]
pub struct RunMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    start_time: Instant,
    peak_memory: Mutex<u64>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        let mut system = System::new_with_specifics(RefreshKind::everything());
        let pid = sysinfo::get_current_pid().ok();

        if enabled {
            system.refresh_all();
        }

        Self {
            system: Mutex::new(system),
            pid,
            start_time: Instant::now(),
            peak_memory: Mutex::new(0),
            enabled: enabled && pid.is_some(),
        }
    }

    pub fn stats(&self, stage: &str) -> StageStats {
        let mut stats = StageStats {
            stage: stage.to_string(),
            elapsed: self.start_time.elapsed(),
            memory_usage_mb: None,
            cpu_usage: None,
        };
        if !self.enabled {
            return stats;
        }

        let (Some(pid), Ok(mut system)) = (self.pid, self.system.lock()) else {
            return stats;
        };
        system.refresh_all();
        if let Some(process) = system.process(pid) {
            let memory_mb = process.memory() / 1024 / 1024;
            if let Ok(mut peak) = self.peak_memory.lock() {
                *peak = (*peak).max(memory_mb);
            }
            stats.memory_usage_mb = Some(memory_mb);
            stats.cpu_usage = Some(process.cpu_usage());
        }
        stats
    }

    pub fn log_stage(&self, stage: &str) {
        let stats = self.stats(stage);
        match (stats.memory_usage_mb, stats.cpu_usage) {
            (Some(memory), Some(cpu)) => tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Time: {:?}",
                stats.stage,
                cpu,
                memory,
                stats.elapsed
            ),
            _ => tracing::debug!("⏱️ {} - Time: {:?}", stats.stage, stats.elapsed),
        }
    }

    pub fn log_final_stats(&self) {
        let peak = self.peak_memory.lock().map(|p| *p).unwrap_or(0);
        if self.enabled {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                self.start_time.elapsed(),
                peak
            );
        } else {
            tracing::debug!("⏱️ Total Time: {:?}", self.start_time.elapsed());
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// 非 CLI 環境只保留計時
#[cfg(not(feature = "cli"))]
pub struct RunMonitor {
    start_time: Instant,
}

#[cfg(not(feature = "cli"))]
impl RunMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn stats(&self, stage: &str) -> StageStats {
        StageStats {
            stage: stage.to_string(),
            elapsed: self.start_time.elapsed(),
            memory_usage_mb: None,
            cpu_usage: None,
        }
    }

    pub fn log_stage(&self, stage: &str) {
        tracing::debug!("⏱️ {} - Time: {:?}", stage, self.start_time.elapsed());
    }

    pub fn log_final_stats(&self) {
        tracing::debug!("⏱️ Total Time: {:?}", self.start_time.elapsed());
    }

    pub fn is_enabled(&self) -> bool {
        false
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
