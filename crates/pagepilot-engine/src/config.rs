//! Configuration for the engine.
//!
//! Every period the watchers run on is configuration, not a constant: the
//! polling cadence trades responsiveness against needless tree walks, and
//! deployments tune it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Polling cadence.
    #[serde(default)]
    pub poll: PollConfig,

    /// Preview-click timing.
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Toast display timing.
    #[serde(default)]
    pub toast: ToastConfig,

    /// Connection-recovery back-off.
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Resume-banner watcher tuning.
    #[serde(default)]
    pub resume: ResumeConfig,

    /// Idle detection and tab cycling.
    #[serde(default)]
    pub idle: IdleConfig,
}

/// Polling cadence for the watcher loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Tick period for the banner/recovery watchers, in milliseconds.
    #[serde(default = "default_watcher_interval_ms")]
    pub watcher_interval_ms: u64,

    /// Tick period for the idle watcher, in milliseconds. Coarser: idleness
    /// is measured in tens of seconds.
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,
}

fn default_watcher_interval_ms() -> u64 {
    1000
}

fn default_idle_interval_ms() -> u64 {
    10_000
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            watcher_interval_ms: default_watcher_interval_ms(),
            idle_interval_ms: default_idle_interval_ms(),
        }
    }
}

impl PollConfig {
    pub fn watcher_interval(&self) -> Duration {
        Duration::from_millis(self.watcher_interval_ms)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }
}

/// Timing of the preview-then-click primitive.
///
/// The delay before the click is deliberate: a human observer gets to see what
/// is about to be clicked before it happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Delay between highlight and click, in milliseconds.
    #[serde(default = "default_delay_before_ms")]
    pub delay_before_ms: u64,

    /// How long the highlight stays on, measured from highlight start,
    /// in milliseconds. Independent of the click timer.
    #[serde(default = "default_highlight_ms")]
    pub highlight_ms: u64,

    /// How long a watcher's busy lock stays set after triggering, in
    /// milliseconds. Slightly longer than the highlight; releases on this
    /// timer regardless of click outcome, because a UI click gives no
    /// completion signal.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_delay_before_ms() -> u64 {
    1000
}

fn default_highlight_ms() -> u64 {
    3000
}

fn default_settle_ms() -> u64 {
    3500
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            delay_before_ms: default_delay_before_ms(),
            highlight_ms: default_highlight_ms(),
            settle_ms: default_settle_ms(),
        }
    }
}

impl PreviewConfig {
    pub fn delay_before(&self) -> Duration {
        Duration::from_millis(self.delay_before_ms)
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Toast display durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Default auto-dismiss time, in milliseconds.
    #[serde(default = "default_toast_duration_ms")]
    pub duration_ms: u64,

    /// Auto-dismiss time for error-severity toasts, in milliseconds.
    #[serde(default = "default_error_duration_ms")]
    pub error_duration_ms: u64,
}

fn default_toast_duration_ms() -> u64 {
    8000
}

fn default_error_duration_ms() -> u64 {
    60_000
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_toast_duration_ms(),
            error_duration_ms: default_error_duration_ms(),
        }
    }
}

impl ToastConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn error_duration(&self) -> Duration {
        Duration::from_millis(self.error_duration_ms)
    }
}

/// Exponential back-off bounds for connection recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Floor delay, in milliseconds.
    #[serde(default = "default_backoff_floor_ms")]
    pub floor_ms: u64,

    /// Ceiling delay, in milliseconds.
    #[serde(default = "default_backoff_ceiling_ms")]
    pub ceiling_ms: u64,
}

fn default_backoff_floor_ms() -> u64 {
    1000
}

fn default_backoff_ceiling_ms() -> u64 {
    300_000
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            floor_ms: default_backoff_floor_ms(),
            ceiling_ms: default_backoff_ceiling_ms(),
        }
    }
}

impl BackoffConfig {
    pub fn floor(&self) -> Duration {
        Duration::from_millis(self.floor_ms)
    }

    pub fn ceiling(&self) -> Duration {
        Duration::from_millis(self.ceiling_ms)
    }
}

/// Resume-banner watcher tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeConfig {
    /// Suppression window after a successful resume click, in milliseconds.
    /// Stops the watcher from double-clicking a banner that has not yet
    /// disappeared.
    #[serde(default = "default_resume_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_resume_debounce_ms() -> u64 {
    3000
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_resume_debounce_ms(),
        }
    }
}

impl ResumeConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Idle detection and tab-cycle escalation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleConfig {
    /// Idle time before the first notice, in milliseconds.
    #[serde(default = "default_idle_notice_after_ms")]
    pub notice_after_ms: u64,

    /// Continuous idle time at which tab cycling begins, in milliseconds.
    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// How far before the timeout the pre-cycle warning fires, in
    /// milliseconds.
    #[serde(default = "default_pre_cycle_lead_ms")]
    pub pre_cycle_lead_ms: u64,

    /// Dwell on each tab during a cycle, in milliseconds.
    #[serde(default = "default_tab_dwell_ms")]
    pub tab_dwell_ms: u64,

    /// How long the tab strip is highlighted with the pre-cycle warning,
    /// in milliseconds.
    #[serde(default = "default_strip_highlight_ms")]
    pub strip_highlight_ms: u64,
}

fn default_idle_notice_after_ms() -> u64 {
    10_000
}

fn default_idle_timeout_ms() -> u64 {
    60_000
}

fn default_pre_cycle_lead_ms() -> u64 {
    30_000
}

fn default_tab_dwell_ms() -> u64 {
    15_000
}

fn default_strip_highlight_ms() -> u64 {
    3000
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            notice_after_ms: default_idle_notice_after_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            pre_cycle_lead_ms: default_pre_cycle_lead_ms(),
            tab_dwell_ms: default_tab_dwell_ms(),
            strip_highlight_ms: default_strip_highlight_ms(),
        }
    }
}

impl IdleConfig {
    pub fn notice_after(&self) -> Duration {
        Duration::from_millis(self.notice_after_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Idle time at which the pre-cycle warning fires.
    pub fn pre_cycle_at(&self) -> Duration {
        self.idle_timeout()
            .saturating_sub(Duration::from_millis(self.pre_cycle_lead_ms))
    }

    pub fn tab_dwell(&self) -> Duration {
        Duration::from_millis(self.tab_dwell_ms)
    }

    pub fn strip_highlight(&self) -> Duration {
        Duration::from_millis(self.strip_highlight_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
