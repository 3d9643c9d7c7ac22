use super::*;

#[test]
fn defaults_match_documented_values() {
    let config = EngineConfig::default();
    assert_eq!(config.poll.watcher_interval(), Duration::from_secs(1));
    assert_eq!(config.poll.idle_interval(), Duration::from_secs(10));
    assert_eq!(config.preview.delay_before(), Duration::from_secs(1));
    assert_eq!(config.preview.highlight(), Duration::from_secs(3));
    assert!(config.preview.settle() > config.preview.highlight());
    assert_eq!(config.toast.duration(), Duration::from_secs(8));
    assert_eq!(config.backoff.floor(), Duration::from_secs(1));
    assert_eq!(config.backoff.ceiling(), Duration::from_secs(300));
    assert_eq!(config.resume.debounce(), Duration::from_secs(3));
    assert_eq!(config.idle.notice_after(), Duration::from_secs(10));
    assert_eq!(config.idle.idle_timeout(), Duration::from_secs(60));
    assert_eq!(config.idle.pre_cycle_at(), Duration::from_secs(30));
    assert_eq!(config.idle.tab_dwell(), Duration::from_secs(15));
}

#[test]
fn partial_config_fills_defaults() {
    let config: EngineConfig =
        serde_json::from_str(r#"{ "poll": { "watcher_interval_ms": 250 } }"#).unwrap();
    assert_eq!(config.poll.watcher_interval(), Duration::from_millis(250));
    assert_eq!(config.poll.idle_interval(), Duration::from_secs(10));
    assert_eq!(config.backoff.ceiling(), Duration::from_secs(300));
}

#[test]
fn pre_cycle_lead_saturates() {
    let idle = IdleConfig {
        idle_timeout_ms: 20_000,
        pre_cycle_lead_ms: 30_000,
        ..IdleConfig::default()
    };
    assert_eq!(idle.pre_cycle_at(), Duration::ZERO);
}
