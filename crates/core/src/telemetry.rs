//! 텔레메트리 -- 기능 사용 이벤트
//!
//! [`TelemetryEvent`]는 하나의 CLI 기능 실행에 대한 키/값 필드와 소요 시간을 담습니다.
//! [`TelemetrySink`] trait은 이벤트를 외부로 내보내는 fire-and-forget 싱크입니다.
//!
//! # 사용 예시
//!
//! ```
//! use hostvuln_core::telemetry::{TelemetryEvent, TelemetrySink, TracingSink};
//!
//! let mut event = TelemetryEvent::new("gen_pkg_manifest");
//! event.add_feature_field("os", "ubuntu");
//! event.add_feature_field("total_manifest_pkgs", 42);
//! event.duration_ms = 120;
//!
//! TracingSink.send(&event);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

/// 패키지 매니페스트 생성 기능명
pub const FEATURE_GEN_PKG_MANIFEST: &str = "gen_pkg_manifest";

/// 텔레메트리 로그 target
pub const TELEMETRY_TARGET: &str = "hostvuln::telemetry";

/// 기능 사용 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// 이벤트 고유 ID (UUID v4)
    pub id: String,
    /// 기능명
    pub feature: String,
    /// 기능별 필드 (키 순서 고정)
    pub feature_data: BTreeMap<String, serde_json::Value>,
    /// 소요 시간 (밀리초)
    pub duration_ms: u64,
}

impl TelemetryEvent {
    /// 새 이벤트를 생성합니다.
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            feature: feature.into(),
            feature_data: BTreeMap::new(),
            duration_ms: 0,
        }
    }

    /// 기능 필드를 추가합니다. 같은 키가 있으면 덮어씁니다.
    pub fn add_feature_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) {
        self.feature_data.insert(key.into(), value.into());
    }

    /// 필드 값을 조회합니다.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.feature_data.get(key)
    }
}

impl fmt::Display for TelemetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TelemetryEvent[{}] feature={} fields={} duration_ms={}",
            &self.id[..8.min(self.id.len())],
            self.feature,
            self.feature_data.len(),
            self.duration_ms,
        )
    }
}

/// 텔레메트리 싱크
///
/// 전송 실패는 호출자에게 전파되지 않습니다.
pub trait TelemetrySink: Send + Sync {
    /// 이벤트를 전송합니다.
    fn send(&self, event: &TelemetryEvent);
}

/// 이벤트를 구조화 로그로 내보내는 싱크
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn send(&self, event: &TelemetryEvent) {
        let fields = serde_json::to_string(&event.feature_data).unwrap_or_default();
        info!(
            target: TELEMETRY_TARGET,
            event_id = %event.id,
            feature = %event.feature,
            duration_ms = event.duration_ms,
            fields = %fields,
            "telemetry event"
        );
    }
}

/// 텔레메트리 비활성화 시 사용하는 싱크
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn send(&self, _event: &TelemetryEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl TelemetrySink for RecordingSink {
        fn send(&self, event: &TelemetryEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn new_event_has_id_and_feature() {
        let event = TelemetryEvent::new(FEATURE_GEN_PKG_MANIFEST);
        assert_eq!(event.feature, "gen_pkg_manifest");
        assert!(!event.id.is_empty());
        assert!(event.feature_data.is_empty());
        assert_eq!(event.duration_ms, 0);
    }

    #[test]
    fn add_feature_field_accepts_strings_and_numbers() {
        let mut event = TelemetryEvent::new("test");
        event.add_feature_field("os", "centos");
        event.add_feature_field("total_manifest_pkgs", 12);
        assert_eq!(event.field("os").unwrap(), "centos");
        assert_eq!(event.field("total_manifest_pkgs").unwrap(), 12);
    }

    #[test]
    fn add_feature_field_overwrites() {
        let mut event = TelemetryEvent::new("test");
        event.add_feature_field("pkg_manager", "rpm");
        event.add_feature_field("pkg_manager", "dpkg-query");
        assert_eq!(event.feature_data.len(), 1);
        assert_eq!(event.field("pkg_manager").unwrap(), "dpkg-query");
    }

    #[test]
    fn sinks_accept_events() {
        let event = TelemetryEvent::new("test");
        TracingSink.send(&event);
        NoopSink.send(&event);

        let recorder = RecordingSink::default();
        recorder.send(&event);
        assert_eq!(recorder.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn display_contains_feature() {
        let event = TelemetryEvent::new("gen_pkg_manifest");
        assert!(event.to_string().contains("gen_pkg_manifest"));
    }

    #[test]
    fn event_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<TelemetryEvent>();
    }
}
