//! Unit tests for the alert model and expiry policy

use alertrix::models::alert::{AggregatedAlert, AlertLevel};
use chrono::{Duration, Utc};

fn make_alert(level: AlertLevel) -> AggregatedAlert {
    AggregatedAlert::new(level, "title", "message", Vec::new(), 0.5, "watch")
}

#[test]
fn info_alerts_expire_after_one_hour() {
    let alert = make_alert(AlertLevel::Info);
    let created = alert.timestamp;
    assert_eq!(alert.expires_at, Some(created + Duration::hours(1)));
    assert!(!alert.is_stale(created + Duration::minutes(59)));
    assert!(alert.is_stale(created + Duration::minutes(61)));
}

#[test]
fn non_info_alerts_expire_after_four_hours() {
    for level in [AlertLevel::Warning, AlertLevel::Danger, AlertLevel::Success] {
        let alert = make_alert(level);
        let created = alert.timestamp;
        assert_eq!(alert.expires_at, Some(created + Duration::hours(4)));
        assert!(!alert.is_stale(created + Duration::hours(3)));
        assert!(alert.is_stale(created + Duration::hours(5)));
    }
}

#[test]
fn overall_confidence_is_clamped() {
    let alert = AggregatedAlert::new(
        AlertLevel::Warning,
        "t",
        "m",
        Vec::new(),
        2.5,
        "watch",
    );
    assert_eq!(alert.overall_confidence, 1.0);
}

#[test]
fn alert_without_expiry_is_never_stale() {
    let mut alert = make_alert(AlertLevel::Info);
    alert.expires_at = None;
    assert!(!alert.is_stale(Utc::now() + Duration::days(365)));
}
