use super::*;
use crate::test_support::FakeSettingsSource;

#[test]
fn fake_settings_reports_initial_value() {
    let settings = FakeSettingsSource::new(true);
    assert!(settings.sync_enabled());
}

#[tokio::test]
async fn fake_settings_notifies_watchers_on_change() {
    let settings = FakeSettingsSource::new(false);
    let mut rx = settings.watch_sync_enabled();
    settings.set_sync_enabled(true);
    rx.changed().await.unwrap();
    assert!(*rx.borrow());
}
