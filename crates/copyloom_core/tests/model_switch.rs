use copyloom_core::db::open_db_in_memory;
use copyloom_core::{
    deliver_best_effort, CopyType, ModelSwitchNotice, ModelSwitchNotifier, ModelTier,
    Notification, NotificationSeverity, NotificationSink, NotifyError, RoutingService,
    SqliteRoutingStore,
};

#[derive(Default)]
struct RecordingSink {
    delivered: Vec<Notification>,
}

impl NotificationSink for RecordingSink {
    fn deliver(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        self.delivered.push(notification.clone());
        Ok(())
    }
}

struct DeadChannel;

impl NotificationSink for DeadChannel {
    fn deliver(&mut self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::ChannelUnavailable(
            "toast layer gone".to_string(),
        ))
    }
}

#[test]
fn routed_selection_changes_produce_exactly_one_notice() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRoutingStore::try_new(&conn).unwrap();
    let mut service = RoutingService::new(store);
    let mut notifier = ModelSwitchNotifier::new();
    let mut sink = RecordingSink::default();

    // First generation in the session: seeded email default, no notice.
    let selected = service.select_model(CopyType::Email, None).unwrap();
    assert_eq!(selected.model_id, "openai/gpt-5-mini");
    assert!(selected.auto_routed);
    assert!(notifier
        .observe(&selected.model_id, selected.auto_routed)
        .is_none());

    // Same default again, still silent.
    let selected = service.select_model(CopyType::Email, None).unwrap();
    assert!(notifier
        .observe(&selected.model_id, selected.auto_routed)
        .is_none());
    assert!(sink.delivered.is_empty());

    // The workspace admin moves the default; the next generation switches.
    service
        .update_default_model(CopyType::Email, "anthropic/claude-sonnet-4")
        .unwrap();
    let selected = service.select_model(CopyType::Email, None).unwrap();
    assert_eq!(selected.model_id, "anthropic/claude-sonnet-4");

    let notice = notifier
        .observe(&selected.model_id, selected.auto_routed)
        .expect("default change should notify");
    assert_eq!(notice.model_id, "anthropic/claude-sonnet-4");
    assert_eq!(notice.display_name, "Claude Sonnet 4");
    assert_eq!(notice.tier, ModelTier::Flagship);
    assert_eq!(notice.icon, "\u{2726}");
    assert!(notice.auto_routed);
    assert_eq!(
        notice.message,
        "Switched to Claude Sonnet 4: higher quality, higher cost (selected automatically)"
    );
    deliver_best_effort(&mut sink, &notice);

    assert_eq!(sink.delivered.len(), 1);
    let delivered = &sink.delivered[0];
    assert_eq!(delivered.severity, NotificationSeverity::Info);
    assert_eq!(delivered.message, notice.message);
    assert_eq!(delivered.glyph.as_deref(), Some("\u{2726}"));
    assert_eq!(delivered.duration_ms, 4_000);

    // Repeating the new default stays silent.
    let selected = service.select_model(CopyType::Email, None).unwrap();
    assert!(notifier
        .observe(&selected.model_id, selected.auto_routed)
        .is_none());
    assert_eq!(sink.delivered.len(), 1);
}

#[test]
fn explicit_model_request_notifies_without_auto_annotation() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRoutingStore::try_new(&conn).unwrap();
    let mut service = RoutingService::new(store);
    let mut notifier = ModelSwitchNotifier::new();

    let routed = service.select_model(CopyType::Ad, None).unwrap();
    notifier.observe(&routed.model_id, routed.auto_routed);

    let explicit = service
        .select_model(CopyType::Ad, Some("openai/gpt-5"))
        .unwrap();
    assert!(!explicit.auto_routed);

    let notice = notifier
        .observe(&explicit.model_id, explicit.auto_routed)
        .expect("explicit switch should notify");
    assert_eq!(notice.display_name, "GPT-5");
    assert_eq!(notice.tier, ModelTier::Flagship);
    assert!(!notice.auto_routed);
    assert_eq!(notice.message, "Switched to GPT-5: higher quality, higher cost");
}

#[test]
fn economy_switch_uses_economy_wording() {
    let mut notifier = ModelSwitchNotifier::new();
    notifier.observe("openai/gpt-5", false);

    let notice = notifier
        .observe("google/gemini-2.5-flash", false)
        .expect("switch should notify");
    assert_eq!(notice.tier, ModelTier::Economy);
    assert_eq!(notice.icon, "\u{26a1}");
    assert_eq!(
        notice.message,
        "Switched to Gemini 2.5 Flash: faster, cheaper"
    );
}

#[test]
fn failed_delivery_leaves_the_session_state_advanced() {
    let mut notifier = ModelSwitchNotifier::new();
    notifier.observe("openai/gpt-5", false);

    let notice = notifier
        .observe("openai/gpt-5-mini", true)
        .expect("switch should notify");
    deliver_best_effort(&mut DeadChannel, &notice);

    assert_eq!(notifier.last_model(), Some("openai/gpt-5-mini"));
    assert!(notifier.observe("openai/gpt-5-mini", true).is_none());
}

#[test]
fn notices_serialize_for_the_ui_bridge() {
    let mut notifier = ModelSwitchNotifier::new();
    notifier.observe("openai/gpt-5", false);
    let notice = notifier
        .observe("anthropic/claude-haiku-3.5", true)
        .expect("switch should notify");

    let json = serde_json::to_value(&notice).unwrap();
    assert_eq!(json["model_id"], "anthropic/claude-haiku-3.5");
    assert_eq!(json["display_name"], "Claude Haiku 3.5");
    assert_eq!(json["tier"], "economy");
    assert_eq!(json["auto_routed"], true);

    let decoded: ModelSwitchNotice = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, notice);
}
