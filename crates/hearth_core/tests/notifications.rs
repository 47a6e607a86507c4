use std::sync::Once;

use hearth_core::{update, Effect, Msg, NotificationKind, ShellState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(hearth_logging::initialize_for_tests);
}

fn mounted_state() -> ShellState {
    let (state, effects) = update(ShellState::default(), Msg::ToastSurfaceMounted);
    assert!(effects.is_empty());
    state
}

fn post(
    state: ShellState,
    message: &str,
    duration_ms: Option<u64>,
    now_ms: u64,
) -> (ShellState, Vec<Effect>) {
    update(
        state,
        Msg::NotificationPosted {
            message: message.to_string(),
            kind: NotificationKind::Info,
            duration_ms,
            now_ms,
        },
    )
}

#[test]
fn posted_notification_is_visible_and_schedules_expiry() {
    init_logging();
    let (mut state, effects) = post(mounted_state(), "saved", Some(2_000), 100);

    let view = state.view();
    assert_eq!(view.notifications.len(), 1);
    assert_eq!(view.notifications[0].message, "saved");
    assert_eq!(view.notifications[0].duration_ms, 2_000);
    let id = view.notifications[0].id;
    assert_eq!(
        effects,
        vec![Effect::ScheduleToastExpiry {
            id,
            delay_ms: 2_000
        }]
    );
    assert!(state.consume_dirty());
}

#[test]
fn missing_duration_falls_back_to_default() {
    init_logging();
    let (state, effects) = post(mounted_state(), "hello", None, 100);

    let id = state.view().notifications[0].id;
    assert_eq!(
        effects,
        vec![Effect::ScheduleToastExpiry {
            id,
            delay_ms: 5_000
        }]
    );
}

#[test]
fn expiry_removes_the_notification() {
    init_logging();
    let (state, effects) = post(mounted_state(), "bye", Some(2_000), 100);
    let id = match effects[0] {
        Effect::ScheduleToastExpiry { id, .. } => id,
        _ => unreachable!(),
    };

    let (state, effects) = update(state, Msg::NotificationExpired { id });
    assert!(effects.is_empty());
    assert!(state.view().notifications.is_empty());
}

#[test]
fn manual_dismissal_wins_and_late_expiry_is_a_noop() {
    init_logging();
    let (state, _) = post(mounted_state(), "first", Some(2_000), 100);
    let (state, _) = post(state, "second", Some(2_000), 200);
    let first = state.view().notifications[0].id;

    let (mut state, _) = update(state, Msg::NotificationDismissed { id: first });
    assert_eq!(state.view().notifications.len(), 1);
    assert_eq!(state.view().notifications[0].message, "second");
    assert!(state.consume_dirty());

    // The scheduled timer fires against the already-removed id.
    let (mut state, effects) = update(state, Msg::NotificationExpired { id: first });
    assert!(effects.is_empty());
    assert_eq!(state.view().notifications.len(), 1);
    assert!(!state.consume_dirty());
}

#[test]
fn same_millisecond_posts_get_distinct_ids() {
    init_logging();
    let (state, _) = post(mounted_state(), "a", None, 500);
    let (state, _) = post(state, "b", None, 500);
    let (state, _) = post(state, "c", None, 500);

    let view = state.view();
    assert_eq!(view.notifications.len(), 3);
    let ids: Vec<_> = view.notifications.iter().map(|n| n.id).collect();
    assert!(ids[0] < ids[1] && ids[1] < ids[2]);
}

#[test]
fn ids_stay_distinct_when_the_clock_steps_backwards() {
    init_logging();
    let (state, _) = post(mounted_state(), "a", None, 500);
    let (state, _) = post(state, "b", None, 400);

    let view = state.view();
    assert_ne!(view.notifications[0].id, view.notifications[1].id);
}

#[test]
fn notifications_render_in_insertion_order() {
    init_logging();
    let (state, _) = post(mounted_state(), "one", None, 1);
    let (state, _) = post(state, "two", None, 2);
    let (state, _) = post(state, "three", None, 3);

    let messages: Vec<_> = state
        .view()
        .notifications
        .iter()
        .map(|n| n.message.clone())
        .collect();
    assert_eq!(messages, vec!["one", "two", "three"]);
}

#[test]
fn post_without_mounted_surface_is_lost() {
    init_logging();
    let state = ShellState::default();
    let (mut state, effects) = post(state, "dropped", None, 100);

    assert!(effects.is_empty());
    assert!(state.view().notifications.is_empty());
    assert!(!state.consume_dirty());

    // Mounting afterwards does not resurrect it.
    let (state, _) = update(state, Msg::ToastSurfaceMounted);
    assert!(state.view().notifications.is_empty());
}

#[test]
fn unmount_clears_active_set_and_cancels_timers() {
    init_logging();
    let (state, _) = post(mounted_state(), "a", None, 1);
    let (state, _) = post(state, "b", None, 2);

    let (state, effects) = update(state, Msg::ToastSurfaceUnmounted);
    assert_eq!(effects, vec![Effect::CancelToastTimers]);
    assert!(state.view().notifications.is_empty());
}
