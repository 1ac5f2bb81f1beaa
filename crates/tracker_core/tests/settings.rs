mod common;

use common::{channel_open, count, host, init_logging, run};
use pretty_assertions::assert_eq;
use tracker_core::{update, ChannelState, Effect, Msg, SignalingState, TrackerState};

#[test]
fn settings_request_prompts_with_current_host() {
    init_logging();
    let (_state, effects) = update(TrackerState::new(host("dashboard")), Msg::SettingsRequested);

    assert_eq!(
        effects,
        vec![Effect::PromptHostIdentifier {
            current: host("dashboard"),
        }]
    );
}

#[test]
fn host_change_tears_down_the_pair_once_and_reinitializes() {
    init_logging();
    let (state, _) = channel_open();
    let (state, effects) = update(
        state,
        Msg::HostIdentifierEntered(Some("  other-dashboard \n".to_string())),
    );

    assert_eq!(state.host_id(), &host("other-dashboard"));
    assert_eq!(state.signaling_state(), SignalingState::Connecting);
    assert_eq!(state.channel_state(), ChannelState::Idle);
    assert_eq!(state.view().generation, 2);
    assert_eq!(
        effects,
        vec![
            Effect::PersistHostIdentifier(host("other-dashboard")),
            Effect::Notify("Host ID saved! Reloading connection...".to_string()),
            Effect::CloseChannel { attempt: 1 },
            Effect::CancelTimer(tracker_core::TimerKind::ConnectTimeout),
            Effect::DestroySignaling { generation: 1 },
            Effect::OpenSignaling { generation: 2 },
        ]
    );
}

#[test]
fn new_session_connects_to_the_new_host() {
    init_logging();
    let (state, _) = channel_open();
    let (_state, effects) = run(
        state,
        vec![
            Msg::HostIdentifierEntered(Some("other-dashboard".to_string())),
            common::opened(2),
        ],
    );

    let targets: Vec<_> = effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::ConnectChannel { target, .. } => Some(target.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(targets, vec![host("other-dashboard")]);
}

#[test]
fn cancelled_blank_or_unchanged_input_is_ignored() {
    init_logging();
    let (state, _) = channel_open();

    for entered in [None, Some("   ".to_string()), Some(" dashboard ".to_string())] {
        let (next, effects) = update(state.clone(), Msg::HostIdentifierEntered(entered));
        assert!(effects.is_empty());
        assert_eq!(next, state);
    }
}

#[test]
fn host_change_while_destroyed_only_opens_a_fresh_session() {
    init_logging();
    let (state, _) = channel_open();
    let (state, _) = update(
        state,
        common::signaling(1, tracker_core::SignalingEvent::Closed),
    );
    let (_state, effects) = update(
        state,
        Msg::HostIdentifierEntered(Some("other-dashboard".to_string())),
    );

    assert_eq!(
        count(&effects, |e| matches!(e, Effect::DestroySignaling { .. })),
        0
    );
    assert_eq!(
        count(&effects, |e| matches!(e, Effect::OpenSignaling { .. })),
        1
    );
    assert!(effects.contains(&Effect::CancelTimer(
        tracker_core::TimerKind::SignalingRetry
    )));
}

#[test]
fn host_change_before_startup_is_persisted_only() {
    init_logging();
    let (state, effects) = update(
        TrackerState::new(host("dashboard")),
        Msg::HostIdentifierEntered(Some("other-dashboard".to_string())),
    );

    assert_eq!(state.host_id(), &host("other-dashboard"));
    assert_eq!(state.signaling_state(), SignalingState::Uninitialized);
    assert_eq!(
        count(&effects, |e| matches!(e, Effect::OpenSignaling { .. })),
        0
    );
}
