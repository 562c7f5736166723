mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use flowstate::config::{ExhaustivityMode, TestStoreSettings};
use flowstate::{
    Action, Dependencies, Effect, Exhaustivity, FeatureState, Reduce, Reducer, Scheduler, TestStore,
    TestStoreError,
};

fn two_factor_store(
    configure: impl FnOnce(&mut Dependencies),
) -> TestStore<TwoFactorReducer> {
    TestStore::with_dependencies(TwoFactorState::new(TOKEN), TwoFactorReducer, |deps| {
        deps.insert(
            AuthenticationClient::failing()
                .with_two_factor(Err(AuthenticationError::InvalidTwoFactor)),
        );
        configure(deps);
    })
}

#[test]
fn unreceived_effect_output_fails_teardown() {
    let mut store = two_factor_store(immediate);
    store.send(TwoFactorAction::SubmitButtonTapped, |state| {
        state.is_two_factor_request_in_flight = true;
    });

    let result = store.try_finish();
    match result {
        Err(TestStoreError::UnhandledActions { actions, .. }) => {
            assert_eq!(actions.len(), 1);
            assert!(actions[0].contains("TwoFactorResponse"), "{:?}", actions);
        }
        other => panic!("expected unhandled actions, got {:?}", other),
    }
}

#[test]
fn running_effect_fails_teardown() {
    let mut store = two_factor_store(|_| {});
    store.send(TwoFactorAction::SubmitButtonTapped, |state| {
        state.is_two_factor_request_in_flight = true;
    });

    let result = store.try_finish();
    assert!(
        matches!(result, Err(TestStoreError::InFlightEffects { count: 1 })),
        "{:?}",
        result
    );
}

#[test]
#[should_panic(expected = "still in flight")]
fn dropping_an_unfinished_store_runs_teardown_checks() {
    let mut store = two_factor_store(|_| {});
    store.send(TwoFactorAction::SubmitButtonTapped, |state| {
        state.is_two_factor_request_in_flight = true;
    });
}

#[test]
fn skipping_in_flight_effects_allows_finish() {
    let mut store = two_factor_store(|_| {});
    store.send(TwoFactorAction::SubmitButtonTapped, |state| {
        state.is_two_factor_request_in_flight = true;
    });
    store.skip_in_flight_effects();
    assert_eq!(store.scheduler().pending_timers(), 0);
    store.finish();
}

#[test]
fn sending_with_unasserted_received_actions_fails() {
    let mut store = two_factor_store(immediate);
    store.send(TwoFactorAction::SubmitButtonTapped, |state| {
        state.is_two_factor_request_in_flight = true;
    });

    let result = store.try_send(TwoFactorAction::AlertDismissed, |_| {});
    assert!(
        matches!(result, Err(TestStoreError::UnhandledActions { .. })),
        "{:?}",
        result
    );
    store.skip_received_actions();
    store.finish();
}

#[test]
fn state_mismatch_reports_field_diff() {
    let mut store = two_factor_store(immediate);

    let result = store.try_send(TwoFactorAction::CodeChanged("1234".into()), |state| {
        state.code = "1234".into();
    });
    match result {
        Err(TestStoreError::StateMismatch { step, diff }) => {
            assert!(step.contains("CodeChanged"), "{}", step);
            assert!(diff.contains("-     is_form_valid: false,"), "{}", diff);
            assert!(diff.contains("+     is_form_valid: true,"), "{}", diff);
        }
        other => panic!("expected state mismatch, got {:?}", other),
    }

    // The failed step still moves the baseline forward.
    store.send(TwoFactorAction::CodeChanged("12".into()), |state| {
        state.code = "12".into();
        state.is_form_valid = false;
    });
    store.finish();
}

#[test]
#[should_panic(expected = "State mismatch")]
fn send_panics_on_mismatch() {
    let mut store = two_factor_store(immediate);
    store.send(TwoFactorAction::CodeChanged("1234".into()), |_| {});
}

#[test]
fn unexpected_action_is_reported() {
    let mut store = two_factor_store(immediate);
    store.send(TwoFactorAction::SubmitButtonTapped, |state| {
        state.is_two_factor_request_in_flight = true;
    });

    let result = store.try_receive(
        TwoFactorAction::TwoFactorResponse(Ok(authenticated(false))),
        |state| state.is_two_factor_request_in_flight = false,
    );
    match result {
        Err(TestStoreError::UnexpectedAction { expected, received }) => {
            assert!(expected.contains("Ok("), "{}", expected);
            assert!(received.contains("InvalidTwoFactor"), "{}", received);
        }
        other => panic!("expected unexpected action, got {:?}", other),
    }
    store.finish();
}

#[test]
fn receive_matching_checks_by_predicate() {
    let mut store = two_factor_store(immediate);
    store.send(TwoFactorAction::SubmitButtonTapped, |state| {
        state.is_two_factor_request_in_flight = true;
    });
    store.receive_matching(
        "a failed two factor response",
        |action| matches!(action, TwoFactorAction::TwoFactorResponse(Err(_))),
        |state| {
            state.is_two_factor_request_in_flight = false;
            state.alert = Some(AlertState {
                title: "invalid two factor".into(),
            });
        },
    );
    store.finish();
}

#[test]
fn non_exhaustive_tolerates_unasserted_mutations() {
    let mut store = two_factor_store(immediate);
    store.set_exhaustivity(Exhaustivity::off());

    // is_form_valid also changes, but only the code is asserted.
    store.send(TwoFactorAction::CodeChanged("1234".into()), |state| {
        state.code = "1234".into();
    });
    store.send(TwoFactorAction::SubmitButtonTapped, |_| {});
    store.receive(
        TwoFactorAction::TwoFactorResponse(Err(AuthenticationError::InvalidTwoFactor)),
        |state| {
            state.alert = Some(AlertState {
                title: "invalid two factor".into(),
            });
        },
    );
    assert!(store.state().is_form_valid);
    assert!(!store.state().is_two_factor_request_in_flight);
    store.finish();
}

#[test]
fn non_exhaustive_still_checks_scripted_fields() {
    let mut store = two_factor_store(immediate);
    store.set_exhaustivity(Exhaustivity::off());

    let result = store.try_send(TwoFactorAction::CodeChanged("1234".into()), |state| {
        state.code = "4321".into();
    });
    assert!(
        matches!(result, Err(TestStoreError::StateMismatch { .. })),
        "{:?}",
        result
    );
    store.finish();
}

#[test]
fn non_exhaustive_skips_unreceived_actions_and_effects() {
    let mut store = two_factor_store(immediate);
    store.set_exhaustivity(Exhaustivity::Off {
        show_skipped_assertions: true,
    });

    store.send(TwoFactorAction::SubmitButtonTapped, |_| {});
    // The response is never received; sending again drops it.
    store.send(TwoFactorAction::AlertDismissed, |state| state.alert = None);
    assert_eq!(store.received_count(), 0);

    let scheduler = store.scheduler().clone();
    store.dependencies_mut().scheduler = Arc::new(scheduler);
    store.send(TwoFactorAction::SubmitButtonTapped, |_| {});
    assert_eq!(store.in_flight_count(), 1);
    store.finish();
    assert_eq!(store.in_flight_count(), 0);
}

#[test]
fn non_exhaustive_receive_without_match_fails() {
    let mut store = two_factor_store(immediate);
    store.set_exhaustivity(Exhaustivity::off());
    store.send(TwoFactorAction::SubmitButtonTapped, |_| {});

    let result = store.try_receive(TwoFactorAction::AlertDismissed, |_| {});
    match result {
        Err(TestStoreError::NoMatchingAction { received, .. }) => assert_eq!(received.len(), 1),
        other => panic!("expected no matching action, got {:?}", other),
    }
    store.finish();
}

#[test]
fn settings_select_exhaustivity() {
    let settings = TestStoreSettings {
        exhaustivity: ExhaustivityMode::Off,
        show_skipped_assertions: true,
        ..TestStoreSettings::default()
    };
    let mut store = TestStore::with_settings(
        TwoFactorState::new(TOKEN),
        TwoFactorReducer,
        &settings,
        |_| {},
    );
    assert_eq!(
        store.exhaustivity(),
        Exhaustivity::Off {
            show_skipped_assertions: true
        }
    );
    store.finish();
}

#[derive(Debug, Clone, PartialEq)]
struct Pings(u32);

impl FeatureState for Pings {}

#[derive(Debug, Clone, PartialEq)]
struct Ping;

impl Action for Ping {}

#[test]
fn runaway_effects_hit_the_settle_limit() {
    let settings = TestStoreSettings {
        max_settle_iterations: 50,
        ..TestStoreSettings::default()
    };
    let reducer = Reduce::new(|state: &mut Pings, _: Ping, _: &Dependencies| {
        state.0 += 1;
        Effect::send(Ping)
    });
    let mut store = TestStore::with_settings(Pings(0), reducer, &settings, |_| {});

    let result = store.try_send(Ping, |state| state.0 = 1);
    assert!(
        matches!(result, Err(TestStoreError::SettleLimitExceeded { iterations: 50 })),
        "{:?}",
        result
    );
    assert!(store.try_finish().is_err());
}

#[derive(Debug, Clone, PartialEq)]
enum Ticker {
    Start,
    Tick,
}

impl Action for Ticker {}

fn ticker_store(limit: usize) -> TestStore<impl Reducer<State = Pings, Action = Ticker>> {
    let settings = TestStoreSettings {
        max_settle_iterations: limit,
        ..TestStoreSettings::default()
    };
    let reducer = Reduce::new(|state: &mut Pings, action: Ticker, deps: &Dependencies| match action {
        Ticker::Start => {
            let scheduler = Arc::clone(&deps.scheduler);
            Effect::run(move |emitter| async move {
                loop {
                    scheduler.sleep(Duration::ZERO).await;
                    emitter.emit(Ticker::Tick);
                }
            })
        }
        Ticker::Tick => {
            state.0 += 1;
            Effect::none()
        }
    });
    let mut store = TestStore::with_settings(Pings(0), reducer, &settings, |_| {});
    store.send(Ticker::Start, |_| {});
    store
}

#[test]
fn endless_zero_sleeps_hit_the_limit_when_advancing() {
    let mut store = ticker_store(50);

    let result = store.try_advance_by(Duration::ZERO);
    assert!(
        matches!(result, Err(TestStoreError::SettleLimitExceeded { iterations: 50 })),
        "{:?}",
        result
    );

    store.skip_received_actions();
    store.skip_in_flight_effects();
    store.finish();
}

#[test]
fn endless_zero_sleeps_hit_the_limit_when_running_the_scheduler() {
    let mut store = ticker_store(50);

    let result = store.try_run_scheduler();
    assert!(
        matches!(result, Err(TestStoreError::SettleLimitExceeded { iterations: 50 })),
        "{:?}",
        result
    );

    store.skip_received_actions();
    store.skip_in_flight_effects();
    store.finish();
}

#[test]
fn advancing_by_the_maximum_duration_does_not_overflow() {
    let mut store = ticker_store(50);
    store.skip_in_flight_effects();
    store.advance_by(Duration::from_secs(1));
    store.advance_by(Duration::MAX);
    assert_eq!(store.scheduler().now(), Duration::MAX);
    store.finish();
}
