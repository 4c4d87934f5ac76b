// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scenarios for the position controller on virtual time.

use std::sync::Arc;
use std::time::Duration;

use covermotion::command::{CommandSet, RemoteButton};
use covermotion::error::{CommandError, Error, StoreError};
use covermotion::event::CoveringEvent;
use covermotion::manager::{CoveringConfig, PositionController};
use covermotion::motion::StartOutcome;
use covermotion::protocol::{CommandSink, MotorCommand};
use covermotion::state::StateChange;
use covermotion::store::{MemoryStore, PositionStore, StoreKey};
use covermotion::types::{MotionState, Position, TravelDuration};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::time::{self, Instant};

// ============================================================================
// Helpers
// ============================================================================

/// Records every command with the virtual time it reached the sink.
#[derive(Clone)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<(Instant, &'static str)>>>,
    fail: bool,
    delay: Duration,
    delayed: Option<&'static str>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: false,
            delay: Duration::ZERO,
            delayed: None,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    fn slow_on(command: &'static str, delay: Duration) -> Self {
        Self {
            delay,
            delayed: Some(command),
            ..Self::new()
        }
    }

    fn names(&self) -> Vec<&'static str> {
        self.sent.lock().iter().map(|(_, name)| *name).collect()
    }

    fn times(&self) -> Vec<Instant> {
        self.sent.lock().iter().map(|(at, _)| *at).collect()
    }
}

impl CommandSink for RecordingSink {
    async fn send(&self, command: &MotorCommand) -> Result<(), CommandError> {
        if !self.delay.is_zero() && self.delayed.is_none_or(|name| name == command.name) {
            time::sleep(self.delay).await;
        }
        self.sent.lock().push((Instant::now(), command.name));
        if self.fail {
            return Err(CommandError::Transport("gateway offline".to_string()));
        }
        Ok(())
    }
}

fn pos(value: u8) -> Position {
    Position::new(value).unwrap()
}

fn config(initial: u8) -> CoveringConfig {
    CoveringConfig::new("io://1234-5678/1")
        .with_supported_commands(CommandSet::standard())
        .with_initial_position(pos(initial))
}

fn drain(events: &mut broadcast::Receiver<CoveringEvent>) -> Vec<CoveringEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn tick_positions(events: &[CoveringEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|event| match event {
            CoveringEvent::StateChanged {
                change: StateChange::CurrentPosition(p),
                ..
            } => Some(p.value()),
            _ => None,
        })
        .collect()
}

fn arrivals(events: &[CoveringEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|event| match event {
            CoveringEvent::Arrived { position, .. } => Some(position.value()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Normal Moves
// ============================================================================

mod normal_moves {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn full_open_sends_only_open() {
        let sink = RecordingSink::new();
        let store = MemoryStore::new();
        let controller = PositionController::new(sink.clone(), store.clone());
        let id = controller.add_covering(config(0)).unwrap();
        let mut events = controller.subscribe();

        let outcome = controller.set_target_position(id, Position::OPEN).await.unwrap();
        assert!(matches!(outcome, StartOutcome::Started(e) if e.steps() == 100));

        time::sleep(Duration::from_secs(27)).await;

        let events = drain(&mut events);
        assert_eq!(sink.names(), vec!["open"]);
        assert_eq!(tick_positions(&events), (1..=100).collect::<Vec<_>>());
        assert_eq!(arrivals(&events), vec![100]);
        assert_eq!(controller.current_position(id), Some(Position::OPEN));

        let ns = id.to_string();
        assert_eq!(store.get(&ns, StoreKey::CurrentPosition, 0), 100);
        assert_eq!(store.get(&ns, StoreKey::TargetPosition, 0), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn partial_open_stops_at_proportional_time() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(0)).unwrap();
        let started = Instant::now();

        controller.set_target_position(id, pos(50)).await.unwrap();
        time::sleep(Duration::from_secs(14)).await;

        assert_eq!(sink.names(), vec!["open", "stop"]);
        let stop_at = sink.times()[1] - started;
        assert_eq!(stop_at, Duration::from_millis(13_000));
        assert_eq!(controller.current_position(id), Some(pos(50)));
    }

    #[tokio::test(start_paused = true)]
    async fn full_close_ticks_every_260_ms() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(100)).unwrap();
        let mut events = controller.subscribe();

        controller.set_target_position(id, Position::CLOSED).await.unwrap();

        time::sleep(Duration::from_millis(2_650)).await;
        assert_eq!(controller.current_position(id), Some(pos(90)));

        time::sleep(Duration::from_millis(23_450)).await;
        let events = drain(&mut events);

        assert_eq!(sink.names(), vec!["close"]);
        assert_eq!(tick_positions(&events), (0..=99).rev().collect::<Vec<_>>());
        assert_eq!(arrivals(&events), vec![0]);

        let state = controller.state(id).unwrap();
        assert_eq!(state.motion_state(), MotionState::Stopped);
        assert_eq!(state.target_position(), Position::CLOSED);
    }

    #[tokio::test(start_paused = true)]
    async fn same_position_is_a_no_op() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(40)).unwrap();
        let mut events = controller.subscribe();

        let outcome = controller.set_target_position(id, pos(40)).await.unwrap();
        assert_eq!(outcome, StartOutcome::AlreadyThere);

        time::sleep(Duration::from_secs(30)).await;
        assert!(sink.names().is_empty());
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn motion_state_follows_direction() {
        let controller = PositionController::new(RecordingSink::new(), MemoryStore::new());
        let id = controller.add_covering(config(50)).unwrap();

        controller.set_target_position(id, pos(60)).await.unwrap();
        assert_eq!(
            controller.state(id).unwrap().motion_state(),
            MotionState::Increasing
        );

        time::sleep(Duration::from_secs(3)).await;
        controller.set_target_position(id, pos(40)).await.unwrap();
        assert_eq!(
            controller.state(id).unwrap().motion_state(),
            MotionState::Decreasing
        );
    }

    #[tokio::test(start_paused = true)]
    async fn watchers_see_every_step() {
        let controller = PositionController::new(RecordingSink::new(), MemoryStore::new());
        let id = controller.add_covering(config(0)).unwrap();
        let mut state_rx = controller.watch_covering(id).unwrap();

        controller.set_target_position(id, pos(3)).await.unwrap();

        let mut seen = Vec::new();
        while seen.last() != Some(&3) {
            state_rx.changed().await.unwrap();
            let position = state_rx.borrow_and_update().current_position().value();
            if seen.last() != Some(&position) {
                seen.push(position);
            }
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }
}

// ============================================================================
// Re-entrancy and Hold
// ============================================================================

mod interruption {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn request_while_moving_stops_in_place() {
        let sink = RecordingSink::new();
        let store = MemoryStore::new();
        let controller = PositionController::new(sink.clone(), store.clone());
        let id = controller.add_covering(config(0)).unwrap();
        let mut events = controller.subscribe();

        controller.set_target_position(id, Position::OPEN).await.unwrap();
        time::sleep(Duration::from_millis(1_350)).await;

        let outcome = controller.set_target_position(id, pos(80)).await.unwrap();
        assert_eq!(outcome, StartOutcome::Halted(pos(5)));

        time::sleep(Duration::from_secs(30)).await;
        let events = drain(&mut events);

        assert_eq!(sink.names(), vec!["open", "stop"]);
        assert_eq!(tick_positions(&events), vec![1, 2, 3, 4, 5]);
        assert!(arrivals(&events).is_empty());

        let state = controller.state(id).unwrap();
        assert_eq!(state.current_position(), pos(5));
        assert_eq!(state.target_position(), pos(5));
        assert_eq!(state.motion_state(), MotionState::Stopped);

        let ns = id.to_string();
        assert_eq!(store.get(&ns, StoreKey::CurrentPosition, 0), 5);
        assert_eq!(store.get(&ns, StoreKey::TargetPosition, 0), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn next_request_after_halt_starts_from_halt_position() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(0)).unwrap();

        controller.set_target_position(id, Position::OPEN).await.unwrap();
        time::sleep(Duration::from_millis(1_350)).await;
        controller.set_target_position(id, pos(80)).await.unwrap();

        let outcome = controller.set_target_position(id, pos(10)).await.unwrap();
        assert!(matches!(outcome, StartOutcome::Started(e) if e.start() == pos(5) && e.steps() == 5));

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(sink.names(), vec!["open", "stop", "open", "stop"]);
        assert_eq!(controller.current_position(id), Some(pos(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn hold_during_motion() {
        let sink = RecordingSink::new();
        let store = MemoryStore::new();
        let controller = PositionController::new(sink.clone(), store.clone());
        let id = controller.add_covering(config(100)).unwrap();
        let mut events = controller.subscribe();

        controller.set_target_position(id, Position::CLOSED).await.unwrap();
        time::sleep(Duration::from_millis(1_350)).await;

        let held = controller.hold_position(id).await.unwrap();
        assert_eq!(held, pos(95));

        time::sleep(Duration::from_secs(30)).await;
        let events = drain(&mut events);

        assert_eq!(sink.names(), vec!["close", "stop"]);
        assert_eq!(tick_positions(&events).last(), Some(&95));
        assert!(arrivals(&events).is_empty());
        assert_eq!(controller.current_position(id), Some(pos(95)));

        let ns = id.to_string();
        assert_eq!(store.get(&ns, StoreKey::CurrentPosition, 0), 95);
        assert_eq!(store.get(&ns, StoreKey::TargetPosition, 0), 95);
    }

    #[tokio::test(start_paused = true)]
    async fn hold_when_idle_still_sends_stop() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(30)).unwrap();
        let mut events = controller.subscribe();

        assert_eq!(controller.hold_position(id).await.unwrap(), pos(30));
        time::sleep(Duration::from_millis(10)).await;

        assert_eq!(sink.names(), vec!["stop"]);
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn remote_button_during_motion_stops() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(100)).unwrap();

        controller.press(id, RemoteButton::Down).await.unwrap();
        time::sleep(Duration::from_millis(530)).await;
        let outcome = controller.press(id, RemoteButton::Up).await.unwrap();

        assert_eq!(outcome, StartOutcome::Halted(pos(98)));
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(sink.names(), vec!["close", "stop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn my_button_goes_to_preset() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller
            .add_covering(config(100).with_my_position(pos(70)))
            .unwrap();

        controller.press(id, RemoteButton::My).await.unwrap();
        time::sleep(Duration::from_secs(10)).await;

        assert_eq!(controller.current_position(id), Some(pos(70)));
        assert_eq!(sink.names(), vec!["close", "stop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn removing_a_moving_covering_stops_its_ticks() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(0)).unwrap();

        controller.set_target_position(id, Position::OPEN).await.unwrap();
        time::sleep(Duration::from_millis(600)).await;
        let mut events = controller.subscribe();

        assert!(controller.remove_covering(id));
        time::sleep(Duration::from_secs(30)).await;

        let events = drain(&mut events);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], CoveringEvent::CoveringRemoved { .. }));
        assert_eq!(sink.names(), vec!["open", "stop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn removing_an_idle_covering_sends_nothing() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(40)).unwrap();

        assert!(controller.remove_covering(id));
        time::sleep(Duration::from_millis(10)).await;

        assert!(sink.names().is_empty());
    }
}

// ============================================================================
// Vendor Commands
// ============================================================================

mod vendor_commands {
    use super::*;

    fn vendor_config(initial: u8) -> CoveringConfig {
        CoveringConfig::new("io://1234-5678/2")
            .with_supported_commands(CommandSet::from_names(["rollUp", "rollOut", "stop"]))
            .with_initial_position(pos(initial))
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_open_to_limit_self_stops() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(vendor_config(0)).unwrap();

        controller.set_target_position(id, Position::OPEN).await.unwrap();
        time::sleep(Duration::from_secs(27)).await;

        assert_eq!(sink.names(), vec!["rollUp"]);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_close_to_limit_can_require_stop() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller
            .add_covering(vendor_config(100).with_fallback_self_stops(false))
            .unwrap();

        controller.set_target_position(id, Position::CLOSED).await.unwrap();
        time::sleep(Duration::from_secs(27)).await;

        assert_eq!(sink.names(), vec!["rollOut", "stop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_partial_move_stops() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(vendor_config(0)).unwrap();

        controller.set_target_position(id, pos(20)).await.unwrap();
        time::sleep(Duration::from_secs(6)).await;

        assert_eq!(sink.names(), vec!["rollUp", "stop"]);
    }
}

// ============================================================================
// Persistence
// ============================================================================

mod persistence {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn restart_resumes_from_stored_position() {
        let store = MemoryStore::new();
        let cfg = config(100);
        let ns = cfg.covering_id().to_string();
        store.set(&ns, StoreKey::CurrentPosition, 30).unwrap();
        store.set(&ns, StoreKey::TargetPosition, 60).unwrap();
        store.set(&ns, StoreKey::FullTravelDuration, 40).unwrap();

        let controller = PositionController::new(RecordingSink::new(), store.clone());
        let id = controller.add_covering(cfg).unwrap();

        let state = controller.state(id).unwrap();
        assert_eq!(state.current_position(), pos(30));
        assert_eq!(state.target_position(), pos(30));
        assert_eq!(state.motion_state(), MotionState::Stopped);
        assert_eq!(state.full_travel_duration().seconds(), 40);

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(store.get(&ns, StoreKey::TargetPosition, 0), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn stored_zero_duration_is_a_config_error() {
        let store = MemoryStore::new();
        let cfg = config(100);
        store
            .set(&cfg.covering_id().to_string(), StoreKey::FullTravelDuration, 0)
            .unwrap();

        let controller = PositionController::new(RecordingSink::new(), store);
        let result = controller.add_covering(cfg);

        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(controller.covering_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn store_failures_do_not_stop_motion() {
        let store = MemoryStore::new();
        let controller = PositionController::new(RecordingSink::new(), store.clone());
        let id = controller.add_covering(config(0)).unwrap();
        store.set_fail_writes(true);
        let mut events = controller.subscribe();

        controller.set_target_position(id, pos(10)).await.unwrap();
        time::sleep(Duration::from_secs(3)).await;

        assert_eq!(controller.current_position(id), Some(pos(10)));
        assert_eq!(arrivals(&drain(&mut events)), vec![10]);
        assert_eq!(store.get(&id.to_string(), StoreKey::CurrentPosition, 0), 0);
    }

    /// Memory store whose writes take 40 ms each.
    #[derive(Debug, Clone, Default)]
    struct SluggishStore {
        inner: MemoryStore,
    }

    impl PositionStore for SluggishStore {
        fn read(&self, namespace: &str, key: StoreKey) -> Result<Option<u8>, StoreError> {
            self.inner.read(namespace, key)
        }

        fn set(&self, namespace: &str, key: StoreKey, value: u8) -> Result<(), StoreError> {
            std::thread::sleep(Duration::from_millis(40));
            self.inner.set(namespace, key, value)
        }
    }

    #[tokio::test]
    async fn slow_store_does_not_slow_the_episode() {
        let store = SluggishStore::default();
        let controller = PositionController::new(RecordingSink::new(), store.clone());
        let id = controller
            .add_covering(config(0).with_full_travel_duration(1))
            .unwrap();
        let mut events = controller.subscribe();

        let started = std::time::Instant::now();
        controller.set_target_position(id, pos(50)).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(40));

        let arrived = time::timeout(Duration::from_secs(2), async {
            loop {
                if let CoveringEvent::Arrived { position, .. } = events.recv().await.unwrap() {
                    return position;
                }
            }
        })
        .await
        .expect("arrival within two seconds");
        let elapsed = started.elapsed();

        assert_eq!(arrived, pos(50));
        assert!(elapsed >= Duration::from_millis(500), "arrived after {elapsed:?}");
        assert!(elapsed < Duration::from_millis(900), "arrived after {elapsed:?}");
        assert_eq!(controller.current_position(id), Some(pos(50)));

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(store.get(&id.to_string(), StoreKey::CurrentPosition, 0), 50);
        assert_eq!(store.get(&id.to_string(), StoreKey::TargetPosition, 0), 50);
    }

    #[tokio::test(start_paused = true)]
    async fn new_duration_applies_to_next_episode() {
        let store = MemoryStore::new();
        let controller = PositionController::new(RecordingSink::new(), store.clone());
        let id = controller.add_covering(config(0)).unwrap();

        controller
            .set_full_travel_duration(id, TravelDuration::new(10).unwrap())
            .await
            .unwrap();
        controller.set_target_position(id, Position::OPEN).await.unwrap();

        time::sleep(Duration::from_millis(9_950)).await;
        assert_eq!(controller.current_position(id), Some(pos(99)));
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(controller.current_position(id), Some(Position::OPEN));
        assert_eq!(
            store.get(&id.to_string(), StoreKey::FullTravelDuration, 0),
            10
        );
    }
}

// ============================================================================
// Command Delivery
// ============================================================================

mod command_delivery {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn failed_commands_are_reported_but_motion_continues() {
        let controller = PositionController::new(RecordingSink::failing(), MemoryStore::new());
        let id = controller.add_covering(config(0)).unwrap();
        let mut events = controller.subscribe();

        controller.set_target_position(id, pos(20)).await.unwrap();
        time::sleep(Duration::from_secs(6)).await;

        let events = drain(&mut events);
        assert_eq!(tick_positions(&events).len(), 20);
        assert_eq!(arrivals(&events), vec![20]);

        let failed: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                CoveringEvent::CommandFailed { command, .. } => Some(command.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(failed, vec!["open", "stop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_sink_never_delays_simulation() {
        let sink = RecordingSink::slow(Duration::from_secs(4));
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(0)).unwrap();

        controller.set_target_position(id, pos(50)).await.unwrap();
        time::sleep(Duration::from_millis(13_100)).await;

        assert_eq!(controller.current_position(id), Some(pos(50)));
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.names(), vec!["open", "stop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn hold_is_not_queued_behind_a_hanging_open() {
        let sink = RecordingSink::slow_on("open", Duration::from_secs(8));
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let id = controller.add_covering(config(0)).unwrap();

        controller.set_target_position(id, Position::OPEN).await.unwrap();
        time::sleep(Duration::from_secs(1)).await;

        let held_at = Instant::now();
        assert_eq!(controller.hold_position(id).await.unwrap(), pos(3));
        time::sleep(Duration::from_millis(10)).await;

        assert_eq!(sink.names(), vec!["stop"]);
        assert_eq!(sink.times()[0], held_at);

        time::sleep(Duration::from_secs(8)).await;
        assert_eq!(sink.names(), vec!["stop", "open"]);
    }

    #[tokio::test(start_paused = true)]
    async fn coverings_move_independently() {
        let sink = RecordingSink::new();
        let controller = PositionController::new(sink.clone(), MemoryStore::new());
        let a = controller.add_covering(config(0)).unwrap();
        let b = controller
            .add_covering(CoveringConfig::new("io://1234-5678/3").with_initial_position(pos(100)))
            .unwrap();

        controller.set_target_position(a, pos(10)).await.unwrap();
        controller.set_target_position(b, pos(90)).await.unwrap();
        time::sleep(Duration::from_secs(3)).await;

        assert_eq!(controller.current_position(a), Some(pos(10)));
        assert_eq!(controller.current_position(b), Some(pos(90)));

        let mut names = sink.names();
        names.sort_unstable();
        assert_eq!(names, vec!["close", "open", "stop", "stop"]);
    }
}
