use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use rollsync_engine::{
    LoopingSource, Playback, PlaybackChange, Speed, Transport, TransportState, UiWaker, NO_TICK,
};

#[derive(Clone, Debug)]
enum Command {
    Toggle,
    Stop,
    SetSpeed(u32),
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Toggle),
        Just(Command::Stop),
        (1u32..=10).prop_map(Command::SetSpeed),
    ]
}

fn expected_after_toggle(state: TransportState) -> (TransportState, PlaybackChange) {
    match state {
        TransportState::Stopped => (TransportState::Playing, PlaybackChange::Started),
        TransportState::Paused => (TransportState::Playing, PlaybackChange::Resumed),
        TransportState::Playing => (TransportState::Paused, PlaybackChange::Paused),
    }
}

struct NoopWaker;

impl UiWaker for NoopWaker {
    fn wake(&self) {}
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_command_sequences_follow_state_machine(
        commands in prop::collection::vec(command_strategy(), 1..24)
    ) {
        let waker: Arc<dyn UiWaker> = Arc::new(NoopWaker);
        let mut playback = Playback::new(
            LoopingSource::new(1_000_000),
            waker,
            Duration::from_millis(1),
        );
        let mut model = TransportState::Stopped;

        for command in commands {
            match command {
                Command::Toggle => {
                    let (next, change) = expected_after_toggle(model);
                    prop_assert_eq!(playback.toggle_playback().unwrap(), change);
                    model = next;
                }
                Command::Stop => {
                    let stopped = playback.stop();
                    prop_assert_eq!(stopped, model != TransportState::Stopped);
                    model = TransportState::Stopped;
                }
                Command::SetSpeed(speed) => {
                    playback.set_speed(Speed::clamped(speed));
                    prop_assert_eq!(playback.speed().get(), speed);
                }
            }

            prop_assert_eq!(playback.state(), model);
            match model {
                TransportState::Stopped => {
                    prop_assert_eq!(playback.tick(), NO_TICK);
                    prop_assert!(!playback.clock_running());
                }
                TransportState::Playing => prop_assert!(playback.clock_running()),
                TransportState::Paused => prop_assert!(!playback.clock_running()),
            }
        }
    }

    #[test]
    fn advance_wraps_to_sum_modulo_length(
        song_length in 1i32..5_000,
        speeds in prop::collection::vec(1u32..=10, 1..600),
    ) {
        let mut transport = Transport::new(LoopingSource::new(song_length));
        prop_assert!(transport.start());
        let mut total: i64 = 0;
        for speed in speeds {
            total += speed as i64;
            let tick = transport.advance(Speed::clamped(speed));
            prop_assert_eq!(tick as i64, total % song_length as i64);
            prop_assert!((0..song_length).contains(&tick));
        }
    }

    #[test]
    fn idempotent_transitions_change_nothing(advances in 0usize..50) {
        let mut transport = Transport::new(LoopingSource::new(3072));
        prop_assert!(!transport.stop());
        prop_assert_eq!(transport.tick(), NO_TICK);

        transport.start();
        for _ in 0..advances {
            transport.advance(Speed::MIN);
        }
        prop_assert!(transport.pause());
        let tick = transport.tick();
        prop_assert!(!transport.pause());
        prop_assert_eq!(transport.tick(), tick);
        prop_assert_eq!(transport.state(), TransportState::Paused);
    }
}
