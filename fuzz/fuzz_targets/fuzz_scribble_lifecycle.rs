#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scribble_core::{
    SAMPLE_INTERVAL, Scribble, ScribbleColor, ScribbleError, ScribbleId, ScribbleManager,
    ScribbleSettings, ScribbleState,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Open { session: u8, laser: bool, delay_ms: u16, shrink: Option<u8> },
    NewSession,
    Point { target: u8, x: i16, y: i16 },
    Stop { target: u8 },
    StopAll,
    Tick { micros: u32 },
    Prune,
    ToggleLaserKeep,
}

#[derive(Debug, Arbitrary)]
struct Input {
    laser_keep: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut manager = ScribbleManager::new(
        ScribbleSettings::default().with_laser_keep_delay_after_stop(input.laser_keep),
    );
    let mut sessions = vec![manager.create_session()];
    let mut opened: Vec<ScribbleId> = Vec::new();

    for op in input.ops.into_iter().take(2048) {
        match op {
            Op::Open { session, laser, delay_ms, shrink } => {
                let session = sessions[usize::from(session) % sessions.len()];
                let color = if laser { ScribbleColor::Laser } else { ScribbleColor::Accent };
                let scribble = Scribble::default()
                    .with_color(color)
                    .with_delay(Duration::from_millis(u64::from(delay_ms)))
                    .with_shrink(shrink.map(|s| f64::from(s) / 256.0));
                if let Ok(id) = manager.add_scribble(session, scribble) {
                    opened.push(id);
                }
            }
            Op::NewSession => sessions.push(manager.create_session()),
            Op::Point { target, x, y } => {
                if let Some(id) = pick(&opened, target) {
                    let live = manager.arena().find_item(id).is_some();
                    let result = manager.add_point(id, f64::from(x), f64::from(y));
                    assert_eq!(result.is_ok(), live);
                }
            }
            Op::Stop { target } => {
                if let Some(id) = pick(&opened, target) {
                    match manager.stop(id) {
                        Ok(item) => assert_eq!(item.scribble.state, ScribbleState::Stopping),
                        Err(err) => {
                            assert_eq!(err, ScribbleError::NotFound { id });
                            assert!(manager.arena().find_item(id).is_none());
                        }
                    }
                }
            }
            Op::StopAll => {
                manager.stop_all();
            }
            Op::Tick { micros } => {
                let before = manager.arena().len();
                let summary = manager.tick(Duration::from_micros(u64::from(micros % 100_000)));
                assert_eq!(summary.ticked, before);
                assert!(summary.vanished <= before);
            }
            Op::Prune => {
                for id in manager.prune_vanished() {
                    assert!(manager.arena().find_item(id).is_none());
                }
            }
            Op::ToggleLaserKeep => manager
                .settings()
                .update(|s| s.laser_keep_delay_after_stop = !s.laser_keep_delay_after_stop),
        }

        // Post-conditions that must always hold:
        for item in manager.arena().items() {
            assert!(item.timeout() < SAMPLE_INTERVAL, "accumulator escaped");
            assert!(item.scribble.size >= 1.0, "size decayed below 1");
            assert!(item.scribble.state != ScribbleState::Paused, "engine paused an item");
        }
    }
});

fn pick(ids: &[ScribbleId], index: u8) -> Option<ScribbleId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[usize::from(index) % ids.len()])
    }
}
