use glam::{IVec3, Vec3};
use serde_json::Value;
use voxwalk_core::SimTick;
use voxwalk_physics::MotionState;
use voxwalk_testkit::{EventRecord, JsonlSink};

#[test]
fn motion_snapshots_stream_as_json_lines() {
    let path = std::env::temp_dir().join(format!(
        "voxwalk-smoke-{}.jsonl",
        std::process::id()
    ));
    let state = MotionState::new(Vec3::new(2.0, 3.0, 1.175), IVec3::new(2, 3, 0)).with_angle(0.5);

    {
        let mut sink = JsonlSink::create(&path).expect("can create temp log");
        for tick in 0..2 {
            sink.write(&EventRecord {
                tick: SimTick(tick),
                kind: "tick",
                payload: &state.snapshot(),
            })
            .expect("can write snapshot");
        }
        assert_eq!(sink.lines(), 2);
    }

    let contents = std::fs::read_to_string(&path).expect("log readable");
    let lines: Vec<Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("line is json"))
        .collect();
    assert_eq!(lines.len(), 2);

    let payload = &lines[1]["payload"];
    assert_eq!(lines[1]["tick"], 1);
    assert_eq!(payload["mode"], "idle");
    assert_eq!(payload["angle"], 0.5);
    assert_eq!(payload["cell"], serde_json::json!([2, 3, 0]));
    assert_eq!(payload["velocity"], serde_json::json!([0.0, 0.0, 0.0]));

    let _ = std::fs::remove_file(&path);
}
