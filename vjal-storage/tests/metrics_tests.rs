use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde_json::{json, Value};
use vjal_storage::telemetry::{STATE_LOAD_TOTAL, STATE_SAVE_TOTAL};
use vjal_storage::StateStore;

fn counter(snapshotter: &Snapshotter, name: &str) -> u64 {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .find(|(key, ..)| key.key().name() == name)
        .map(|(.., value)| match value {
            DebugValue::Counter(n) => n,
            other => panic!("{name} is not a counter: {other:?}"),
        })
        .unwrap_or(0)
}

#[test]
fn saves_and_loads_are_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let store = StateStore::open_temporary().unwrap();

    metrics::with_local_recorder(&recorder, || {
        store.save("form", "page1", &json!({"step": 1})).unwrap();
        store.save("form", "page1", &json!({"step": 2})).unwrap();

        let mut dest = json!(null);
        store.load_into("form", "page1", &mut dest).unwrap();
        store.load_into("form", "missing", &mut dest).unwrap();
        let _: Option<Value> = store.load("form", "page1").unwrap();
    });

    assert_eq!(counter(&snapshotter, STATE_SAVE_TOTAL), 2);
    assert_eq!(counter(&snapshotter, STATE_LOAD_TOTAL), 3);
}

#[test]
fn introspection_is_not_counted() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let store = StateStore::open_temporary().unwrap();
    store.save("form", "page1", &json!(1)).unwrap();

    metrics::with_local_recorder(&recorder, || {
        assert!(store.contains("form", "page1").unwrap());
        assert_eq!(store.len().unwrap(), 1);
    });

    assert_eq!(counter(&snapshotter, STATE_LOAD_TOTAL), 0);
}
