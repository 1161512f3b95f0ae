use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 2,
        fps: Fps::integer(25).unwrap(),
    }
}

#[test]
fn keeps_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &FrameRgb::black(4, 2)).unwrap();
    }
    sink.end().unwrap();
    assert_eq!(sink.frame_count(), 3);
    assert_eq!(sink.frames().len(), 3);
    assert_eq!(sink.frames()[2].0, FrameIndex(2));
    assert!(sink.is_ended());
    assert_eq!(sink.config(), Some(cfg()));
}

#[test]
fn counting_sink_stores_nothing() {
    let mut sink = InMemorySink::counting();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &FrameRgb::black(4, 2)).unwrap();
    sink.push_frame(FrameIndex(1), &FrameRgb::black(4, 2)).unwrap();
    assert_eq!(sink.frame_count(), 2);
    assert!(sink.frames().is_empty());
}

#[test]
fn rejects_out_of_order_and_duplicate_indices() {
    let mut sink = InMemorySink::counting();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(5), &FrameRgb::black(4, 2)).unwrap();
    let err = sink
        .push_frame(FrameIndex(5), &FrameRgb::black(4, 2))
        .unwrap_err();
    assert!(matches!(err, ReelError::Writer(_)));
    assert!(sink.push_frame(FrameIndex(4), &FrameRgb::black(4, 2)).is_err());
}

#[test]
fn rejects_wrong_geometry() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &FrameRgb::black(2, 4)).is_err());
    let short = FrameRgb {
        width: 4,
        height: 2,
        data: vec![0; 4 * 2 * 4],
    };
    assert!(sink.push_frame(FrameIndex(0), &short).is_err());
}

#[test]
fn push_before_begin_fails() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &FrameRgb::black(4, 2)).is_err());
}
