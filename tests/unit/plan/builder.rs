use super::*;

fn cue(index: u32, start_ms: u64, end_ms: u64) -> Cue {
    Cue {
        index,
        start: Duration::from_millis(start_ms),
        end: Duration::from_millis(end_ms),
        text: format!("cue {index}"),
    }
}

fn assets(n: usize) -> AssetSet {
    AssetSet {
        images: (1..=n).map(|i| PathBuf::from(format!("image_{i}.png"))).collect(),
        audio: PathBuf::from("narration.mp3"),
        subtitles: PathBuf::from("subtitles.srt"),
    }
}

fn fps25() -> Fps {
    Fps::integer(25).unwrap()
}

#[test]
fn count_mismatch_is_reported_both_ways() {
    let err = build_plan(
        &assets(3),
        vec![cue(1, 0, 1000), cue(2, 1000, 2000)],
        fps25(),
        FrameRounding::PerCue,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ReelError::Mismatch {
            image_count: 3,
            cue_count: 2
        }
    ));

    let err = build_plan(
        &assets(2),
        vec![cue(1, 0, 1000), cue(2, 1000, 2000), cue(3, 2000, 3000)],
        fps25(),
        FrameRounding::PerCue,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ReelError::Mismatch {
            image_count: 2,
            cue_count: 3
        }
    ));
}

#[test]
fn frame_counts_follow_duration() {
    let plan = build_plan(
        &assets(3),
        vec![cue(1, 0, 2000), cue(2, 2000, 2010), cue(3, 2010, 3510)],
        fps25(),
        FrameRounding::PerCue,
    )
    .unwrap();
    let counts: Vec<u64> = plan.scenes.iter().map(|s| s.frame_count).collect();
    assert_eq!(counts, vec![50, 1, 38]);
    assert_eq!(plan.scenes[2].first_frame, FrameIndex(51));
    assert_eq!(plan.scenes[1].image_path, PathBuf::from("image_2.png"));
}

#[test]
fn one_second_and_a_half_gives_63_frames() {
    let plan = build_plan(
        &assets(2),
        vec![cue(1, 0, 1000), cue(2, 1000, 2500)],
        fps25(),
        FrameRounding::PerCue,
    )
    .unwrap();
    assert_eq!(plan.total_frames(), 63);
    assert!((plan.duration_secs() - 2.52).abs() < 1e-9);
}

#[test]
fn carry_remainder_limits_drift() {
    let cues = || vec![cue(1, 0, 500), cue(2, 500, 1000), cue(3, 1000, 1500)];

    let per_cue = build_plan(&assets(3), cues(), fps25(), FrameRounding::PerCue).unwrap();
    assert_eq!(per_cue.total_frames(), 39);

    let carry = build_plan(&assets(3), cues(), fps25(), FrameRounding::CarryRemainder).unwrap();
    let counts: Vec<u64> = carry.scenes.iter().map(|s| s.frame_count).collect();
    assert_eq!(counts, vec![13, 12, 13]);
    assert_eq!(carry.total_frames(), 38);
}

#[test]
fn carry_remainder_keeps_one_frame_floor() {
    let plan = build_plan(
        &assets(2),
        vec![cue(1, 0, 10), cue(2, 10, 20)],
        fps25(),
        FrameRounding::CarryRemainder,
    )
    .unwrap();
    assert!(plan.scenes.iter().all(|s| s.frame_count >= 1));
}

#[test]
fn empty_plan_is_empty() {
    let plan = build_plan(&assets(0), Vec::new(), fps25(), FrameRounding::PerCue).unwrap();
    assert!(plan.scenes.is_empty());
    assert_eq!(plan.total_frames(), 0);
}

#[test]
fn plan_serializes_to_json() {
    let plan = build_plan(&assets(1), vec![cue(1, 0, 1000)], fps25(), FrameRounding::PerCue)
        .unwrap();
    let v = serde_json::to_value(&plan).unwrap();
    assert_eq!(v["scenes"][0]["frame_count"], 25);
    assert_eq!(v["scenes"][0]["cue"]["end"], 1.0);
    assert_eq!(v["fps"]["num"], 25);
}
