use super::*;

use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::core::Fps;
use crate::plan::assets::AssetSet;
use crate::plan::builder::{FrameRounding, build_plan};
use crate::subtitle::srt::Cue;
use crate::encode::sink::InMemorySink;

const FONT_CANDIDATES: &[&str] = &[
    "assets/fonts/Roboto-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
];

struct Fixture {
    dir: PathBuf,
    config: ReelConfig,
    plan: RenderPlan,
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn fixture(tag: &str) -> Option<Fixture> {
    let font = FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())?;
    let dir = std::env::temp_dir().join(format!("reelstitch_rp_{tag}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let colors = [[200u8, 40, 40], [40, 200, 90]];
    let mut images = Vec::new();
    for (i, c) in colors.iter().enumerate() {
        let path = dir.join(format!("image_{}.png", i + 1));
        image::RgbImage::from_fn(24, 40, |x, y| {
            image::Rgb([c[0], c[1].wrapping_add((x * 3) as u8), c[2].wrapping_add(y as u8)])
        })
        .save(&path)
        .unwrap();
        images.push(path);
    }

    let mut config = ReelConfig {
        width: 48,
        height: 80,
        fade_frames: 3,
        ..ReelConfig::default()
    };
    config.caption.font_path = font;
    config.caption.font_size = 10.0;
    config.caption.outline_radius = 2;

    let cues = vec![
        Cue {
            index: 1,
            start: Duration::ZERO,
            end: Duration::from_millis(400),
            text: "first scene".to_string(),
        },
        Cue {
            index: 2,
            start: Duration::from_millis(400),
            end: Duration::from_millis(1000),
            text: "second".to_string(),
        },
    ];
    let assets = AssetSet::new(images, dir.join("a.mp3"), dir.join("s.srt")).unwrap();
    let plan = build_plan(
        &assets,
        cues,
        Fps::integer(25).unwrap(),
        FrameRounding::PerCue,
    )
    .unwrap();
    Some(Fixture { dir, config, plan })
}

#[test]
fn sequential_render_pushes_every_frame_in_order() {
    let Some(fx) = fixture("seq") else {
        eprintln!("skipping: no system font available");
        return;
    };
    let mut sink = InMemorySink::new();
    let stats = render_plan(&fx.plan, &fx.config, &mut sink, &RenderThreading::default()).unwrap();

    assert_eq!(stats.cues, 2);
    assert_eq!(stats.frames, 10 + 15);
    assert_eq!(sink.frame_count(), 25);
    assert!(sink.is_ended());
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(*idx, FrameIndex(i as u64));
        assert_eq!((frame.width, frame.height), (48, 80));
    }
    // Every cue starts from black.
    assert!(sink.frames()[0].1.data.iter().all(|&c| c == 0));
    assert!(sink.frames()[10].1.data.iter().all(|&c| c == 0));
}

#[test]
fn parallel_render_matches_sequential() {
    let Some(fx) = fixture("par") else {
        eprintln!("skipping: no system font available");
        return;
    };
    let mut seq = InMemorySink::new();
    let a = render_plan(&fx.plan, &fx.config, &mut seq, &RenderThreading::default()).unwrap();

    let mut par = InMemorySink::new();
    let threading = RenderThreading {
        parallel: true,
        chunk_size: 4,
        threads: Some(3),
    };
    let b = render_plan(&fx.plan, &fx.config, &mut par, &threading).unwrap();

    assert_eq!(a, b);
    assert_eq!(seq.frames(), par.frames());
}

#[test]
fn digest_is_reproducible() {
    let Some(fx) = fixture("digest") else {
        eprintln!("skipping: no system font available");
        return;
    };
    let mut s1 = InMemorySink::counting();
    let mut s2 = InMemorySink::counting();
    let a = render_plan(&fx.plan, &fx.config, &mut s1, &RenderThreading::default()).unwrap();
    let b = render_plan(&fx.plan, &fx.config, &mut s2, &RenderThreading::default()).unwrap();
    assert_eq!(a.digest, b.digest);
    assert_ne!(a.digest, 0);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert_eq!(normalized_chunk_size(0), 1);
}

#[test]
fn undecodable_image_aborts_the_render() {
    let Some(fx) = fixture("bad") else {
        eprintln!("skipping: no system font available");
        return;
    };
    std::fs::write(&fx.plan.scenes[1].image_path, b"broken").unwrap();
    let mut sink = InMemorySink::counting();
    let err = render_plan(&fx.plan, &fx.config, &mut sink, &RenderThreading::default())
        .unwrap_err();
    assert!(matches!(err, ReelError::Decode { .. }));
    assert_eq!(sink.frame_count(), 10);
    assert!(!sink.is_ended());
}
