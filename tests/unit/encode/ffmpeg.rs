use super::*;

use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::integer(25).unwrap(),
    }
}

#[test]
fn encoder_args_describe_raw_rgb24_input() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("out/reel.silent.mp4"));
    let args: Vec<String> = sink
        .encoder_args(&cfg(1080, 1920))
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let joined = args.join(" ");
    assert!(joined.starts_with("-y "));
    assert!(joined.contains("-f rawvideo -pix_fmt rgb24 -s 1080x1920 -r 25/1 -i pipe:0"));
    assert!(joined.contains("-an -c:v libx264 -preset medium -crf 23"));
    assert!(joined.contains("-pix_fmt yuv420p -movflags +faststart"));
    assert_eq!(args.last().map(String::as_str), Some("out/reel.silent.mp4"));
}

#[test]
fn begin_rejects_unusable_geometry_before_spawning() {
    for (w, h) in [(0, 2), (2, 0), (3, 4), (4, 5)] {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
            std::env::temp_dir().join("reelstitch_never_written.mp4"),
        ));
        let err = sink.begin(cfg(w, h)).unwrap_err();
        assert!(matches!(err, ReelError::Writer(_)), "{w}x{h}");
    }
}

#[test]
fn push_and_end_before_begin_fail() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    assert!(sink.push_frame(FrameIndex(0), &FrameRgb::black(2, 2)).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn refuses_to_overwrite_when_asked() {
    let dir = std::env::temp_dir().join(format!("reelstitch_ffsink_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("exists.mp4");
    std::fs::write(&out, b"x").unwrap();

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let err = FfmpegSink::new(opts).begin(cfg(2, 2)).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ensure_parent_dir_accepts_bare_file_names() {
    ensure_parent_dir(Path::new("reel.mp4")).unwrap();
}

#[cfg(feature = "media-ffmpeg")]
#[test]
fn writes_silent_stream_and_end_is_idempotent() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let dir = std::env::temp_dir().join(format!("reelstitch_ffsink_ok_{}", std::process::id()));
    let out = dir.join("silent.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(cfg(16, 16)).unwrap();
    for i in 0..10 {
        sink.push_frame(FrameIndex(i), &FrameRgb::black(16, 16)).unwrap();
    }
    sink.end().unwrap();
    sink.end().unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
    let _ = std::fs::remove_dir_all(&dir);
}
