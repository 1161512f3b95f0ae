use super::*;

#[test]
fn defaults_are_valid_portrait_25fps() {
    let cfg = ReelConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas().width, VIDEO_WIDTH);
    assert_eq!(cfg.canvas().height, VIDEO_HEIGHT);
    assert_eq!(cfg.fps().unwrap().num, FRAME_RATE);
    assert_eq!(cfg.parse_mode, ParseMode::Strict);
    assert_eq!(cfg.rounding, FrameRounding::PerCue);
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = ReelConfig::from_json_str(
        r#"{ "width": 540, "height": 960, "caption": { "max_line_chars": 12 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.width, 540);
    assert_eq!(cfg.height, 960);
    assert_eq!(cfg.caption.max_line_chars, 12);
    assert_eq!(cfg.caption.font_size, FONT_SIZE);
    assert_eq!(cfg.fade_frames, FADE_FRAMES);
}

#[test]
fn enums_use_snake_case() {
    let cfg = ReelConfig::from_json_str(
        r#"{ "parse_mode": "lenient", "rounding": "carry_remainder" }"#,
    )
    .unwrap();
    assert_eq!(cfg.parse_mode, ParseMode::Lenient);
    assert_eq!(cfg.rounding, FrameRounding::CarryRemainder);
}

#[test]
fn validation_catches_bad_values() {
    let odd = ReelConfig {
        width: 1081,
        ..ReelConfig::default()
    };
    assert!(odd.validate().is_err());

    let zero_fps = ReelConfig {
        frame_rate: 0,
        ..ReelConfig::default()
    };
    assert!(zero_fps.validate().is_err());

    let mut shrink = ReelConfig::default();
    shrink.motion.max_zoom = 0.9;
    assert!(shrink.validate().is_err());

    let mut no_wrap = ReelConfig::default();
    no_wrap.caption.max_line_chars = 0;
    assert!(no_wrap.validate().is_err());
}

#[test]
fn outline_radius_is_bounded() {
    let mut cfg = ReelConfig::default();
    cfg.caption.outline_radius = MAX_OUTLINE_RADIUS;
    cfg.validate().unwrap();

    cfg.caption.outline_radius = 50_000;
    assert!(matches!(cfg.validate().unwrap_err(), ReelError::Validation(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = ReelConfig::from_json_str(r#"{ "widht": 10 }"#).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}
