use super::*;

const TWO_CUES: &str = "1\n00:00:00,000 --> 00:00:01,000\nHello there\n\n2\n00:00:01,000 --> 00:00:02,500\nSecond line\nwraps here\n";

#[test]
fn parses_blocks_in_file_order() {
    let cues = parse_srt_str(TWO_CUES, ParseMode::Strict).unwrap();
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].index, 1);
    assert_eq!(cues[0].text, "Hello there");
    assert_eq!(cues[0].duration(), Duration::from_secs(1));
    assert_eq!(cues[1].start, Duration::from_secs(1));
    assert_eq!(cues[1].end, Duration::from_millis(2500));
    assert_eq!(cues[1].text, "Second line wraps here");
}

#[test]
fn tolerates_bom_crlf_and_extra_blank_lines() {
    let text = "\u{feff}1\r\n00:00:00,000 --> 00:00:01,000\r\nA\r\n\r\n\r\n\r\n2\r\n00:00:01.000 --> 00:00:02.000\r\nB\r\n";
    let cues = parse_srt_str(text, ParseMode::Strict).unwrap();
    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text, "A");
    assert_eq!(cues[1].start, Duration::from_secs(1));
}

#[test]
fn unterminated_last_block_is_flushed() {
    let cues = parse_srt_str("7\n00:00:03,000 --> 00:00:04,000\nTail", ParseMode::Strict).unwrap();
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].index, 7);
}

#[test]
fn empty_input_yields_no_cues() {
    assert!(parse_srt_str("", ParseMode::Strict).unwrap().is_empty());
    assert!(parse_srt_str("\n\n", ParseMode::Lenient).unwrap().is_empty());
}

#[test]
fn strict_rejects_malformed_index_with_line_number() {
    let err = parse_srt_str(
        "1\n00:00:00,000 --> 00:00:01,000\nA\n\nx\n00:00:01,000 --> 00:00:02,000\nB\n",
        ParseMode::Strict,
    )
    .unwrap_err();
    match err {
        ReelError::Parse { line, .. } => assert_eq!(line, 5),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn strict_rejects_bad_range_empty_text_and_reversed_times() {
    assert!(parse_srt_str("1\n00:00:00 -> 00:00:01\nA\n", ParseMode::Strict).is_err());
    assert!(parse_srt_str("1\n00:00:02,000 --> 00:00:01,000\nA\n", ParseMode::Strict).is_err());
    assert!(parse_srt_str("1\n00:00:01,000 --> 00:00:01,000\nA\n", ParseMode::Strict).is_err());
    assert!(parse_srt_str("1\n00:00:00,000 --> 00:00:01,000\n", ParseMode::Strict).is_err());
    assert!(parse_srt_str("1\n", ParseMode::Strict).is_err());
}

#[test]
fn strict_rejects_non_increasing_indices() {
    let text = "2\n00:00:00,000 --> 00:00:01,000\nA\n\n2\n00:00:01,000 --> 00:00:02,000\nB\n";
    let err = parse_srt_str(text, ParseMode::Strict).unwrap_err();
    assert_eq!(err.kind(), crate::foundation::error::ErrorKind::Parse);
}

#[test]
fn lenient_drops_blocks_with_malformed_index() {
    let text = "x\n00:00:00,000 --> 00:00:01,000\nDropped\n\n2\n00:00:01,000 --> 00:00:02,000\nKept\n";
    let cues = parse_srt_str(text, ParseMode::Lenient).unwrap();
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Kept");
}

#[test]
fn lenient_zeroes_malformed_timestamps() {
    let cues = parse_srt_str("1\nbogus --> 00:00:01,000\nA\n", ParseMode::Lenient).unwrap();
    assert_eq!(cues[0].start, Duration::ZERO);
    assert_eq!(cues[0].end, Duration::from_secs(1));

    let cues = parse_srt_str("1\nnot a range\nA\n", ParseMode::Lenient).unwrap();
    assert_eq!(cues[0].duration(), Duration::ZERO);
}

#[test]
fn cue_count_matches_blocks_with_nonzero_index() {
    let text = "1\n00:00:00,000 --> 00:00:01,000\nA\n\n0\n00:00:01,000 --> 00:00:02,000\nB\n\n3\n00:00:02,000 --> 00:00:03,000\nC\n";
    let cues = parse_srt_str(text, ParseMode::Lenient).unwrap();
    assert_eq!(cues.iter().map(|c| c.index).collect::<Vec<_>>(), vec![1, 3]);
}

#[test]
fn range_ignores_position_hints() {
    let cues = parse_srt_str(
        "1\n00:00:00,000 --> 00:00:01,000 X1:10 X2:20\nA\n",
        ParseMode::Strict,
    )
    .unwrap();
    assert_eq!(cues[0].end, Duration::from_secs(1));
}

#[test]
fn timestamp_parsing_accepts_both_separators() {
    assert_eq!(
        parse_timestamp("01:02:03,004"),
        Some(Duration::from_millis(3_723_004))
    );
    assert_eq!(
        parse_timestamp("00:00:01.5"),
        Some(Duration::from_millis(1500))
    );
    assert_eq!(parse_timestamp("00:61:00,000"), None);
    assert_eq!(parse_timestamp("00:00:00,0000"), None);
    assert_eq!(parse_timestamp("garbage"), None);
}

#[test]
fn format_timestamp_pads_fields() {
    assert_eq!(format_timestamp(Duration::ZERO), "00:00:00,000");
    assert_eq!(format_timestamp(Duration::from_millis(3_723_004)), "01:02:03,004");
    assert_eq!(format_timestamp(Duration::from_millis(90_061_001)), "25:01:01,001");
}

#[test]
fn written_srt_parses_back() {
    let cues = parse_srt_str(TWO_CUES, ParseMode::Strict).unwrap();
    let text = to_srt_string(&cues);
    assert!(text.starts_with("1\n00:00:00,000 --> 00:00:01,000\nHello there\n\n"));
    assert_eq!(parse_srt_str(&text, ParseMode::Strict).unwrap(), cues);
}

#[test]
fn missing_file_is_a_parse_error() {
    let err = parse_srt_file(Path::new("/nonexistent/subtitles.srt"), ParseMode::Strict)
        .unwrap_err();
    assert!(matches!(err, ReelError::Parse { line: 0, .. }));
}
