use super::*;

fn job() -> EncodeJob {
    EncodeJob {
        edge_id: "a__b".to_owned(),
        frames_dir: PathBuf::from("/tmp/work/frames/a__b"),
        forward: PathBuf::from("/tmp/work/out/transition_a-b.webm"),
        backward: PathBuf::from("/tmp/work/out/transition_b-a.webm"),
    }
}

#[test]
fn default_config_is_valid() {
    let cfg = EncodeConfig::default();
    cfg.validate().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps, cfg.crf), (1024, 1024, 60, 30));
    assert_eq!(cfg.join_timeout(), Duration::from_secs(21_600));
}

#[test]
fn config_validation_catches_bad_values() {
    let base = EncodeConfig::default();
    for bad in [
        EncodeConfig { width: 0, ..base.clone() },
        EncodeConfig { width: 1023, ..base.clone() },
        EncodeConfig { fps: 0, ..base.clone() },
        EncodeConfig { crf: 64, ..base.clone() },
        EncodeConfig { poll_interval_ms: 0, ..base.clone() },
        EncodeConfig { program: " ".to_owned(), ..base.clone() },
    ] {
        assert!(bad.validate().is_err(), "{bad:?} should be rejected");
    }
}

#[test]
fn partial_config_fills_defaults() {
    let cfg: EncodeConfig = serde_json::from_str(r#"{"crf": 20}"#).unwrap();
    assert_eq!(cfg.crf, 20);
    assert_eq!(cfg.program, "ffmpeg");
}

#[test]
fn script_encodes_reverses_and_records_status() {
    let script = encoder_script(
        &EncodeConfig::default(),
        &job(),
        Path::new("/tmp/work/encoders/a__b.status"),
    );
    assert!(script.starts_with("#!/bin/sh\n"));
    assert!(script.contains(
        "'ffmpeg' -nostdin -y -hide_banner -loglevel error -r 60 -f image2 -s 1024x1024 \
         -i '/tmp/work/frames/a__b/%04d.png' -vcodec libvpx-vp9 -crf 30 -pix_fmt yuv420p \
         '/tmp/work/out/transition_a-b.webm' || status=$?"
    ));
    assert!(script.contains("-vf reverse '/tmp/work/out/transition_b-a.webm'"));
    assert!(script.contains("rm -rf '/tmp/work/frames/a__b'"));
    assert!(script.contains("mv '/tmp/work/encoders/a__b.status.tmp' '/tmp/work/encoders/a__b.status'"));
}

#[test]
fn quoting_escapes_single_quotes() {
    assert_eq!(sh_quote("it's"), r"'it'\''s'");
    assert_eq!(sh_quote("plain"), "'plain'");
}
