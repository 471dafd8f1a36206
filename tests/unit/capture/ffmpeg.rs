use std::path::PathBuf;

use super::*;

fn target(width: u32, height: u32, fps: u32) -> SinkTarget {
    SinkTarget {
        path: PathBuf::from("target/ffmpeg_unit/out.mp4"),
        width,
        height,
        fps,
        background_rgba: [255, 255, 255, 255],
    }
}

#[test]
fn args_describe_the_target() {
    let t = target(800, 800, 24);
    let args = ffmpeg_args(&t, false);
    let args: Vec<&str> = args.iter().filter_map(|a| a.to_str()).collect();

    assert_eq!(args[0], "-n");
    let after = |flag: &str| {
        let at = args.iter().position(|a| *a == flag).unwrap();
        args[at + 1]
    };
    assert_eq!(after("-s"), "800x800");
    assert_eq!(after("-r"), "24");
    assert_eq!(after("-c:v"), "libx264");
    assert_eq!(args.last().copied(), Some("target/ffmpeg_unit/out.mp4"));
    assert!(args.windows(2).any(|w| w == ["-pix_fmt", "yuv420p"]));

    assert_eq!(ffmpeg_args(&t, true)[0], "-y");
}

#[test]
fn bad_targets_fail_before_ffmpeg_starts() {
    for bad in [target(0, 10, 30), target(11, 10, 30), target(10, 10, 0)] {
        assert!(matches!(
            FfmpegSink::spawn(&bad, true),
            Err(FractreeError::Validation(_))
        ));
    }
}

#[test]
fn existing_file_is_kept_without_overwrite() {
    let mut t = target(16, 16, 10);
    t.path = PathBuf::from("target/ffmpeg_unit/keep.mp4");
    std::fs::create_dir_all("target/ffmpeg_unit").unwrap();
    std::fs::write(&t.path, b"previous").unwrap();

    assert!(matches!(
        FfmpegSink::spawn(&t, false),
        Err(FractreeError::Validation(_))
    ));
    assert_eq!(std::fs::read(&t.path).unwrap(), b"previous");
}

#[test]
fn opaque_pixels_pass_through() {
    let mut out = vec![0u8; 4];
    composite_over(&mut out, &[10, 20, 30, 255], true, [255, 255, 255, 255]).unwrap();
    assert_eq!(out, vec![10, 20, 30, 255]);
}

#[test]
fn transparent_pixels_become_background() {
    let mut out = vec![0u8; 4];
    composite_over(&mut out, &[0, 0, 0, 0], true, [12, 34, 56, 255]).unwrap();
    assert_eq!(out, vec![12, 34, 56, 255]);
}

#[test]
fn half_alpha_blends_for_both_alpha_modes() {
    // Premultiplied red at 50% over black keeps its stored channel.
    let mut out = vec![0u8; 4];
    composite_over(&mut out, &[128, 0, 0, 128], true, [0, 0, 0, 255]).unwrap();
    assert_eq!(out, vec![128, 0, 0, 255]);

    // Straight red at 50% over black is scaled by alpha first.
    composite_over(&mut out, &[255, 0, 0, 128], false, [0, 0, 0, 255]).unwrap();
    assert_eq!(out, vec![128, 0, 0, 255]);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let mut out = vec![0u8; 8];
    assert!(composite_over(&mut out, &[0u8; 4], true, [0, 0, 0, 255]).is_err());
}

#[test]
fn ffmpeg_sink_writes_an_mp4_when_available() {
    let mut factory = FfmpegSinkFactory::default();
    if factory.check_available().is_err() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }

    let mut t = target(16, 16, 10);
    t.path = PathBuf::from("target").join("ffmpeg_unit").join("solid.mp4");
    let _ = std::fs::remove_file(&t.path);

    let mut sink = factory.open(&t).unwrap();
    let frame = FrameRgba {
        width: 16,
        height: 16,
        data: vec![200u8; 16 * 16 * 4],
        premultiplied: true,
    };
    for _ in 0..5 {
        sink.push_frame(&frame).unwrap();
    }
    let wrong = FrameRgba {
        width: 8,
        height: 8,
        data: vec![0u8; 8 * 8 * 4],
        premultiplied: true,
    };
    assert!(sink.push_frame(&wrong).is_err());
    sink.finish().unwrap();
    assert!(std::fs::metadata(&t.path).unwrap().len() > 0);
}
