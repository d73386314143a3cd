use image::AnimationDecoder as _;
use image::codecs::gif::GifDecoder;

use super::*;
use crate::foundation::core::Canvas;

fn out_dir(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target/unit_gif")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        canvas: Canvas { width, height },
        frame_delay_ms: 500,
        loop_forever: true,
    }
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width,
        height,
        data: rgba.repeat((width * height) as usize),
        premultiplied: true,
    }
}

#[test]
fn writes_looping_gif_with_fixed_delay() {
    let path = out_dir("looping").join("nested/anim.gif");
    let mut sink = GifSink::new(&path, true);
    sink.begin(cfg(8, 6)).unwrap();
    sink.push_frame(0, &solid(8, 6, [255, 0, 0, 255])).unwrap();
    sink.push_frame(1, &solid(8, 6, [0, 0, 255, 255])).unwrap();
    sink.push_frame(2, &solid(8, 6, [0, 255, 0, 255])).unwrap();
    sink.end().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
    assert!(bytes.windows(11).any(|w| w == b"NETSCAPE2.0"));

    let decoder = GifDecoder::new(std::io::Cursor::new(bytes)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 3);
    for f in &frames {
        assert_eq!(f.delay().numer_denom_ms(), (500, 1));
        assert_eq!(f.buffer().dimensions(), (8, 6));
    }
    let first = frames[0].buffer().get_pixel(3, 3).0;
    assert!(first[0] > 200 && first[1] < 50 && first[2] < 50);
    let second = frames[1].buffer().get_pixel(3, 3).0;
    assert!(second[2] > 200 && second[0] < 50);
}

#[test]
fn play_once_omits_loop_extension() {
    let path = out_dir("once").join("anim.gif");
    let mut sink = GifSink::new(&path, true);
    sink.begin(SinkConfig {
        loop_forever: false,
        ..cfg(4, 4)
    })
    .unwrap();
    sink.push_frame(0, &solid(4, 4, [0, 0, 0, 255])).unwrap();
    sink.end().unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(!bytes.windows(11).any(|w| w == b"NETSCAPE2.0"));
}

#[test]
fn rejects_wrong_size_and_out_of_order_frames() {
    let path = out_dir("order").join("anim.gif");
    let mut sink = GifSink::new(&path, true);
    sink.begin(cfg(4, 4)).unwrap();
    assert!(matches!(
        sink.push_frame(0, &solid(5, 4, [0, 0, 0, 255])),
        Err(FloodError::Validation(_))
    ));
    assert!(matches!(
        sink.push_frame(1, &solid(4, 4, [0, 0, 0, 255])),
        Err(FloodError::Validation(_))
    ));
    sink.push_frame(0, &solid(4, 4, [0, 0, 0, 255])).unwrap();
    assert!(matches!(
        sink.push_frame(0, &solid(4, 4, [0, 0, 0, 255])),
        Err(FloodError::Validation(_))
    ));
}

#[test]
fn refuses_to_overwrite_when_disabled() {
    let dir = out_dir("no_overwrite");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("anim.gif");
    std::fs::write(&path, b"keep").unwrap();

    let mut sink = GifSink::new(&path, false);
    assert!(matches!(sink.begin(cfg(4, 4)), Err(FloodError::Validation(_))));
    assert_eq!(std::fs::read(&path).unwrap(), b"keep");
}

#[test]
fn nothing_is_written_without_frames() {
    let path = out_dir("empty").join("anim.gif");
    let mut sink = GifSink::new(&path, true);
    sink.begin(cfg(4, 4)).unwrap();
    assert!(matches!(sink.end(), Err(FloodError::Encode(_))));
    assert!(!path.exists());
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = GifSink::new(out_dir("unbegun").join("a.gif"), true);
    assert!(sink.push_frame(0, &solid(1, 1, [0, 0, 0, 255])).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn flatten_premul_over_black_produces_expected_rgb() {
    let src = [128u8, 0, 0, 128];
    let out = flatten_to_opaque_rgba8(&src, true, Rgb8::new(0, 0, 0));
    assert_eq!(out, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_straight_over_white_mixes_background() {
    let src = [255u8, 0, 0, 128];
    let out = flatten_to_opaque_rgba8(&src, false, Rgb8::new(255, 255, 255));
    assert_eq!(out, vec![255, 127, 127, 255]);
}

#[test]
fn transparent_pixels_become_background() {
    let src = [0u8, 0, 0, 0];
    let out = flatten_to_opaque_rgba8(&src, true, Rgb8::new(10, 20, 30));
    assert_eq!(out, vec![10, 20, 30, 255]);
}
