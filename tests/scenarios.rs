mod common;

use ff2sixel::{
    farbfeld::write_farbfeld,
    Color,
    HeaderFault,
    Rgba16,
    SixelEncoder,
    SixelEncoder16,
    SixelError,
};

const OPAQUE: u16 = u16::MAX;
const RED: Rgba16 = [OPAQUE, 0, 0, OPAQUE];
const BLUE: Rgba16 = [0, 0, OPAQUE, OPAQUE];
const CLEAR: Rgba16 = [OPAQUE, OPAQUE, OPAQUE, 0];

fn encode(width: u32, height: u32, pixels: &[Rgba16]) -> Vec<u8> {
    let input = write_farbfeld(width, height, pixels);
    <SixelEncoder>::encode_farbfeld(input.as_slice(), Vec::new()).unwrap()
}

#[test]
fn two_pixels_share_one_line() {
    let out = encode(2, 1, &[RED, BLUE]);
    assert_eq!(out, b"\x1bPq\"1;1;2;1#0;2;99;0;0@#1;2;0;0;99@-\x1b\\");

    let canvas = common::interpret(&out);
    assert_eq!(canvas.carriage_returns, 0);
    assert_eq!(
        canvas.pixels,
        vec![Some(Color::new(99, 0, 0)), Some(Color::new(0, 0, 99))]
    );
}

#[test]
fn transparent_image_has_no_color_directives() {
    let out = encode(4, 12, &[CLEAR; 48]);
    assert_eq!(out, b"\x1bPq\"1;1;4;12--\x1b\\");
}

#[test]
fn partial_last_band() {
    let out = encode(1, 7, &[RED; 7]);
    let canvas = common::interpret(&out);
    assert_eq!(canvas.bands, 2);
    assert!(canvas.draws.iter().all(|&n| n == 1));
}

#[test]
fn long_runs_are_counted() {
    let out = encode(10, 1, &[RED; 10]);
    assert_eq!(out, b"\x1bPq\"1;1;10;1#0;2;99;0;0!10@-\x1b\\");
}

#[test]
fn gaps_are_filled_with_empty_sixels() {
    let mut pixels = [CLEAR; 6];
    pixels[5] = BLUE;
    let out = encode(6, 1, &pixels);
    assert_eq!(out, b"\x1bPq\"1;1;6;1#0;2;0;0;99!5?@-\x1b\\");
}

#[test]
fn wider_span_is_drawn_first() {
    // Blue takes slot 0 but only reaches column 2; red in slot 1 starts at the
    // same column and reaches further, so red is drawn first.
    let pixels = [
        BLUE, BLUE, CLEAR, CLEAR, //
        RED, RED, RED, RED,
    ];
    let out = encode(4, 2, &pixels);
    assert_eq!(
        out,
        b"\x1bPq\"1;1;4;2#1;2;99;0;0!4A$#0;2;0;0;99@@-\x1b\\".as_slice()
    );

    let canvas = common::interpret(&out);
    assert_eq!(canvas.carriage_returns, 1);
    assert_eq!(canvas.draws, vec![1, 1, 0, 0, 1, 1, 1, 1]);
}

#[test]
fn sixteen_registers_cover_many_colors() {
    // 40 distinct greys on one row need at least three generations of 16.
    let pixels = (0..40u16)
        .map(|i| {
            let v = i * 1600;
            [v, v, v, OPAQUE]
        })
        .collect::<Vec<_>>();
    let input = write_farbfeld(40, 1, &pixels);
    let out = <SixelEncoder16>::encode_farbfeld(input.as_slice(), Vec::new()).unwrap();

    let canvas = common::interpret(&out);
    assert!(canvas.introductions >= 40);
    for (drawn, pixel) in canvas.pixels.iter().zip(&pixels) {
        assert_eq!(*drawn, Color::from_rgba16(*pixel));
    }
    assert!(canvas.draws.iter().all(|&n| n == 1));
}

#[test]
fn bad_magic_is_malformed_header() {
    let mut input = write_farbfeld(1, 1, &[RED]);
    input[..8].copy_from_slice(b"farbfelt");
    let err = <SixelEncoder>::encode_farbfeld(input.as_slice(), Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        SixelError::MalformedHeader(HeaderFault::BadMagic)
    ));
    assert_eq!(err.to_string(), "malformed header: invalid magic value");
}

#[test]
fn missing_pixels_are_truncation() {
    let mut input = write_farbfeld(3, 3, &[RED; 9]);
    input.truncate(input.len() - 8);
    let err = <SixelEncoder>::encode_farbfeld(input.as_slice(), Vec::new()).unwrap_err();
    assert!(matches!(err, SixelError::TruncatedInput));
}

#[test]
fn failed_writes_are_output_errors() {
    #[derive(Debug)]
    struct Full;

    impl std::io::Write for Full {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::WriteZero.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let input = write_farbfeld(1, 1, &[RED]);
    let err = <SixelEncoder>::encode_farbfeld(input.as_slice(), Full).unwrap_err();
    assert!(matches!(err, SixelError::Output(_)));
}

#[cfg(feature = "image")]
#[test]
fn encodes_dynamic_images() {
    use image::{
        DynamicImage,
        Rgba,
        RgbaImage,
    };

    let mut image = RgbaImage::new(2, 1);
    image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    image.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

    let sixel = <SixelEncoder>::encode_image(&DynamicImage::ImageRgba8(image)).unwrap();
    assert_eq!(sixel, "\x1bPq\"1;1;2;1#0;2;99;0;0@#1;2;0;0;99@-\x1b\\");
}
