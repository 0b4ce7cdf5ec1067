use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, [100, 50, 200, 128]);
    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn screenshot_carries_intrinsics_and_data_uri() {
    let buf = png_bytes(12, 7, [0, 0, 0, 255]);
    let shot = Screenshot::decode(&buf).unwrap();
    assert_eq!(shot.intrinsics, ImageIntrinsics::new(12, 7).unwrap());
    assert_eq!(shot.mime, "image/png");
    assert!(shot.data_uri.starts_with("data:image/png;base64,iVBOR"));
}

#[test]
fn non_image_bytes_are_a_decode_error() {
    let err = Screenshot::decode(b"definitely not a picture").unwrap_err();
    assert!(matches!(err, ShotframeError::Decode(_)));
}

#[test]
fn truncated_png_is_a_decode_error() {
    let buf = png_bytes(4, 4, [1, 2, 3, 255]);
    let err = Screenshot::decode(&buf[..20]).unwrap_err();
    assert!(matches!(err, ShotframeError::Decode(_)));
}

#[tokio::test]
async fn load_image_runs_off_the_caller() {
    let shot = load_image(png_bytes(3, 5, [9, 9, 9, 255])).await.unwrap();
    assert_eq!(shot.intrinsics.height_px, 5);
}
