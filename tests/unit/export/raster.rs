use super::*;

fn frame(w: u32, h: u32, px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: px.repeat((w * h) as usize),
        premultiplied: true,
    }
}

#[test]
fn png_decodes_back_to_straight_pixels() {
    let img = RasterImage::from_frame(frame(3, 2, [64, 32, 0, 128])).unwrap();
    assert_eq!(img.pixel(0, 0), Some([128, 64, 0, 128]));
    assert_eq!(img.pixel(3, 0), None);

    let back = image::load_from_memory(&img.png).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (3, 2));
    assert_eq!(back.get_pixel(2, 1).0, [128, 64, 0, 128]);
}

#[test]
fn data_uri_is_png_base64() {
    let img = RasterImage::from_frame(frame(1, 1, [0, 0, 0, 255])).unwrap();
    assert!(img.to_data_uri().starts_with("data:image/png;base64,iVBOR"));
}

#[test]
fn mismatched_frame_is_rejected() {
    let mut f = frame(2, 2, [0, 0, 0, 255]);
    f.data.pop();
    assert!(RasterImage::from_frame(f).is_err());
}

#[test]
fn save_png_writes_the_fixed_file_name() {
    let dir = std::path::PathBuf::from("target").join("unit_export_raster");
    let img = RasterImage::from_frame(frame(2, 2, [255, 255, 255, 255])).unwrap();
    let path = img.save_png(&dir).unwrap();
    assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
    assert_eq!(std::fs::read(&path).unwrap(), img.png);
}
