//! Tests for the slicing service

extern crate std;

use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};

use crate::errors::SliceError;
use crate::geometry::Region;
use super::*;

/// Encodes a gradient image whose red/green channels encode the column/row
fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, (x / 256) as u8])
    });
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn read_entry(archive: &[u8], name: &str) -> DynamicImage {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut data = Vec::new();
    entry.read_to_end(&mut data).unwrap();
    image::load_from_memory(&data).unwrap()
}

fn entry_names(archive: &[u8]) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    (0..zip.len()).map(|i| zip.by_index(i).unwrap().name().to_string()).collect()
}

#[test]
fn test_coords_parse_camel_case() {
    let coords = SliceCoords::from_json(r#"{"yRois":[[150,450],[450,600]],"xRoi":null}"#).unwrap();
    std::assert_eq!(coords.y_rois, vec![[150, 450], [450, 600]]);
    std::assert_eq!(coords.x_roi, None);

    let coords = SliceCoords::from_json(r#"{"yRois":[[0,600]],"xRoi":[100,700]}"#).unwrap();
    std::assert_eq!(coords.x_roi, Some([100, 700]));
}

#[test]
fn test_coords_missing_crop_means_none() {
    let coords = SliceCoords::from_json(r#"{"yRois":[[0,10]]}"#).unwrap();
    std::assert!(coords.x_roi.is_none());
}

#[test]
fn test_coords_rejects_malformed_json() {
    std::assert!(matches!(SliceCoords::from_json("{yRois:"), Err(SliceError::InvalidCoordinates(_))));
    std::assert!(matches!(SliceCoords::from_json(r#"{"yRois":[[1]]}"#), Err(SliceError::InvalidCoordinates(_))));
    std::assert!(matches!(SliceCoords::from_json(r#"{"yRois":[[1.5,2]]}"#), Err(SliceError::InvalidCoordinates(_))));
    std::assert!(matches!(SliceCoords::from_json(r#"{"yRois":[]}"#), Err(SliceError::NoBands)));
}

#[test]
fn test_coords_json_round_trip_keys() {
    let json = SliceCoords::new(vec![[1, 2]], Some([3, 4])).to_json().unwrap();
    std::assert_eq!(json, r#"{"yRois":[[1,2]],"xRoi":[3,4]}"#);
}

#[test]
fn test_plan_full_width_without_crop() {
    let coords = SliceCoords::new(vec![[150, 450], [450, 600]], None);
    let plans = plan_slices(&coords, 800, 600, SliceFormat::Png).unwrap();

    std::assert_eq!(plans.len(), 2);
    std::assert_eq!(plans[0].name, "slice_1.png");
    std::assert_eq!(plans[0].region, Region::new(0, 150, 800, 300));
    std::assert_eq!(plans[1].name, "slice_2.png");
    std::assert_eq!(plans[1].region, Region::new(0, 450, 800, 150));
}

#[test]
fn test_plan_applies_crop_to_every_band() {
    let coords = SliceCoords::new(vec![[0, 600], [10, 20]], Some([100, 700]));
    let plans = plan_slices(&coords, 800, 600, SliceFormat::Tiff).unwrap();

    std::assert_eq!(plans[0].region, Region::new(100, 0, 600, 600));
    std::assert_eq!(plans[1].region, Region::new(100, 10, 600, 10));
    std::assert_eq!(plans[1].name, "slice_2.tiff");
}

#[test]
fn test_plan_rejects_empty_and_out_of_range() {
    let cases = [
        SliceCoords::new(vec![[600, 600]], None),
        SliceCoords::new(vec![[450, 300]], None),
        SliceCoords::new(vec![[-1, 100]], None),
        SliceCoords::new(vec![[0, 601]], None),
        SliceCoords::new(vec![[0, 100]], Some([700, 700])),
        SliceCoords::new(vec![[0, 100]], Some([100, 801])),
        SliceCoords::new(vec![[0, 100]], Some([5_000_000_000, 5_000_000_010])),
        SliceCoords::new(vec![[0, 5_000_000_000]], None),
    ];
    for coords in cases.iter() {
        let result = plan_slices(coords, 800, 600, SliceFormat::Png);
        std::assert!(matches!(result, Err(SliceError::InvalidRegion(_))), "{:?}", coords);
    }
}

#[test]
fn test_plan_accepts_single_pixel_band_at_bottom() {
    let coords = SliceCoords::new(vec![[599, 600]], None);
    let plans = plan_slices(&coords, 800, 600, SliceFormat::Png).unwrap();
    std::assert_eq!(plans[0].region, Region::new(0, 599, 800, 1));
}

#[test]
fn test_encoder_crops_from_original_pixels() {
    let source = image::load_from_memory(&gradient_png(300, 200)).unwrap();
    let plan = SlicePlan { index: 1, name: "slice_1.png".to_string(), region: Region::new(100, 50, 20, 10) };

    let slice = SliceEncoder::new(SliceFormat::Png).encode_one(&source, &plan).unwrap();
    let decoded = image::load_from_memory(&slice.data).unwrap();

    std::assert_eq!(decoded.dimensions(), (20, 10));
    std::assert_eq!(decoded.to_rgb8().get_pixel(0, 0), &Rgb([100, 50, 0]));
    std::assert_eq!(decoded.to_rgb8().get_pixel(19, 9), &Rgb([119, 59, 0]));
}

#[test]
fn test_encode_all_keeps_plan_order_and_reports_progress() {
    struct Counter(AtomicUsize);
    impl SliceObserver for Counter {
        fn slice_encoded(&self, _plan: &SlicePlan, _encoded_bytes: usize) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    let source = image::load_from_memory(&gradient_png(64, 64)).unwrap();
    let coords = SliceCoords::new((0..16).map(|i| [i * 4, i * 4 + 4]).collect(), None);
    let plans = plan_slices(&coords, 64, 64, SliceFormat::Png).unwrap();
    let counter = Counter(AtomicUsize::new(0));

    let slices = SliceEncoder::new(SliceFormat::Png).encode_all(&source, &plans, &counter).unwrap();

    std::assert_eq!(counter.0.load(Ordering::SeqCst), 16);
    for (i, slice) in slices.iter().enumerate() {
        std::assert_eq!(slice.name, format!("slice_{}.png", i + 1));
        let decoded = image::load_from_memory(&slice.data).unwrap().to_rgb8();
        std::assert_eq!(decoded.get_pixel(0, 0)[1], (i * 4) as u8);
    }
}

#[test]
fn test_service_two_bands_full_width() {
    let service = SliceService::new(SliceFormat::Png);
    let output = service.process(&gradient_png(800, 600), r#"{"yRois":[[150,450],[450,600]],"xRoi":null}"#).unwrap();

    std::assert_eq!(output.slice_count, 2);
    std::assert_eq!(output.source_size, (800, 600));
    std::assert_eq!(entry_names(&output.archive), vec!["slice_1.png", "slice_2.png"]);
    std::assert_eq!(read_entry(&output.archive, "slice_1.png").dimensions(), (800, 300));
    std::assert_eq!(read_entry(&output.archive, "slice_2.png").dimensions(), (800, 150));
}

#[test]
fn test_service_crop_region_offsets_columns() {
    let service = SliceService::new(SliceFormat::Png);
    let output = service.process(&gradient_png(800, 600), r#"{"yRois":[[0,600]],"xRoi":[100,700]}"#).unwrap();

    let slice = read_entry(&output.archive, "slice_1.png");
    std::assert_eq!(slice.dimensions(), (600, 600));
    let rgb = slice.to_rgb8();
    std::assert_eq!(rgb.get_pixel(0, 0), &Rgb([100, 0, 0]));
    // column 699 of the source: 699 % 256 = 187, 699 / 256 = 2
    std::assert_eq!(rgb.get_pixel(599, 599), &Rgb([187, (599 % 256) as u8, 2]));
}

#[test]
fn test_service_tiff_output() {
    let service = SliceService::new(SliceFormat::Tiff);
    let output = service.process(&gradient_png(40, 30), r#"{"yRois":[[0,15],[15,30]],"xRoi":null}"#).unwrap();
    std::assert_eq!(entry_names(&output.archive), vec!["slice_1.tiff", "slice_2.tiff"]);
    std::assert_eq!(read_entry(&output.archive, "slice_2.tiff").dimensions(), (40, 15));
}

#[test]
fn test_service_failures_abort_whole_request() {
    let service = SliceService::new(SliceFormat::Png);
    let image = gradient_png(80, 60);

    std::assert!(matches!(service.process(&image, "not json"), Err(SliceError::InvalidCoordinates(_))));
    std::assert!(matches!(service.process(b"not an image", r#"{"yRois":[[0,10]],"xRoi":null}"#),
                          Err(SliceError::ImageError(_))));
    // second band is out of range, so the first one must not be returned either
    std::assert!(matches!(service.process(&image, r#"{"yRois":[[0,10],[50,61]],"xRoi":null}"#),
                          Err(SliceError::InvalidRegion(_))));
}

#[test]
fn test_archive_counts_entries() {
    let mut archive = SliceArchive::new(SliceFormat::Png);
    std::assert!(archive.is_empty());
    archive.append("slice_1.png", b"abc").unwrap();
    archive.append("slice_2.png", b"def").unwrap();
    std::assert_eq!(archive.len(), 2);

    let bytes = archive.finish().unwrap();
    std::assert_eq!(entry_names(&bytes), vec!["slice_1.png", "slice_2.png"]);
}
