//! Integration tests for the editor, the slice service and the HTTP router

extern crate std;

use std::fs;
use std::io::{Cursor, Read};
use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;

use bandslicer::api::BandSlicer;
use bandslicer::config::SlicerConfig;
use bandslicer::editor::{EditorCommand, EditorController, Effect};
use bandslicer::server::{build_router, AppState};
use bandslicer::slicer::SliceCoords;

const BOUNDARY: &str = "bandslicer-test-boundary";

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 7]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn zip_entries(archive: &[u8]) -> Vec<(String, DynamicImage)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut entry = zip.by_index(i).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (entry.name().to_string(), image::load_from_memory(&data).unwrap())
        })
        .collect()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bandslicer-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn test_config(static_dir: &PathBuf, max_upload_bytes: usize) -> SlicerConfig {
    let toml = format!(
        "[server]\nstatic_dir = {:?}\nmax_upload_bytes = {}\n",
        static_dir.to_str().unwrap(),
        max_upload_bytes
    );
    SlicerConfig::from_str(&toml).unwrap()
}

fn router(config: &SlicerConfig) -> axum::Router {
    build_router(&config.server, AppState::from_config(config))
}

fn multipart_body(image: Option<&[u8]>, coords: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(image) = image {
        body.extend_from_slice(format!(
            "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"sample.png\"\r\nContent-Type: image/png\r\n\r\n",
            BOUNDARY
        ).as_bytes());
        body.extend_from_slice(image);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(coords) = coords {
        body.extend_from_slice(format!(
            "--{}\r\nContent-Disposition: form-data; name=\"coords\"\r\n\r\n{}\r\n",
            BOUNDARY, coords
        ).as_bytes());
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn slice_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/slice")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[test]
fn test_editor_to_service_round_trip() {
    let mut editor = EditorController::default();
    editor.dispatch(EditorCommand::LoadImage { bytes: png_bytes(800, 600), file_name: "scan.png".to_string() });
    editor.dispatch(EditorCommand::AddBand { auto: false });
    editor.dispatch(EditorCommand::AddBand { auto: true });

    let effects = editor.dispatch(EditorCommand::Save);
    let upload = effects.into_iter()
        .find_map(|effect| match effect {
            Effect::Upload(request) => Some(request),
            _ => None,
        })
        .expect("save should produce an upload");

    let json = upload.coords_json().unwrap();
    std::assert_eq!(json, r#"{"yRois":[[150,450],[450,600]],"xRoi":null}"#);

    let slicer = BandSlicer::with_defaults().unwrap();
    let service = bandslicer::SliceService::new(slicer.config().slicing.output_format);
    let output = service.process(&upload.image, &json).unwrap();

    let entries = zip_entries(&output.archive);
    std::assert_eq!(entries.len(), 2);
    std::assert_eq!(entries[0].0, "slice_1.png");
    std::assert_eq!(entries[0].1.dimensions(), (800, 300));
    std::assert_eq!(entries[1].0, "slice_2.png");
    std::assert_eq!(entries[1].1.dimensions(), (800, 150));
}

#[test]
fn test_facade_slices_and_plans_files() {
    let dir = scratch_dir("facade");
    let input = dir.join("input.png");
    let output = dir.join("out.zip");
    fs::write(&input, png_bytes(120, 90)).unwrap();

    let slicer = BandSlicer::with_defaults().unwrap();
    let coords = SliceCoords::new(vec![[0, 30], [30, 90]], Some([20, 100]));

    let report = slicer.plan(input.to_str().unwrap(), &coords).unwrap();
    std::assert_eq!((report.width, report.height), (120, 90));
    std::assert!(report.summary().contains("slice_2.png: x=20 y=30 80x60"));

    let written = slicer.slice_file(input.to_str().unwrap(), &coords, output.to_str().unwrap()).unwrap();
    std::assert_eq!(written, 2);
    let entries = zip_entries(&fs::read(&output).unwrap());
    std::assert_eq!(entries[0].1.dimensions(), (80, 30));
    std::assert_eq!(entries[1].1.to_rgb8().get_pixel(0, 0), &Rgb([20, 30, 7]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_facade_failure_writes_nothing() {
    let dir = scratch_dir("facade-fail");
    let input = dir.join("input.png");
    let output = dir.join("out.zip");
    fs::write(&input, png_bytes(50, 50)).unwrap();

    let slicer = BandSlicer::with_defaults().unwrap();
    let coords = SliceCoords::new(vec![[0, 10], [40, 51]], None);

    std::assert!(slicer.slice_file(input.to_str().unwrap(), &coords, output.to_str().unwrap()).is_err());
    std::assert!(!output.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_slice_endpoint_returns_zip() {
    let dir = scratch_dir("router-ok");
    let config = test_config(&dir, 50 * 1024 * 1024);

    let body = multipart_body(Some(&png_bytes(800, 600)), Some(r#"{"yRois":[[150,450],[450,600]],"xRoi":null}"#));
    let response = router(&config).oneshot(slice_request(body)).await.unwrap();

    std::assert_eq!(response.status(), StatusCode::OK);
    std::assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
    std::assert_eq!(response.headers()[header::CONTENT_DISPOSITION], "attachment; filename=\"slices.zip\"");

    let entries = zip_entries(&body_bytes(response).await);
    let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    std::assert_eq!(names, vec!["slice_1.png", "slice_2.png"]);
    std::assert_eq!(entries[0].1.dimensions(), (800, 300));
    std::assert_eq!(entries[1].1.dimensions(), (800, 150));

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_slice_endpoint_crop_region() {
    let dir = scratch_dir("router-crop");
    let config = test_config(&dir, 50 * 1024 * 1024);

    let body = multipart_body(Some(&png_bytes(800, 600)), Some(r#"{"yRois":[[0,600]],"xRoi":[100,700]}"#));
    let response = router(&config).oneshot(slice_request(body)).await.unwrap();
    std::assert_eq!(response.status(), StatusCode::OK);

    let entries = zip_entries(&body_bytes(response).await);
    std::assert_eq!(entries.len(), 1);
    std::assert_eq!(entries[0].1.dimensions(), (600, 600));
    std::assert_eq!(entries[0].1.to_rgb8().get_pixel(0, 0), &Rgb([100, 0, 7]));

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_slice_endpoint_failures_are_generic_500() {
    let dir = scratch_dir("router-fail");
    let config = test_config(&dir, 50 * 1024 * 1024);
    let image = png_bytes(80, 60);

    let bodies = vec![
        multipart_body(Some(&image), Some("{not json")),
        multipart_body(Some(&image), Some(r#"{"yRois":[[0,61]],"xRoi":null}"#)),
        multipart_body(Some(b"not an image"), Some(r#"{"yRois":[[0,10]],"xRoi":null}"#)),
        multipart_body(None, Some(r#"{"yRois":[[0,10]],"xRoi":null}"#)),
        multipart_body(Some(&image), None),
    ];

    for body in bodies {
        let response = router(&config).oneshot(slice_request(body)).await.unwrap();
        std::assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        std::assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        std::assert_eq!(text, "画像処理に失敗しました");
    }

    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_slice_endpoint_rejects_oversized_body() {
    let dir = scratch_dir("router-limit");
    let config = test_config(&dir, 1024);

    let body = multipart_body(Some(&png_bytes(200, 200)), Some(r#"{"yRois":[[0,10]],"xRoi":null}"#));
    std::assert!(body.len() > 1024);
    let response = router(&config).oneshot(slice_request(body)).await.unwrap();

    std::assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_static_assets_fall_back_to_index() {
    let dir = scratch_dir("router-static");
    fs::write(dir.join("index.html"), "<html>editor</html>").unwrap();
    fs::write(dir.join("app.js"), "console.log('editor');").unwrap();
    let config = test_config(&dir, 50 * 1024 * 1024);

    let asset = Request::builder().uri("/app.js").body(Body::empty()).unwrap();
    let response = router(&config).oneshot(asset).await.unwrap();
    std::assert_eq!(response.status(), StatusCode::OK);
    std::assert_eq!(body_bytes(response).await, b"console.log('editor');");

    let route = Request::builder().uri("/bands/3/edit").body(Body::empty()).unwrap();
    let response = router(&config).oneshot(route).await.unwrap();
    std::assert_eq!(response.status(), StatusCode::OK);
    std::assert_eq!(body_bytes(response).await, b"<html>editor</html>");

    let _ = fs::remove_dir_all(&dir);
}
