//! End-to-end runs of the `negapost` binary.

use image::{ImageBuffer, Rgba};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn negapost(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_negapost"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn write_negative(path: &Path) {
    let img = ImageBuffer::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgba([200u8, 150, 100, 255])
        } else {
            Rgba([100u8, 100, 100, 90])
        }
    });
    img.save(path).unwrap();
}

fn read_rgba(path: &Path) -> Vec<u8> {
    image::open(path).unwrap().into_rgba8().into_raw()
}

#[test]
fn convert_writes_default_output() {
    let tmp = TempDir::new().unwrap();
    write_negative(&tmp.path().join("neg.png"));

    let out = negapost(tmp.path(), &["convert", "neg.png"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Exported negapost-memory.png (2x1)"));

    let pixels = read_rgba(&tmp.path().join("negapost-memory.png"));
    assert_eq!(&pixels[..4], &[55, 210, 255, 255]);
    assert_eq!(pixels[7], 90);
}

#[test]
fn convert_flags_override_config() {
    let tmp = TempDir::new().unwrap();
    write_negative(&tmp.path().join("neg.png"));
    std::fs::write(
        tmp.path().join("negapost.toml"),
        "[adjustments]\nmode = \"bw\"\nexposure = 3.0\n",
    )
    .unwrap();

    let out = negapost(
        tmp.path(),
        &["convert", "neg.png", "-o", "print.png", "--exposure", "0.5"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    // bw from config, exposure from the flag: mean(55, 105, 155) * 0.5 = 52.5 -> 52
    let pixels = read_rgba(&tmp.path().join("print.png"));
    assert_eq!(&pixels[..4], &[52, 52, 52, 255]);
}

#[test]
fn negative_flag_values_are_accepted() {
    let tmp = TempDir::new().unwrap();
    write_negative(&tmp.path().join("neg.png"));

    let out = negapost(
        tmp.path(),
        &["convert", "neg.png", "--contrast", "-1", "--mode", "bw"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let pixels = read_rgba(&tmp.path().join("negapost-memory.png"));
    assert_eq!(&pixels[..3], &[128, 128, 128]);
}

#[test]
fn invalid_file_type_is_reported() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("notes.txt"), "not an image").unwrap();

    let out = negapost(tmp.path(), &["convert", "notes.txt"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Not a supported image: notes.txt"));
    assert!(!tmp.path().join("negapost-memory.png").exists());
}

#[test]
fn oversized_dimensions_are_reported() {
    let tmp = TempDir::new().unwrap();
    write_negative(&tmp.path().join("neg.png"));
    std::fs::write(tmp.path().join("negapost.toml"), "[limits]\nmax_dimension = 1\n").unwrap();

    let out = negapost(tmp.path(), &["check", "neg.png"]);
    assert!(!out.status.success());
    assert!(
        String::from_utf8_lossy(&out.stderr)
            .contains("Image too large: neg.png is 2x1 pixels, the limit is 1x1")
    );
}

#[test]
fn corrupt_file_is_reported() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("broken.png"), b"\x89PNG nope").unwrap();

    let out = negapost(tmp.path(), &["check", "broken.png"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Could not read image: broken.png"));
}

#[test]
fn check_reports_source_info() {
    let tmp = TempDir::new().unwrap();
    write_negative(&tmp.path().join("neg.png"));

    let out = negapost(tmp.path(), &["check", "neg.png"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Dimensions: 2x1 (limit 10000x10000)"));
    assert!(stdout.contains("Ready to convert"));
}

#[test]
fn tune_reads_commands_from_stdin() {
    let tmp = TempDir::new().unwrap();
    write_negative(&tmp.path().join("neg.png"));

    let mut child = Command::new(env!("CARGO_BIN_EXE_negapost"))
        .current_dir(tmp.path())
        .args(["tune", "neg.png"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"mode bw\nexposure 2\nexport result.tif\nquit\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("mode = bw"));
    assert!(stdout.contains("Exported result.tif (2x1)"));

    let pixels = read_rgba(&tmp.path().join("result.tif"));
    assert_eq!(&pixels[..4], &[210, 210, 210, 255]);
}

#[test]
fn gen_config_prints_stock_file() {
    let tmp = TempDir::new().unwrap();
    let out = negapost(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[adjustments]"));
    assert!(stdout.contains("filename = \"negapost-memory.png\""));
}

#[test]
fn bad_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    write_negative(&tmp.path().join("neg.png"));
    std::fs::write(tmp.path().join("negapost.toml"), "[adjustments]\nexposre = 2\n").unwrap();

    let out = negapost(tmp.path(), &["convert", "neg.png"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown field"));
}
