use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::str::contains;
use tempfile::TempDir;

const SESSION_LINES: &[&str] = &[
    "Imaging session: 12/03/2024 ",
    "This report describes the condition of the face.Jane Doe .",
    "Spots (12)",
    "Wrinkles (5)",
    "Texture (7.5)",
    "Pores (40)",
    "UV Spots (21)",
    "Brown Spots (9)",
    "Red Areas (14)",
    "Porphyrins (3.25)",
];

struct TestEnv {
    tmp: TempDir,
    home: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).unwrap();
        Self { tmp, home }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }

    /// The binary with an isolated config directory.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("skinreport").unwrap();
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"));
        cmd
    }

    /// Config file with the capture geometry scaled down to the test photos.
    fn write_small_config(&self) -> PathBuf {
        let path = self.path("config.json");
        fs::write(
            &path,
            r#"{
                "imaging": {
                    "target_width": 272,
                    "target_height": 351,
                    "crop": { "left": 15, "top": 0, "right": 256, "bottom": 351 }
                },
                "classify": { "sample_x": 124, "sample_y": 350 }
            }"#,
        )
        .unwrap();
        path
    }
}

fn write_session_pdf(path: &Path) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut operations = Vec::new();
    for (index, line) in SESSION_LINES.iter().enumerate() {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(11)]),
            Operation::new("Td", vec![Object::Integer(50), Object::Integer(780 - 20 * index as i64)]),
            Operation::new("Tj", vec![Object::string_literal(*line)]),
            Operation::new("ET", vec![]),
        ]);
    }
    let content = Content { operations }.encode().unwrap();
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn write_photo(path: &Path, background: [u8; 3]) {
    RgbImage::from_pixel(300, 400, Rgb(background)).save(path).unwrap();
}

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("generate"))
        .stdout(contains("extract"))
        .stdout(contains("classify"));
}

#[test]
fn test_config_path_reports_missing_file() {
    let env = TestEnv::new();
    let config = env.path("custom.json");
    env.cmd()
        .args(["-c", config.to_str().unwrap(), "config", "path"])
        .assert()
        .success()
        .stdout(contains("custom.json"))
        .stdout(contains("not created"));
}

#[test]
fn test_config_init_then_get() {
    let env = TestEnv::new();
    let config = env.path("init.json");
    env.cmd()
        .args(["config", "init", "--output", config.to_str().unwrap()])
        .assert()
        .success();

    env.cmd()
        .args(["-c", config.to_str().unwrap(), "config", "get", "classify.sample_x"])
        .assert()
        .success()
        .stdout(contains("1240"));

    env.cmd()
        .args(["config", "init", "--output", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("--force"));
}

#[test]
fn test_extract_json() {
    let env = TestEnv::new();
    let pdf = env.path("session.pdf");
    write_session_pdf(&pdf);

    env.cmd()
        .args(["extract", pdf.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains(r#""UV Spots": "21""#))
        .stdout(contains(r#""name": "Jane Doe""#));
}

#[test]
fn test_extract_csv_to_file() {
    let env = TestEnv::new();
    let pdf = env.path("session.pdf");
    let out = env.path("values.csv");
    write_session_pdf(&pdf);

    env.cmd()
        .args(["extract", pdf.to_str().unwrap(), "--format", "csv", "--output", out.to_str().unwrap()])
        .assert()
        .success();

    let csv = fs::read_to_string(out).unwrap();
    assert!(csv.contains("Porphyrins"));
    assert!(csv.contains("3.25"));
}

#[test]
fn test_generate_reports_insufficient_inputs() {
    let env = TestEnv::new();
    let input = env.path("input");
    fs::create_dir_all(&input).unwrap();
    write_photo(&input.join("only.jpg"), [240, 240, 240]);
    write_session_pdf(&input.join("session.pdf"));

    env.cmd()
        .args(["generate", "--input", input.to_str().unwrap()])
        .args(["--export", env.path("export").to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(contains("precondition failed"));

    assert!(!env.path("export").exists());
}

#[test]
fn test_generate_classic_report() {
    let env = TestEnv::new();
    let config = env.write_small_config();
    let input = env.path("input");
    let export = env.path("export");
    fs::create_dir_all(&input).unwrap();
    fs::create_dir_all(export.join("Assets")).unwrap();

    write_photo(&input.join("face_1.jpg"), [245, 245, 245]);
    write_photo(&input.join("face_2.jpg"), [10, 10, 10]);
    RgbImage::from_pixel(400, 200, Rgb([120, 90, 80]))
        .save(input.join("face_overview.jpg"))
        .unwrap();
    write_session_pdf(&input.join("session.pdf"));
    RgbImage::from_pixel(40, 12, Rgb([88, 76, 112]))
        .save(export.join("Assets").join("SkinElementsLogo.jpg"))
        .unwrap();

    env.cmd()
        .args(["-c", config.to_str().unwrap(), "generate", "--edition", "classic"])
        .args(["--input", input.to_str().unwrap(), "--export", export.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Report written to"))
        .stdout(contains("2 photo pages (1 UV)"));

    let report = export.join("Jane_Doe").join("12_03_2024").join("Jane_Doe_Report.pdf");
    let doc = Document::load(report).unwrap();
    assert_eq!(doc.get_pages().len(), 5);
}

#[test]
fn test_classify_raw_photos() {
    let env = TestEnv::new();
    let config = env.write_small_config();
    write_photo(&env.path("light.jpg"), [250, 250, 250]);
    write_photo(&env.path("dark.jpg"), [5, 5, 5]);

    let pattern = env.path("*.jpg");
    env.cmd()
        .args(["-c", config.to_str().unwrap(), "classify", "--raw", "--json", pattern.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains(r#""kind": "uv""#))
        .stdout(contains(r#""kind": "standard""#));
}
