//! Command-level tests: export, sheet and check against files on disk.

mod common;

use std::fs;
use std::path::{Path, PathBuf};

use asprite::cli::{self, Cli};
use asprite::SpriteError;
use clap::Parser;
use common::{AreaBuilder, RecordBuilder, BWRG, MODE_8BPP_NEW};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("asprite.yaml"), "padding: 0\n").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> asprite::Result<()> {
        let config = self.path("asprite.yaml");
        let mut argv = vec!["asprite", "-q", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);
        cli::run(Cli::try_parse_from(argv).unwrap())
    }
}

fn icons() -> Vec<u8> {
    AreaBuilder::new()
        .record(RecordBuilder::new("quad", MODE_8BPP_NEW, 8, 2, 2, &[0, 1, 2, 3]).palette(&BWRG))
        .record(
            RecordBuilder::new("holes", MODE_8BPP_NEW, 8, 2, 2, &[1, 1, 1, 1])
                .palette(&BWRG)
                .mask_bits(&[0, 1, 1, 0]),
        )
        .build()
}

fn str_path(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn export_writes_one_png_per_sprite() {
    let project = Project::new();
    let file = project.write("icons,ff9", &icons());
    let out = project.path("out");

    project
        .run(&["export", str_path(&file), "-o", str_path(&out), "--scale", "2"])
        .unwrap();

    let quad = image::open(out.join("icons-quad.png")).unwrap().to_rgba8();
    assert_eq!((quad.width(), quad.height()), (4, 4));
    assert_eq!(quad.get_pixel(3, 3).0, [0, 255, 0, 255]);

    let holes = image::open(out.join("icons-holes.png")).unwrap().to_rgba8();
    assert_eq!(holes.get_pixel(0, 0).0[3], 0);
    assert_eq!(holes.get_pixel(2, 0).0, [255, 255, 255, 255]);
}

#[test]
fn export_single_index() {
    let project = Project::new();
    let file = project.write("icons.spr", &icons());
    let out = project.path("one");

    project
        .run(&["export", str_path(&file), "-o", str_path(&out), "--index", "1"])
        .unwrap();

    let mut written: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, vec!["icons-holes.png"]);
}

#[test]
fn export_bad_index_is_an_error() {
    let project = Project::new();
    let file = project.write("icons.spr", &icons());
    let out = project.path("none");

    let err = project
        .run(&["export", str_path(&file), "-o", str_path(&out), "--index", "9"])
        .unwrap_err();
    assert!(matches!(err, SpriteError::IndexOutOfRange { index: 9, count: 2 }));
}

#[test]
fn export_keep_going_uses_file_indices() {
    let project = Project::new();
    let bytes = AreaBuilder::new()
        .record(RecordBuilder::new("text", 3, 1, 1, 1, &[0]))
        .record(RecordBuilder::new("ok", MODE_8BPP_NEW, 8, 1, 1, &[0]).palette(&BWRG))
        .record(RecordBuilder::new("ok", MODE_8BPP_NEW, 8, 1, 1, &[1]).palette(&BWRG))
        .build();
    let file = project.write("mixed.spr", &bytes);
    let out = project.path("kept");

    project
        .run(&[
            "export",
            str_path(&file),
            "-o",
            str_path(&out),
            "--keep-going",
            "--index",
            "2",
        ])
        .unwrap();

    let written: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written, vec!["mixed-ok-2.png"]);

    let white = image::open(out.join("mixed-ok-2.png")).unwrap().to_rgba8();
    assert_eq!(white.get_pixel(0, 0).0, [255, 255, 255, 255]);

    let err = project
        .run(&[
            "export",
            str_path(&file),
            "-o",
            str_path(&out),
            "--keep-going",
            "--index",
            "0",
        ])
        .unwrap_err();
    assert!(matches!(err, SpriteError::Decode { index: 0, .. }));
}

#[test]
fn sheet_writes_png_and_json() {
    let project = Project::new();
    let file = project.write("icons,ff9", &icons());
    let out = project.path("sheet");

    project
        .run(&["sheet", str_path(&file), "-o", str_path(&out)])
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("icons.json")).unwrap()).unwrap();
    assert_eq!(json["meta"]["image"], "icons.png");
    assert_eq!(json["frames"]["quad"]["frame"]["w"], 2);
    assert_eq!(json["frames"]["holes"]["frame"]["h"], 2);

    let sheet = image::open(out.join("icons.png")).unwrap().to_rgba8();
    assert_eq!(sheet.width(), 4);
}

#[test]
fn check_passes_clean_file() {
    let project = Project::new();
    let file = project.write("icons.spr", &icons());

    project.run(&["check", str_path(&file)]).unwrap();
}

#[test]
fn check_fails_on_bad_file() {
    let project = Project::new();
    project.write("good.spr", &icons());
    project.write("cut.spr", &icons()[..20]);

    let err = project
        .run(&["check", str_path(project.dir.path())])
        .unwrap_err();
    assert!(matches!(err, SpriteError::Check { errors: 1, files: 2 }));
}

#[test]
fn info_json_runs() {
    let project = Project::new();
    let file = project.write("icons.spr", &icons());

    project.run(&["info", "--json", str_path(&file)]).unwrap();
}

#[test]
fn config_errors_surface() {
    let project = Project::new();
    fs::write(project.path("asprite.yaml"), "scale: lots\n").unwrap();
    let file = project.write("icons.spr", &icons());

    let err = project.run(&["info", str_path(&file)]).unwrap_err();
    assert!(matches!(err, SpriteError::Config { .. }));
}
