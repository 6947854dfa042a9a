use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tempfile::tempdir;

use exsketch_cli::{Args, run};

/// Collects all .toml scenes from a directory
fn collect_scene_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demo scenes live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_scene_files(demos_path());

    assert!(!valid_demos.is_empty(), "No demo scenes found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_path = temp_dir
            .path()
            .join(demo_path.file_stem().unwrap().to_string_lossy().to_string());

        match run(&args_for(demo_path, &output_path)) {
            Ok(written) => {
                assert_eq!(written.extension().unwrap(), "excalidraw");
                let document: Value =
                    serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
                assert_eq!(document["type"], "excalidraw");
                assert!(!document["elements"].as_array().unwrap().is_empty());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nDemo scenes that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo scene(s) failed unexpectedly", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_scene_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error scenes found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args_for(demo_path, &output_path)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError scenes that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error scene(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_explicit_config_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r##"
source = "e2e"
background_color = "#f8f9fa"
seed = 11

[defaults]
roughness = 0
"##,
    )
    .unwrap();

    let mut args = args_for(
        &demos_path().join("client_server.toml"),
        &temp_dir.path().join("configured.excalidraw"),
    );
    args.config = Some(config_path.to_string_lossy().to_string());

    let written = run(&args).expect("Failed to run with explicit config");
    let first = fs::read_to_string(&written).unwrap();
    let document: Value = serde_json::from_str(&first).unwrap();

    assert_eq!(document["source"], "e2e");
    assert_eq!(document["appState"]["viewBackgroundColor"], "#f8f9fa");
    for element in document["elements"].as_array().unwrap() {
        assert_eq!(element["roughness"], 0);
    }

    // A seeded configuration reproduces the same document
    run(&args).unwrap();
    assert_eq!(fs::read_to_string(&written).unwrap(), first);
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args_for(
        &temp_dir.path().join("absent.toml"),
        &temp_dir.path().join("out"),
    );

    assert!(run(&args).is_err());
}
