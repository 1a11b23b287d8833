use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn headless_run_prints_fitted_frustum_and_final_state() {
    let mut cmd = Command::cargo_bin("shader-preview").expect("binary exists");
    cmd.args(["--headless", "--frames", "10", "--size", "1600x800"]);
    cmd.assert()
        .success()
        .stdout(contains(
            "Preview variant: uv (parameters: u_time, u_mouse, u_resolution, u_color_a, u_color_b)",
        ))
        .stdout(contains(
            "Frustum: left=-1.000 right=1.000 top=0.500 bottom=-0.500",
        ))
        .stdout(contains("Rendered 10 frame(s)"))
        .stdout(contains(" - u_time = 0.17"))
        .stdout(contains(" - u_mouse = (0.00, 0.00)"))
        .stdout(contains(" - u_resolution = (1600.00, 800.00)"))
        .stdout(contains(" - u_color_b = color(0.00, 1.00, 1.00)"));
}

#[test]
fn portrait_window_pillarboxes() {
    let mut cmd = Command::cargo_bin("shader-preview").expect("binary exists");
    cmd.args(["--headless", "--frames", "1", "--size", "800x1600"]);
    cmd.assert()
        .success()
        .stdout(contains(
            "Frustum: left=-0.500 right=0.500 top=1.000 bottom=-1.000",
        ));
}

#[test]
fn missing_resolution_is_skipped() {
    let mut cmd = Command::cargo_bin("shader-preview").expect("binary exists");
    cmd.args([
        "--headless",
        "--variant",
        "pulse",
        "--params",
        "u_time,u_color_a,u_color_b",
        "--color-a",
        "#00ff00",
        "--frames",
        "3",
    ]);
    cmd.assert()
        .success()
        .stdout(contains("Rendered 3 frame(s)"))
        .stdout(contains(" - u_color_a = color(0.00, 1.00, 0.00)"))
        .stdout(contains("u_resolution").not());
}

#[test]
fn variant_without_its_parameters_aborts_startup() {
    let mut cmd = Command::cargo_bin("shader-preview").expect("binary exists");
    cmd.args(["--headless", "--variant", "pointer", "--params", "u_time"]);
    cmd.assert()
        .failure()
        .stderr(contains("invalid configuration"))
        .stderr(contains("reads u_mouse"));
}

#[test]
fn unknown_argument_prints_usage() {
    let mut cmd = Command::cargo_bin("shader-preview").expect("binary exists");
    cmd.arg("--fullscreen");
    cmd.assert()
        .failure()
        .stderr(contains("unknown argument: --fullscreen"))
        .stderr(contains("Usage: shader-preview"));
}
