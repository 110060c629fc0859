use assert_cmd::Command;
use tempfile::NamedTempFile;

const PEOPLE: &str = "id;name;email\n1;ada;ada@example.com\n2;grace;grace@example.com\n3;linus;linus@example.com\n";
const PEOPLE_WITH_BLANK: &str = "id;name;email\n1;ada;ada@example.com\n2; ;nobody@example.com\n3;linus;linus@example.com\n";

fn write_temp(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("tempfile");
    std::io::Write::write_all(&mut f, contents.as_bytes()).expect("write");
    f
}

fn batchflow() -> Command {
    let bin = assert_cmd::cargo::cargo_bin!("batchflow");
    let mut cmd = Command::new(bin);
    for var in [
        "BATCHFLOW_CONFIG",
        "BATCHFLOW_CHUNK_SIZE",
        "BATCHFLOW_SKIP_LIMIT",
        "BATCHFLOW_RETRY_ATTEMPTS",
        "BATCHFLOW_BACKOFF_MS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn run_json(cmd: &mut Command) -> (i32, serde_json::Value) {
    let out = cmd.output().expect("run batchflow");
    let code = out.status.code().unwrap_or(-1);
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    let json = serde_json::from_str(stdout.trim()).expect("json summary on stdout");
    (code, json)
}

#[test]
fn run_imports_all_rows_in_chunks() {
    let f = write_temp(PEOPLE);
    let (code, summary) = run_json(batchflow().args([
        "run",
        f.path().to_string_lossy().as_ref(),
        "--format",
        "json",
    ]));

    assert_eq!(code, 0);
    assert_eq!(summary["job_name"], "importJob");
    assert_eq!(summary["status"], "COMPLETED");
    let step = &summary["steps"][0];
    assert_eq!(step["name"], "importStep");
    assert_eq!(step["read_count"], 3);
    assert_eq!(step["write_count"], 3);
    assert_eq!(step["commit_count"], 2);
}

#[test]
fn chunk_size_comes_from_environment() {
    let f = write_temp(PEOPLE);
    let (code, summary) = run_json(
        batchflow()
            .env("BATCHFLOW_CHUNK_SIZE", "3")
            .args(["run", f.path().to_string_lossy().as_ref(), "--format", "json"]),
    );

    assert_eq!(code, 0);
    assert_eq!(summary["steps"][0]["commit_count"], 1);
}

#[test]
fn flag_overrides_config_file() {
    let data = write_temp(PEOPLE);
    let config = write_temp("chunk_size: 3\nskip_limit: 0\n");
    let (code, summary) = run_json(batchflow().args([
        "run",
        data.path().to_string_lossy().as_ref(),
        "--config",
        config.path().to_string_lossy().as_ref(),
        "--chunk-size",
        "1",
        "--format",
        "json",
    ]));

    assert_eq!(code, 0);
    assert_eq!(summary["steps"][0]["commit_count"], 3);
}

#[test]
fn blank_name_fails_run_without_skip_limit() {
    let f = write_temp(PEOPLE_WITH_BLANK);
    let (code, summary) = run_json(batchflow().args([
        "run",
        f.path().to_string_lossy().as_ref(),
        "--format",
        "json",
    ]));

    assert_eq!(code, 3);
    assert_eq!(summary["status"], "FAILED");
    assert_eq!(summary["steps"][0]["status"], "FAILED");
    assert!(summary["error"]
        .as_str()
        .unwrap()
        .contains("person 2 has no name"));
}

#[test]
fn blank_name_is_skipped_within_limit() {
    let f = write_temp(PEOPLE_WITH_BLANK);
    let (code, summary) = run_json(batchflow().args([
        "run",
        f.path().to_string_lossy().as_ref(),
        "--skip-limit",
        "1",
        "--format",
        "json",
    ]));

    assert_eq!(code, 0);
    let step = &summary["steps"][0];
    assert_eq!(step["skip_count"], 1);
    assert_eq!(step["write_count"], 2);
}

#[test]
fn missing_file_is_runtime_error() {
    batchflow()
        .args(["run", "/definitely/not/here.csv"])
        .assert()
        .code(4);
}

#[test]
fn check_accepts_valid_file() {
    let f = write_temp(PEOPLE_WITH_BLANK);
    let out = batchflow()
        .args(["check", f.path().to_string_lossy().as_ref()])
        .output()
        .expect("run batchflow");

    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "ok: 3 rows (1 without a name)"
    );
}

#[test]
fn check_rejects_missing_column() {
    let f = write_temp("id;name\n1;ada\n");
    batchflow()
        .args(["check", f.path().to_string_lossy().as_ref()])
        .assert()
        .code(2);
}
