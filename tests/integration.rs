use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn subseek_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("subseek");
    path
}

const PILOT: &str = "1
00:00:01,000 --> 00:00:03,000
Lazarus, come forth!

2
00:00:04,000 --> 00:00:06,500
<i>Nobody comes forth.</i>

3
00:01:02,345 --> 00:01:04,000
Lazarus again? Really?
";

const SECOND: &str = "1
00:00:10,000 --> 00:00:12,000
{\\an8}The LAZARUS of larceny.

2
00:00:13,000 --> 00:00:14,000
Pretty, pretty, pretty good.
";

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let library = root.join("library");
    fs::create_dir_all(&library).unwrap();
    fs::write(library.join("Show S01E01.srt"), PILOT).unwrap();
    fs::write(library.join("Show S01E02.srt"), SECOND).unwrap();
    fs::write(library.join("Show S01E02.mkv"), "").unwrap();
    fs::write(library.join("Unrelated S01E01.srt"), PILOT).unwrap();

    let config_content = format!(
        r#"[db]
path = "{root}/data/subseek.sqlite"

[library]
folder = "{root}/library"
file_prefix = "Show"
video_extensions = ["mkv"]

[search]
default_limit = 20
"#,
        root = root.display()
    );

    let config_path = config_dir.join("subseek.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_subseek(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    run_subseek_with_input(config_path, args, "")
}

fn run_subseek_with_input(
    config_path: &Path,
    args: &[&str],
    input: &str,
) -> (String, String, bool) {
    let binary = subseek_binary();
    let mut child = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to run subseek binary at {:?}: {}", binary, e));

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// The count section of `subseek stats` output.
fn count_lines(stats: &str) -> Vec<String> {
    stats
        .lines()
        .filter(|l| {
            ["Files:", "Captions:", "Words:", "Links:"]
                .iter()
                .any(|k| l.contains(*k))
        })
        .map(|l| l.to_string())
        .collect()
}

fn library_dir(config_path: &Path) -> PathBuf {
    config_path.parent().unwrap().parent().unwrap().join("library")
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_subseek(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_subseek(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_subseek(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_ingest_library() {
    let (_tmp, config_path) = setup_test_env();

    run_subseek(&config_path, &["init"]);
    let (stdout, stderr, success) = run_subseek(&config_path, &["ingest"]);
    assert!(success, "ingest failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("candidates: 3"));
    assert!(stdout.contains("files ingested: 2"));
    assert!(stdout.contains("captions written: 5"));
    assert!(stdout.contains("ok"));
}

#[test]
fn test_ingest_twice_leaves_index_unchanged() {
    let (_tmp, config_path) = setup_test_env();

    run_subseek(&config_path, &["init"]);
    run_subseek(&config_path, &["ingest"]);
    let (stats_before, _, _) = run_subseek(&config_path, &["stats"]);

    let (stdout, _, success) = run_subseek(&config_path, &["ingest"]);
    assert!(success);
    assert!(stdout.contains("already ingested: 2"));
    assert!(stdout.contains("files ingested: 0"));

    let (stats_after, _, _) = run_subseek(&config_path, &["stats"]);
    assert_eq!(count_lines(&stats_before), count_lines(&stats_after));
    assert!(stats_after.contains("Files:       2"));
    assert!(stats_after.contains("Captions:    5"));
}

#[test]
fn test_search_respects_limit() {
    let (_tmp, config_path) = setup_test_env();

    run_subseek(&config_path, &["init"]);
    run_subseek(&config_path, &["ingest"]);

    let (stdout, _, success) = run_subseek(&config_path, &["search", "Lazarus"]);
    assert!(success);
    assert!(stdout.contains("1. [1] S01E01 00:00:01,000 --> 00:00:03,000"));
    assert!(stdout.contains("3. [4] S01E02 00:00:10,000 --> 00:00:12,000"));
    assert!(stdout.contains("The LAZARUS of larceny."));

    let (stdout, _, success) =
        run_subseek(&config_path, &["search", "lazarus", "--limit", "2"]);
    assert!(success);
    assert!(stdout.contains("2. [3]"));
    assert!(!stdout.contains("3. ["));
}

#[test]
fn test_search_json() {
    let (_tmp, config_path) = setup_test_env();

    run_subseek(&config_path, &["init"]);
    run_subseek(&config_path, &["ingest"]);

    let (stdout, _, success) = run_subseek(&config_path, &["search", "forth", "--json"]);
    assert!(success);
    let hits: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[1]["text"], "Nobody comes forth.");
    assert_eq!(hits[1]["start"], "00:00:04,000");
    assert_eq!(hits[1]["tag"], "S01E01");
}

#[test]
fn test_search_unknown_word() {
    let (_tmp, config_path) = setup_test_env();

    run_subseek(&config_path, &["init"]);
    run_subseek(&config_path, &["ingest"]);

    let (stdout, _, success) = run_subseek(&config_path, &["search", "seinfeld"]);
    assert!(success);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_locate_caption_file() {
    let (_tmp, config_path) = setup_test_env();

    run_subseek(&config_path, &["init"]);
    run_subseek(&config_path, &["ingest"]);

    // Caption 4 is the first caption of episode 2
    let (stdout, stderr, success) = run_subseek(&config_path, &["locate", "4", "--media"]);
    assert!(success, "locate failed: stderr={}", stderr);
    assert!(stdout.trim().ends_with("Show S01E02.mkv"));

    let (stdout, _, success) = run_subseek(&config_path, &["locate", "1"]);
    assert!(success);
    assert!(stdout.trim().ends_with("Show S01E01.srt"));

    let (_, _, success) = run_subseek(&config_path, &["locate", "1", "--media"]);
    assert!(!success, "episode 1 has no video file");

    let (_, _, success) = run_subseek(&config_path, &["locate", "999"]);
    assert!(!success);
}

#[test]
fn test_ingest_missing_folder_fails() {
    let (_tmp, config_path) = setup_test_env();
    let missing = library_dir(&config_path).join("nope");

    run_subseek(&config_path, &["init"]);
    let (_, stderr, success) = run_subseek(
        &config_path,
        &["ingest", "--folder", missing.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("folder not found"));
}

#[test]
fn test_broken_file_is_reported_and_retried() {
    let (_tmp, config_path) = setup_test_env();
    let broken = library_dir(&config_path).join("Show S01E03.srt");
    fs::write(&broken, "1\nthis is not a timing line\nLazarus\n").unwrap();

    run_subseek(&config_path, &["init"]);
    let (stdout, stderr, success) = run_subseek(&config_path, &["ingest"]);
    assert!(success, "ingest failed: stderr={}", stderr);
    assert!(stdout.contains("files ingested: 2"));
    assert!(stdout.contains("warning: Show S01E03.srt"));

    // Fixed file is picked up on the next run
    fs::write(&broken, "1\n00:00:01,000 --> 00:00:02,000\nLazarus\n").unwrap();
    let (stdout, _, success) = run_subseek(&config_path, &["ingest"]);
    assert!(success);
    assert!(stdout.contains("files ingested: 1"));
    assert!(stdout.contains("already ingested: 2"));
}

#[test]
fn test_navigate_session() {
    let (_tmp, config_path) = setup_test_env();

    run_subseek(&config_path, &["init"]);
    run_subseek(&config_path, &["ingest"]);

    let (stdout, stderr, success) = run_subseek_with_input(
        &config_path,
        &["navigate", "lazarus", "--delay", "-200"],
        "n\np\np\n+\no\nq\n",
    );
    assert!(success, "navigate failed: stderr={}", stderr);

    assert!(stdout.contains("3 captions for \"lazarus\""));
    // Caption 3 starts at 62345 ms: minus lead time 491, minus delay 200
    assert!(stdout.contains("player: seek 00:01:01,654"));
    assert!(stdout.contains("delay: -100 ms (step x1)"));
    assert!(stdout.contains("\"lazarus\" in Show S01E02.mkv - subseek"));
}

#[test]
fn test_navigate_no_results() {
    let (_tmp, config_path) = setup_test_env();

    run_subseek(&config_path, &["init"]);
    run_subseek(&config_path, &["ingest"]);

    let (stdout, _, success) = run_subseek(&config_path, &["navigate", "seinfeld"]);
    assert!(success);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_invalid_config_fails() {
    let (_tmp, config_path) = setup_test_env();
    fs::write(&config_path, "[db]\npath = \"x.sqlite\"\n").unwrap();

    let (_, stderr, success) = run_subseek(&config_path, &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to parse config file"));
}
