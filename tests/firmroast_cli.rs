use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::{contains, is_empty};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn isolated(mut cmd: Command) -> Command {
    cmd.env_remove("FIRMROAST_MODEL")
        .env_remove("FIRMROAST_ENDPOINT")
        .env_remove("FIRMROAST_TIMEOUT")
        .env_remove("FIRMROAST_CONFIG")
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG")
        .env("FIRMROAST_CREDENTIALS", unique_temp_path("credentials"));
    cmd
}

fn firmroast_cmd() -> Command {
    isolated(Command::new(assert_cmd::cargo::cargo_bin!("firmroast")))
}

fn roast_cmd() -> Command {
    isolated(Command::new(assert_cmd::cargo::cargo_bin!("roast")))
}

fn unique_temp_path(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("firmroast-test-{label}-{nanos}"))
}

fn parse_stdout_json(output: &[u8]) -> Value {
    let text = String::from_utf8(output.to_vec()).expect("stdout should be utf-8");
    serde_json::from_str(text.trim()).expect("stdout should contain valid JSON")
}

fn full_answers_file() -> PathBuf {
    let answers = (1..=32)
        .map(|number| (number.to_string(), json!((number % 4) + 1)))
        .collect::<serde_json::Map<_, _>>();
    let path = unique_temp_path("answers");
    fs::write(&path, Value::Object(answers).to_string()).expect("answers should be writable");
    path
}

#[test]
fn analyze_dry_run_succeeds_without_api_key() {
    let assert = firmroast_cmd()
        .args(["analyze", "--dry-run", "Kofola"])
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["dry_run"], Value::Bool(true));
    assert_eq!(body["operation"], "analysis");
    assert_eq!(body["endpoint"], "https://api.openai.com/v1/responses");
    assert_eq!(body["request"]["model"], "gpt-5");
    assert_eq!(body["request"]["tools"], json!([{"type": "web_search"}]));
    assert_eq!(body["request"]["tool_choice"], "auto");
    assert_eq!(body["request"]["reasoning"]["effort"], "low");
    assert!(
        body["request"]["input"]
            .as_str()
            .expect("input should be a string")
            .contains("Kofola")
    );
}

#[test]
fn company_name_is_trimmed_before_prompting() {
    let assert = firmroast_cmd()
        .args(["analyze", "--dry-run", "  Kofola  "])
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    let input = body["request"]["input"].as_str().expect("input should be a string");
    assert!(input.contains("o firmě Kofola z posledních"));
}

#[test]
fn empty_company_name_is_rejected() {
    firmroast_cmd()
        .args(["analyze", "   "])
        .assert()
        .failure()
        .stderr(contains("Company name must not be empty."));
}

#[test]
fn missing_credential_returns_explicit_error() {
    firmroast_cmd()
        .args(["analyze", "Kofola"])
        .assert()
        .failure()
        .stderr(contains("No OpenAI credential found"));
}

#[test]
fn no_web_search_and_effort_flags_shape_request() {
    let assert = firmroast_cmd()
        .args([
            "analyze",
            "--dry-run",
            "--no-web-search",
            "--effort",
            "high",
            "--model",
            "gpt-5-mini",
            "Kofola",
        ])
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert!(body["request"].get("tools").is_none());
    assert!(body["request"].get("tool_choice").is_none());
    assert_eq!(body["request"]["reasoning"]["effort"], "high");
    assert_eq!(body["request"]["model"], "gpt-5-mini");
}

#[test]
fn consult_dry_run_uses_role_template_and_answers() {
    let answers = full_answers_file();
    let assert = firmroast_cmd()
        .args([
            "consult",
            "--dry-run",
            "--company",
            "Kofola",
            "--role",
            "manager",
            "--analysis-text",
            "Předchozí roast",
            "--answers",
        ])
        .arg(&answers)
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["operation"], "consultation");
    assert!(body["request"].get("tools").is_none());
    assert_eq!(body["request"]["reasoning"]["effort"], "medium");
    let input = body["request"]["input"].as_str().expect("input should be a string");
    assert!(input.contains("osobní dopis manažerovi"));
    assert!(input.contains("* Předchozí analýza firmy: Předchozí roast"));
    assert!(input.contains("\"id\": 32"));
    assert!(!input.contains("\"id\": 33"));
}

#[test]
fn consult_rejects_incomplete_answers_without_allow_partial() {
    let answers = unique_temp_path("partial-answers");
    fs::write(&answers, r#"{"1": "Souhlasím", "5": 4}"#).expect("answers should be writable");

    firmroast_cmd()
        .args(["consult", "--dry-run", "--company", "Kofola", "--role", "employee", "--answers"])
        .arg(&answers)
        .assert()
        .failure()
        .stderr(contains("Only 2 of 32 questions answered"));

    let assert = firmroast_cmd()
        .args([
            "consult",
            "--dry-run",
            "--allow-partial",
            "--company",
            "Kofola",
            "--role",
            "employee",
            "--answers",
        ])
        .arg(&answers)
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    let input = body["request"]["input"].as_str().expect("input should be a string");
    assert!(input.contains("osobní dopis klientovi"));
    assert!(input.contains("\"id\": 2,\n    \"question\": \"I při problémech si udržuji pozitivní přístup.\",\n    \"answer\": \"Nesouhlasím\""));
}

#[test]
fn consult_interactive_reads_answers_from_stdin() {
    let assert = firmroast_cmd()
        .args([
            "consult",
            "--dry-run",
            "--interactive",
            "--allow-partial",
            "--company",
            "Kofola",
            "--role",
            "employee",
        ])
        .write_stdin("1\n2\n")
        .assert()
        .success()
        .stderr(contains("Zůstávám klidný i v náročných situacích."));

    let body = parse_stdout_json(&assert.get_output().stdout);
    let input = body["request"]["input"].as_str().expect("input should be a string");
    assert!(input.contains("\"answer\": \"Trochu souhlasím\""));
}

#[test]
fn consult_requires_answers_source() {
    firmroast_cmd()
        .args(["consult", "--company", "Kofola", "--role", "employee"])
        .assert()
        .failure()
        .stderr(contains("--answers"));
}

#[test]
fn invalid_role_is_rejected() {
    firmroast_cmd()
        .args(["consult", "--company", "Kofola", "--role", "ceo", "--interactive"])
        .assert()
        .failure()
        .stderr(contains("invalid value 'ceo'"));
}

#[test]
fn save_writes_and_overwrites_output_file() {
    let output_path = unique_temp_path("save-output");

    firmroast_cmd()
        .args(["analyze", "--dry-run", "--save"])
        .arg(&output_path)
        .arg("First")
        .assert()
        .success();
    let first = fs::read_to_string(&output_path).expect("first output file should exist");
    assert!(first.contains("First"));

    firmroast_cmd()
        .args(["analyze", "--dry-run", "--save"])
        .arg(&output_path)
        .arg("Second")
        .assert()
        .success();
    let second = fs::read_to_string(&output_path).expect("second output file should exist");
    assert!(second.contains("Second"));
    assert!(!second.contains("o firmě First"));
}

#[test]
fn save_with_invalid_parent_path_returns_explicit_error() {
    let parent_file = unique_temp_path("save-invalid-parent");
    fs::write(&parent_file, "not a directory").expect("parent marker file should be writable");

    firmroast_cmd()
        .args(["analyze", "--dry-run", "--save"])
        .arg(parent_file.join("out.json"))
        .arg("Kofola")
        .assert()
        .failure()
        .stderr(contains("Failed to create output directory"));
}

#[test]
fn profile_loads_model_and_effort_for_dry_run() {
    let config_path = unique_temp_path("config");
    fs::write(
        &config_path,
        "[profiles.fast]\nmodel = \"gpt-5-mini\"\nanalysis_effort = \"minimal\"\noutput = \"json\"\n",
    )
    .expect("config should be writable");

    let assert = firmroast_cmd()
        .env("FIRMROAST_CONFIG", &config_path)
        .args(["analyze", "--profile", "fast", "--dry-run", "Kofola"])
        .assert()
        .success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["request"]["model"], "gpt-5-mini");
    assert_eq!(body["request"]["reasoning"]["effort"], "minimal");
    assert_eq!(body["output"], "json");
}

#[test]
fn profile_env_and_cli_precedence_is_respected() {
    let config_path = unique_temp_path("precedence");
    fs::write(
        &config_path,
        "[profiles.p]\nmodel = \"profile-model\"\ntimeout = 7\n",
    )
    .expect("config should be writable");

    let env_over_profile = firmroast_cmd()
        .env("FIRMROAST_CONFIG", &config_path)
        .env("FIRMROAST_MODEL", "env-model")
        .args(["analyze", "--profile", "p", "--dry-run", "Kofola"])
        .assert()
        .success();
    let body = parse_stdout_json(&env_over_profile.get_output().stdout);
    assert_eq!(body["request"]["model"], "env-model");
    assert_eq!(body["timeout_secs"], 7);

    let cli_over_env = firmroast_cmd()
        .env("FIRMROAST_CONFIG", &config_path)
        .env("FIRMROAST_MODEL", "env-model")
        .env("FIRMROAST_TIMEOUT", "21")
        .args([
            "analyze",
            "--profile",
            "p",
            "--model",
            "cli-model",
            "--dry-run",
            "Kofola",
        ])
        .assert()
        .success();
    let body = parse_stdout_json(&cli_over_env.get_output().stdout);
    assert_eq!(body["request"]["model"], "cli-model");
    assert_eq!(body["timeout_secs"], 21);
}

#[test]
fn profile_is_not_implicit_when_not_passed() {
    let config_path = unique_temp_path("config-no-implicit");
    fs::write(&config_path, "[profiles.default]\nmodel = \"profile-model\"\n")
        .expect("config should be writable");

    let assert = firmroast_cmd()
        .env("FIRMROAST_CONFIG", &config_path)
        .args(["analyze", "--dry-run", "Kofola"])
        .assert()
        .success();
    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["request"]["model"], "gpt-5");
}

#[test]
fn invalid_timeout_env_returns_error() {
    firmroast_cmd()
        .env("FIRMROAST_TIMEOUT", "soon")
        .args(["analyze", "--dry-run", "Kofola"])
        .assert()
        .failure()
        .stderr(contains("Invalid FIRMROAST_TIMEOUT 'soon'"));
}

#[test]
fn profile_file_missing_returns_explicit_error() {
    firmroast_cmd()
        .env("FIRMROAST_CONFIG", unique_temp_path("missing-config"))
        .args(["analyze", "--profile", "fast", "Kofola"])
        .assert()
        .failure()
        .stderr(contains("Failed to read config file"));
}

#[test]
fn profile_not_found_returns_error() {
    let config_path = unique_temp_path("profile-not-found");
    fs::write(&config_path, "[profiles.fast]\nmodel = \"m\"\n").expect("config should be writable");

    firmroast_cmd()
        .env("FIRMROAST_CONFIG", &config_path)
        .args(["analyze", "--profile", "missing", "Kofola"])
        .assert()
        .failure()
        .stderr(contains("Profile 'missing' not found"));
}

#[test]
fn config_check_reports_invalid_profile() {
    let config_path = unique_temp_path("config-check");
    fs::write(
        &config_path,
        "[profiles.bad]\nconsultation_effort = \"turbo\"\n",
    )
    .expect("config should be writable");

    firmroast_cmd()
        .env("FIRMROAST_CONFIG", &config_path)
        .args(["config", "check"])
        .assert()
        .failure()
        .stderr(contains("Invalid reasoning effort 'turbo'"));
}

#[test]
fn config_check_accepts_valid_file() {
    let config_path = unique_temp_path("config-ok");
    fs::write(&config_path, "[profiles.fast]\nmodel = \"gpt-5-mini\"\nweb_search = false\n")
        .expect("config should be writable");

    firmroast_cmd()
        .env("FIRMROAST_CONFIG", &config_path)
        .args(["config", "check", "--profile", "fast"])
        .assert()
        .success()
        .stdout(contains("config OK"));
}

#[test]
fn credential_set_status_and_clear() {
    let credentials = unique_temp_path("credential-flow");
    let secret = "sk-test-abcdefgh5678";

    firmroast_cmd()
        .env("FIRMROAST_CREDENTIALS", &credentials)
        .args(["credential", "set"])
        .write_stdin(format!("{secret}\n"))
        .assert()
        .success()
        .stdout(contains("credential stored").and(contains(secret).not()));

    let raw = fs::read_to_string(&credentials).expect("credential file should exist");
    assert!(raw.contains("openai_api_key"));

    firmroast_cmd()
        .env("FIRMROAST_CREDENTIALS", &credentials)
        .args(["credential", "status"])
        .assert()
        .success()
        .stdout(contains("5678").and(contains(secret).not()));

    firmroast_cmd()
        .env("FIRMROAST_CREDENTIALS", &credentials)
        .args(["credential", "clear"])
        .assert()
        .success();

    firmroast_cmd()
        .env("FIRMROAST_CREDENTIALS", &credentials)
        .args(["credential", "status"])
        .assert()
        .success()
        .stdout(contains("stored: none"));
}

#[test]
fn credential_set_rejects_empty_stdin() {
    firmroast_cmd()
        .args(["credential", "set"])
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(contains("No credential provided on stdin."));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn analyze_prints_cleaned_text_from_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(header("authorization", "Bearer sk-env-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": [{
                "type": "message",
                "content": [{"type": "output_text", "text": "Roast [zdroj](https://x.cz) hotov ."}]
            }]
        })))
        .mount(&server)
        .await;

    firmroast_cmd()
        .env("OPENAI_API_KEY", "sk-env-key")
        .env("FIRMROAST_ENDPOINT", format!("{}/v1/responses", server.uri()))
        .args(["analyze", "Kofola"])
        .assert()
        .success()
        .stdout("Roast  hotov.\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stored_credential_is_used_when_env_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer sk-stored-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("stored ok"))
        .mount(&server)
        .await;

    let credentials = unique_temp_path("stored-credential");
    fs::write(&credentials, "openai_api_key = \"sk-stored-key\"\n")
        .expect("credential file should be writable");

    firmroast_cmd()
        .env("FIRMROAST_CREDENTIALS", &credentials)
        .env("FIRMROAST_ENDPOINT", format!("{}/v1/responses", server.uri()))
        .args(["analyze", "Kofola"])
        .assert()
        .success()
        .stdout("stored ok\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn provider_error_exits_with_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    firmroast_cmd()
        .env("OPENAI_API_KEY", "sk-env-key")
        .env("FIRMROAST_ENDPOINT", format!("{}/v1/responses", server.uri()))
        .args(["analyze", "--quiet", "Kofola"])
        .assert()
        .failure()
        .stdout(is_empty())
        .stderr(contains("OpenAI API error 429: slow down"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn json_output_carries_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let assert = firmroast_cmd()
        .env("OPENAI_API_KEY", "sk-env-key")
        .env("FIRMROAST_ENDPOINT", format!("{}/v1/responses", server.uri()))
        .args(["analyze", "--json", "--quiet", "Kofola"])
        .assert()
        .failure();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["content"], "");
    assert_eq!(body["error"], "OpenAI API error 500: oops");
}

#[test]
fn verbose_does_not_leak_api_key() {
    let secret = "sk-secret-value-0000";

    firmroast_cmd()
        .env("OPENAI_API_KEY", secret)
        .env("FIRMROAST_ENDPOINT", "http://127.0.0.1:9/v1/responses")
        .args(["analyze", "--verbose", "Kofola"])
        .assert()
        .failure()
        .stderr(contains("api_key_present=true").and(contains(secret).not()));
}

#[test]
fn quiet_suppresses_verbose_logs_on_stderr() {
    firmroast_cmd()
        .args(["analyze", "--dry-run", "--verbose", "--quiet", "Kofola"])
        .assert()
        .success()
        .stderr(is_empty());
}

#[test]
fn questions_lists_all_statements() {
    firmroast_cmd()
        .arg("questions")
        .assert()
        .success()
        .stdout(
            contains(" 1. Zůstávám klidný i v náročných situacích.")
                .and(contains("32. Rád/a čtu odborné články, knihy nebo sleduji kurzy."))
                .and(contains("1=Souhlasím")),
        );
}

#[test]
fn version_prints_build_metadata() {
    firmroast_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(
            contains("commit:")
                .and(contains("built:"))
                .and(contains("profile: debug").or(contains("profile: release"))),
        );
}

#[test]
fn roast_binary_matches_analyze_output_shape() {
    let assert = roast_cmd().args(["--dry-run", "Kofola"]).assert().success();

    let body = parse_stdout_json(&assert.get_output().stdout);
    assert_eq!(body["operation"], "analysis");
    assert_eq!(body["output"], "text");
}

#[test]
fn roast_version_prints_metadata() {
    roast_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("commit:").and(contains("built:")));
}

#[test]
fn completion_bash_outputs_script() {
    firmroast_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(contains("_firmroast").and(contains("complete")));
}

#[test]
fn help_mentions_commands_and_examples() {
    firmroast_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            contains("completion")
                .and(contains("credential"))
                .and(contains("Examples:")),
        );
}
