#![cfg(unix)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use liquid_swap::liquid::exec::{ProcessGateway, ToolGateway as _, ToolInvocation};

fn sh(script: &str, extra_args: &[&str], stdin: Option<&str>) -> ToolInvocation {
    let mut args = vec!["-c".to_string(), script.to_string(), "sh".to_string()];
    args.extend(extra_args.iter().map(|a| a.to_string()));
    ToolInvocation {
        program: PathBuf::from("/bin/sh"),
        env: vec![
            ("LC_ALL".to_string(), "C.UTF-8".to_string()),
            ("LANG".to_string(), "C.UTF-8".to_string()),
        ],
        args,
        stdin: stdin.map(|s| s.as_bytes().to_vec()),
    }
}

#[tokio::test]
async fn captures_stdout_and_exit_code() -> Result<()> {
    let out = ProcessGateway
        .execute(&sh(r#"printf '%s|' "$@""#, &["--conf-file", "x.conf", "info", "-"], None))
        .await?;

    assert!(out.success());
    assert_eq!(out.stdout, "--conf-file|x.conf|info|-|");
    assert!(out.stderr.is_empty());
    Ok(())
}

#[tokio::test]
async fn forwards_payload_on_stdin() -> Result<()> {
    let script = r#"while IFS= read -r line || [ -n "$line" ]; do printf '%s' "$line"; done"#;
    let out = ProcessGateway
        .execute(&sh(script, &[], Some(r#"{"psbt":"abc"}"#)))
        .await?;

    assert_eq!(out.stdout, r#"{"psbt":"abc"}"#);
    Ok(())
}

#[tokio::test]
async fn environment_is_restricted_to_locale() -> Result<()> {
    let out = ProcessGateway
        .execute(&sh(r#"printf '%s|%s|%s' "$LC_ALL" "$LANG" "$CARGO""#, &[], None))
        .await?;

    assert_eq!(out.stdout, "C.UTF-8|C.UTF-8|");
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_reported_not_raised() -> Result<()> {
    let out = ProcessGateway
        .execute(&sh("printf 'boom' >&2; exit 3", &[], None))
        .await?;

    assert!(!out.success());
    assert_eq!(out.code, Some(3));
    assert_eq!(out.stderr, "boom");
    Ok(())
}

#[tokio::test]
async fn tool_ignoring_stdin_is_not_an_error() -> Result<()> {
    let big = "x".repeat(1 << 20);
    let out = ProcessGateway
        .execute(&sh("printf '{}'", &[], Some(&big)))
        .await?;

    assert_eq!(out.stdout, "{}");
    Ok(())
}

#[tokio::test]
async fn missing_program_is_an_execution_layer_error() {
    let inv = ToolInvocation {
        program: PathBuf::from("/nonexistent/liquidswap-cli"),
        env: Vec::new(),
        args: Vec::new(),
        stdin: None,
    };

    let err = ProcessGateway.execute(&inv).await.unwrap_err();
    assert!(format!("{err:#}").contains("spawn /nonexistent/liquidswap-cli"));
}

#[tokio::test]
async fn dropped_run_does_not_block() {
    let started = Instant::now();
    let hung = sh("while :; do :; done", &[], None);

    let res = tokio::time::timeout(Duration::from_millis(200), ProcessGateway.execute(&hung)).await;

    assert!(res.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
}
