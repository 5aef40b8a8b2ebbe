use anyhow::Result;
use httpmock::prelude::*;
use tempfile::TempDir;
use tsdr_lookup::domain::ports::Pipeline;
use tsdr_lookup::{AppConfig, LocalStorage, LookupEngine, LookupError, LookupPipeline, Session};

fn config_toml(base_url: &str, key_line: &str) -> String {
    format!(
        r#"
[api]
base_url = "{}"
{}

[credentials]
alice = "s3cret"

[output]
path = "./output"
formats = ["csv"]
"#,
        base_url, key_line
    )
}

#[tokio::test]
async fn test_http_failure_becomes_an_error_row() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ts/cd/casestatus/sn97439760/info.xml");
        then.status(404);
    });

    let config = AppConfig::from_toml_str(&config_toml(&server.base_url(), "key = \"k\""))?;
    let pipeline = LookupPipeline::new(
        LocalStorage::new("unused"),
        config,
        vec!["97439760".to_string()],
    );

    let records = pipeline.extract().await?;

    assert_eq!(records.len(), 1);
    assert!(records[0].is_failure());
    assert_eq!(records[0].application_number, "97439760");
    assert_eq!(records[0].error, "HTTP 404");
    assert!(records[0].status.is_empty());
    assert!(records[0].mark_name.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_api_key_rejects_batch_before_any_request() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/ts/cd/casestatus");
        then.status(200).body("<x/>");
    });

    // The placeholder never resolved, so no key is configured
    let config = AppConfig::from_toml_str(&config_toml(
        &server.base_url(),
        "key = \"${NOT_SET_IN_THIS_TEST}\"",
    ))?;
    let temp_dir = TempDir::new()?;
    let session = Session::login(&config.credentials, "alice", "s3cret")?;

    let pipeline = LookupPipeline::new(
        LocalStorage::new(temp_dir.path()),
        config,
        vec!["97439760".to_string(), "77434372".to_string()],
    );
    let engine = LookupEngine::new(pipeline);

    let result = engine.run(&session).await;

    assert!(matches!(
        result,
        Err(LookupError::MissingConfigError { .. })
    ));
    assert_eq!(api_mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_login_gate_blocks_before_processing() -> Result<()> {
    let config = AppConfig::from_toml_str(&config_toml("http://localhost:1", "key = \"k\""))?;

    assert!(Session::login(&config.credentials, "alice", "wrong").is_err());
    assert!(Session::login(&config.credentials, "nobody", "s3cret").is_err());

    let session = Session::login(&config.credentials, "alice", "s3cret")?;
    assert_eq!(session.username(), "alice");
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_contained_as_an_error_row() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ts/cd/casestatus/sn97439760/info.xml");
        then.status(200)
            .body("<x/>")
            .delay(std::time::Duration::from_millis(1500));
    });

    let mut config = AppConfig::from_toml_str(&config_toml(&server.base_url(), "key = \"k\""))?;
    config.api.timeout_seconds = 1;

    let pipeline = LookupPipeline::new(
        LocalStorage::new("unused"),
        config,
        vec!["97439760".to_string()],
    );

    let records = pipeline.extract().await?;

    assert_eq!(records.len(), 1);
    assert!(records[0].is_failure());
    assert!(!records[0].error.is_empty());
    Ok(())
}
