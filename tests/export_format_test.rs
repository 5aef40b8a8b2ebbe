use anyhow::Result;
use httpmock::prelude::*;
use tempfile::TempDir;
use tsdr_lookup::config::toml_config::{ApiConfig, OutputConfig};
use tsdr_lookup::{AppConfig, LocalStorage, LookupEngine, LookupPipeline, Session};

const CASE_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ns2:Transaction xmlns:ns1="http://www.wipo.int/standards/XMLSchema/ST96/Common"
                 xmlns:ns2="http://www.wipo.int/standards/XMLSchema/ST96/Trademark">
  <ns2:ApplicationDate>2022-06-01-04:00</ns2:ApplicationDate>
  <ns2:MarkVerbalElementText>IRONWOOD OUTFITTERS</ns2:MarkVerbalElementText>
</ns2:Transaction>"#;

fn config_with_formats(base_url: String, output_path: String, formats: &[&str]) -> AppConfig {
    let mut credentials = std::collections::HashMap::new();
    credentials.insert("alice".to_string(), "s3cret".to_string());

    AppConfig {
        api: ApiConfig {
            base_url,
            key: Some("test-key".to_string()),
            timeout_seconds: 10,
        },
        credentials,
        output: OutputConfig {
            path: output_path,
            formats: formats.iter().map(|f| f.to_string()).collect(),
        },
    }
}

fn archive_member_names(zip_path: &str) -> Vec<String> {
    let zip_data = std::fs::read(zip_path).unwrap();
    let cursor = std::io::Cursor::new(zip_data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}

fn read_zip_member(zip_path: &str, member: &str) -> String {
    let zip_data = std::fs::read(zip_path).unwrap();
    let cursor = std::io::Cursor::new(zip_data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();
    let mut file = archive.by_name(member).unwrap();
    let mut content = String::new();
    std::io::Read::read_to_string(&mut file, &mut content).unwrap();
    content
}

#[tokio::test]
async fn test_bundle_contains_exactly_the_configured_formats() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ts/cd/casestatus/sn97439760/info.xml");
        then.status(200).body(CASE_BODY);
    });

    let config = config_with_formats(
        server.base_url(),
        output_path.clone(),
        &["csv", "tsv", "json"],
    );
    let session = Session::login(&config.credentials, "alice", "s3cret")?;

    let pipeline = LookupPipeline::new(
        LocalStorage::new(output_path.clone()),
        config,
        vec!["97439760".to_string()],
    );
    let engine = LookupEngine::new(pipeline);

    let zip_path = engine.run(&session).await?;

    // All lookups succeeded, so no failed_lookups.json
    assert_eq!(
        archive_member_names(&zip_path),
        vec!["output.csv", "output.json", "output.tsv"]
    );

    let json_content = read_zip_member(&zip_path, "output.json");
    let records: serde_json::Value = serde_json::from_str(&json_content)?;
    assert_eq!(records[0]["Application Number"], "97439760");
    assert_eq!(records[0]["Application Date"], "2022-06-01");
    assert_eq!(records[0]["Mark Name"], "IRONWOOD OUTFITTERS");
    assert_eq!(records[0]["Filed as ITU"], "No");
    Ok(())
}

#[tokio::test]
async fn test_failed_lookups_are_bundled_when_present() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ts/cd/casestatus/sn97439760/info.xml");
        then.status(200).body(CASE_BODY);
    });
    server.mock(|when, then| {
        when.method(GET).path("/ts/cd/casestatus/sn11111111/info.xml");
        then.status(500);
    });

    let config = config_with_formats(server.base_url(), output_path.clone(), &["csv"]);
    let session = Session::login(&config.credentials, "alice", "s3cret")?;

    let pipeline = LookupPipeline::new(
        LocalStorage::new(output_path.clone()),
        config,
        vec!["97439760".to_string(), "11111111".to_string()],
    );
    let engine = LookupEngine::new(pipeline);

    let zip_path = engine.run(&session).await?;

    assert_eq!(
        archive_member_names(&zip_path),
        vec!["failed_lookups.json", "output.csv"]
    );

    let failed: serde_json::Value =
        serde_json::from_str(&read_zip_member(&zip_path, "failed_lookups.json"))?;
    assert_eq!(failed.as_array().unwrap().len(), 1);
    assert_eq!(failed[0]["Application Number"], "11111111");
    assert_eq!(failed[0]["Error"], "HTTP 500");
    Ok(())
}
