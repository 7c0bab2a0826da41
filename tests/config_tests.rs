//! Tests for loading the console configuration from YAML files

use anyhow::Result;
use listview::config::{ConsoleConfig, UpdateMethod};
use listview::core::{ConfigError, ListviewError};
use listview::resources::Faq;
use listview::storage::RestCollection;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_yaml(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_from_file() -> Result<()> {
    let file = write_yaml(
        r#"
api_base_url: "http://localhost:9124"
analytics_base_url: "http://localhost:5002"
default_page_size: 20
page_sizes: [10, 20, 50]
collections:
  faqs:
    list: /api/admin/getallfaqs
    create: /api/admin/createfaq
    update: /api/admin/updatefaq/{id}
    delete: /api/admin/deletefaq/{id}
  visiting_cards:
    list: /api/all
    update: /api/update/{id}
    update_method: PATCH
"#,
    )?;

    let config = ConsoleConfig::from_yaml_file(file.path())?;

    assert_eq!(config.default_page_size, 20);
    assert_eq!(config.page_sizes, vec![10, 20, 50]);
    assert_eq!(config.analytics_base_url.as_deref(), Some("http://localhost:5002"));

    let names: Vec<_> = config.collections.keys().cloned().collect();
    assert_eq!(names, vec!["faqs", "visiting_cards"]);
    assert_eq!(
        config.collection("visiting_cards")?.update_method,
        UpdateMethod::Patch
    );

    let faqs = RestCollection::<Faq>::from_config(&config, "faqs")?;
    assert_eq!(
        faqs.url(faqs.endpoints().delete.as_deref().unwrap_or_default(), Some("f9")),
        "http://localhost:9124/api/admin/deletefaq/f9"
    );
    Ok(())
}

#[test]
fn test_default_config_round_trips_through_file() -> Result<()> {
    let config = ConsoleConfig::default_config();
    let file = write_yaml(&serde_yaml::to_string(&config)?)?;

    assert_eq!(ConsoleConfig::from_yaml_file(file.path())?, config);
    Ok(())
}

#[test]
fn test_missing_file() {
    let err = ConsoleConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, ListviewError::Config(ConfigError::Io { .. })));
    assert!(err.to_string().contains("/definitely/not/here.yaml"));
}

#[test]
fn test_invalid_file() -> Result<()> {
    let file = write_yaml("api_base_url: http://localhost\npage_sizes: [5, 0]\n")?;

    let err = ConsoleConfig::from_yaml_file(file.path()).unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("page_sizes"));
    Ok(())
}

#[test]
fn test_unknown_collection_for_client() {
    let config = ConsoleConfig::default_config();
    assert!(RestCollection::<Faq>::from_config(&config, "newsletters").is_err());
}
