use std::path::Path;

use skillgraph::SgError;
use skillgraph::config::Config;
use skillgraph::test_utils::fixtures::UnitTestFixture;

#[test]
fn explicit_config_file_is_loaded() {
    let fixture = UnitTestFixture::new().unwrap();
    let path = fixture.data_path.join("custom.toml");
    std::fs::write(
        &path,
        r#"
[catalog]
database = "catalog.sqlite"

[planning]
sort_violations = false
"#,
    )
    .unwrap();

    let config = Config::load(Some(&path), &fixture.data_path).unwrap();
    assert_eq!(config.catalog.database, "catalog.sqlite");
    assert!(!config.planning.sort_violations);
    assert_eq!(
        config.catalog.database_path(&fixture.data_path),
        fixture.data_path.join("catalog.sqlite")
    );
}

#[test]
fn missing_explicit_config_is_an_error() {
    let fixture = UnitTestFixture::new().unwrap();
    let err = Config::load(Some(&fixture.data_path.join("nope.toml")), &fixture.data_path)
        .unwrap_err();
    assert!(matches!(err, SgError::Config(_)));
}

#[test]
fn rendered_defaults_load_back_unchanged() {
    let fixture = UnitTestFixture::new().unwrap();
    let path = fixture.data_path.join("config.toml");
    std::fs::write(&path, Config::default().to_toml().unwrap()).unwrap();

    let loaded = Config::load(Some(&path), &fixture.data_path).unwrap();
    assert_eq!(loaded.catalog, Config::default().catalog);
    assert_eq!(loaded.planning, Config::default().planning);
}

#[test]
fn absolute_database_path_is_kept() {
    let mut config = Config::default();
    config.catalog.database = "/var/lib/sg/skills.db".to_string();
    assert_eq!(
        config.catalog.database_path(Path::new("/home/me/.sg")),
        Path::new("/var/lib/sg/skills.db")
    );
}
