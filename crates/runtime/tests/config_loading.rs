use std::io::Write;

use runtime::{
    ConfigError, InMemoryCharacterRepo, MemorySink, RulesRuntime, RuntimeConfig, RuntimeError,
};

#[test]
fn loads_rules_from_a_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
seed = 7
event_buffer_size = 16

[rules]
unarmed_skill = "Brawl"
unarmed_damage = "STR+1"
base_light_boxes = 3
"#
    )
    .unwrap();

    let config = RuntimeConfig::load(file.path()).unwrap();

    assert_eq!(config.seed, Some(7));
    assert_eq!(config.event_buffer_size, 16);
    assert_eq!(config.rules.unarmed_skill, "Brawl");
    assert_eq!(config.rules.unarmed_damage, "STR+1");
    assert_eq!(config.rules.base_light_boxes, 3);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = RuntimeConfig::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Read { path: ref reported, .. } if *reported == path));
}

#[test]
fn builder_rejects_an_unparseable_unarmed_damage() {
    let mut config = RuntimeConfig::default().with_seed(1);
    config.rules.unarmed_damage = "STR+lots".into();

    let err = RulesRuntime::builder()
        .config(config)
        .repository(InMemoryCharacterRepo::new())
        .sink(MemorySink::new())
        .build()
        .err()
        .unwrap();

    assert!(matches!(
        err,
        RuntimeError::Config(ConfigError::UnarmedDamage(_))
    ));
}
