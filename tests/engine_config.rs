// tests/engine_config.rs
use scorelytic_bias::config::engine::ENV_CONFIG_PATH;
use scorelytic_bias::{AppState, EngineConfig, KnowledgeBase};
use std::{env, fs};

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    // 1) Nothing on disk → defaults
    let cfg = EngineConfig::load_default().unwrap();
    assert_eq!(cfg, EngineConfig::default());

    // 2) Fallback config/engine.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("engine.toml"),
        "[validation]\nscore_min = 0.0\nscore_max = 10.0\n",
    )
    .unwrap();
    let cfg = EngineConfig::load_default().unwrap();
    assert_eq!(cfg.validation.score_min, 0.0);

    // 3) Env wins
    let p_env = tmp.path().join("custom.toml");
    fs::write(&p_env, "[validation]\nmax_indicators = 4\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    let cfg = EngineConfig::load_default().unwrap();
    assert_eq!(cfg.validation.max_indicators, 4);
    assert_eq!(cfg.validation.score_min, -1.0);

    // 4) Env pointing nowhere is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml"));
    assert!(EngineConfig::load_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn derived_path_in_config_replaces_builtin_tables() {
    let tmp = tempfile::tempdir().unwrap();

    let derived = tmp.path().join("derived.json");
    fs::write(
        &derived,
        r#"{
            "hype bias": {
                "severity": "high",
                "baseScoreInfluence": 2.0,
                "maxScoreInfluence": 2.5,
                "impactOnExperience": "x",
                "explanation": "y"
            }
        }"#,
    )
    .unwrap();

    let cfg_path = tmp.path().join("engine.toml");
    fs::write(
        &cfg_path,
        format!(
            "[heuristics]\nderived_path = {:?}\n",
            derived.display().to_string()
        ),
    )
    .unwrap();

    env::set_var(ENV_CONFIG_PATH, cfg_path.display().to_string());
    let state = AppState::from_env().unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    assert_eq!(state.kb.len(), 1);
    assert_eq!(state.kb.get("hype bias").unwrap().base_score_influence, 2.0);
    assert_ne!(state.kb.fingerprint(), KnowledgeBase::builtin().fingerprint());
}
