use super::*;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: &[&str] =
    &["DATABASE_URL", "PORT", "DB_MAX_CONNECTIONS", "STATIC_DIR", "FACT_CHECK_MAX_TOKENS"];

/// # Safety
/// Callers must hold `ENV_LOCK`.
unsafe fn clear_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/agrifact");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(
        cfg,
        AppConfig {
            port: DEFAULT_PORT,
            database_url: "postgres://localhost/agrifact".into(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            fact_check_max_tokens: DEFAULT_FACT_CHECK_MAX_TOKENS,
        }
    );

    unsafe { clear_env() };
}

#[test]
fn from_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://db/agrifact");
        std::env::set_var("PORT", "8080");
        std::env::set_var("DB_MAX_CONNECTIONS", "12");
        std::env::set_var("STATIC_DIR", "public");
        std::env::set_var("FACT_CHECK_MAX_TOKENS", "400");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.db_max_connections, 12);
    assert_eq!(cfg.static_dir, PathBuf::from("public"));
    assert_eq!(cfg.fact_check_max_tokens, 400);

    unsafe { clear_env() };
}

#[test]
fn from_env_requires_database_url() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe { clear_env() };

    assert_eq!(AppConfig::from_env(), Err(ConfigError::Missing("DATABASE_URL")));
}

#[test]
fn from_env_rejects_bad_port() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://db/agrifact");
        std::env::set_var("PORT", "eighty");
    }

    assert_eq!(AppConfig::from_env(), Err(ConfigError::Invalid { var: "PORT", value: "eighty".into() }));

    unsafe { clear_env() };
}

#[test]
fn bad_numeric_settings_fall_back() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://db/agrifact");
        std::env::set_var("DB_MAX_CONNECTIONS", "lots");
        std::env::set_var("FACT_CHECK_MAX_TOKENS", "-1");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.fact_check_max_tokens, DEFAULT_FACT_CHECK_MAX_TOKENS);

    unsafe { clear_env() };
}
