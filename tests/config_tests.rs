use skatesync::config::Config;

#[test]
fn test_health_url_is_served_from_the_server_root() {
    let cfg = Config::default();
    assert_eq!(cfg.api_base_url, "http://localhost:8000/api");
    assert_eq!(cfg.health_url(), "http://localhost:8000/health");

    let cfg = Config {
        api_base_url: "https://skate.example.org/api/".to_string(),
        health_path: "health".to_string(),
        ..Config::default()
    };
    assert_eq!(cfg.health_url(), "https://skate.example.org/health");
}

#[test]
fn test_health_path_may_carry_its_own_prefix() {
    let cfg = Config {
        api_base_url: "http://127.0.0.1:9000/api".to_string(),
        health_path: "/api/ping".to_string(),
        ..Config::default()
    };
    assert_eq!(cfg.health_url(), "http://127.0.0.1:9000/api/ping");
}

#[test]
fn test_refresh_limit_stays_within_server_bounds() {
    let mut cfg = Config {
        refresh_limit: 500,
        ..Config::default()
    };
    assert_eq!(cfg.sync_settings().refresh_limit, 100);

    cfg.refresh_limit = 0;
    assert_eq!(cfg.sync_settings().refresh_limit, 1);

    cfg.refresh_limit = 50;
    assert_eq!(cfg.sync_settings().refresh_limit, 50);
}
