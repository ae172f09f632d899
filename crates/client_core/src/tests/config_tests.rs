use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_path(label: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("aleo_transfer_{label}_{suffix}.toml"))
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn missing_file_yields_defaults() {
    let settings = load_settings_from(&temp_settings_path("missing"), no_env);
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.network_rebind_timeout(), Duration::from_secs(5));
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_path("file");
    fs::write(
        &path,
        r#"
app_name = "Desk"
default_network = "testnet"
network_rebind_timeout_ms = 250
finalized_statuses = ["Finalized", "Rejected"]
"#,
    )
    .expect("write settings");

    let settings = load_settings_from(&path, no_env);
    assert_eq!(settings.app_name, "Desk");
    assert_eq!(settings.default_network, NetworkId::Testnet);
    assert_eq!(settings.network_rebind_timeout_ms, 250);
    assert_eq!(settings.finalized_statuses, vec!["Finalized", "Rejected"]);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn environment_wins_over_file() {
    let path = temp_settings_path("env");
    fs::write(&path, "default_network = \"testnet\"\nevent_buffer = 8\n").expect("write settings");

    let vars: HashMap<&str, &str> = HashMap::from([
        ("APP__DEFAULT_NETWORK", "mainnet"),
        ("APP__EVENT_BUFFER", "0"),
        ("APP__FINALIZED_STATUSES", "Finalized, ,Failed"),
    ]);
    let settings = load_settings_from(&path, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.default_network, NetworkId::Mainnet);
    assert_eq!(settings.event_buffer, 1);
    assert_eq!(settings.finalized_statuses, vec!["Finalized", "Failed"]);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn malformed_values_are_ignored() {
    let path = temp_settings_path("bad");
    fs::write(&path, "this is not toml = = =").expect("write settings");

    let vars: HashMap<&str, &str> = HashMap::from([
        ("APP__DEFAULT_NETWORK", "devnet"),
        ("APP__NETWORK_REBIND_TIMEOUT_MS", "soon"),
    ]);
    let settings = load_settings_from(&path, |key| vars.get(key).map(|v| v.to_string()));
    assert_eq!(settings, ClientSettings::default());

    fs::remove_file(path).expect("cleanup");
}
