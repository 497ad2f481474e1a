//! End-to-end session tests against a real data directory.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;

use kinship_core::{CoreError, Network, NetworkConfig, PersistenceMode};
use kinship_types::{IdentityKey, Profile};

/// Parse `yaml`, then pin the data directory to `dir` so a stray
/// `KINSHIP_DATA_DIR` cannot redirect the test.
fn config_for(dir: &tempfile::TempDir, yaml: &str) -> NetworkConfig {
    let mut config = NetworkConfig::parse(yaml).unwrap();
    config.storage.data_dir = dir.path().to_path_buf();
    config
}

fn profile(name: &str) -> Profile {
    Profile {
        name: name.to_owned(),
        address: format!("{name} Avenue"),
        email: IdentityKey::parse(&format!("{}@kin.test", name.to_lowercase())).unwrap(),
        password: format!("{name}-pw"),
        date_of_birth: Profile::parse_date_of_birth("1988-08-08").unwrap(),
    }
}

fn login(net: &mut Network, name: &str) {
    net.login(&format!("{}@kin.test", name.to_lowercase()), &format!("{name}-pw"))
        .unwrap();
}

#[test]
fn snapshot_files_use_line_formats() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "");
    let mut net = Network::open(&config).unwrap();
    for name in ["Alice", "Bob"] {
        net.register(profile(name)).unwrap();
    }
    login(&mut net, "Alice");
    net.add_friend("bob@kin.test").unwrap();
    net.push_event("graduated").unwrap();
    net.push_event("moved").unwrap();

    let friends = fs::read_to_string(dir.path().join("friends.txt")).unwrap();
    assert_eq!(friends, "alice@kin.test:bob@kin.test,\nbob@kin.test:alice@kin.test,\n");

    let events = fs::read_to_string(dir.path().join("life_events_alice@kin.test.txt")).unwrap();
    assert_eq!(events, "graduated\nmoved\n");

    let users = fs::read_to_string(dir.path().join("users.txt")).unwrap();
    assert_eq!(users.lines().count(), 10);
    assert!(users.starts_with("Alice\nAlice Avenue\nalice@kin.test\nAlice-pw\n1988-08-08\n"));
}

#[test]
fn ignore_policy_deduplicates_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "graph:\n  duplicate_policy: ignore\n");
    {
        let mut net = Network::open(&config).unwrap();
        net.register(profile("Alice")).unwrap();
        net.register(profile("Bob")).unwrap();
        login(&mut net, "Alice");
        net.add_friend("bob@kin.test").unwrap();
        net.add_friend("bob@kin.test").unwrap();
    }

    let mut net = Network::open(&config).unwrap();
    login(&mut net, "Bob");
    net.add_friend("alice@kin.test").unwrap();
    assert_eq!(net.friends().unwrap().len(), 1);
    assert_eq!(net.stats().friendships, 1);
}

#[test]
fn keep_policy_records_repeats() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "");
    let mut net = Network::open(&config).unwrap();
    net.register(profile("Alice")).unwrap();
    net.register(profile("Bob")).unwrap();
    login(&mut net, "Alice");
    net.add_friend("bob@kin.test").unwrap();
    net.add_friend("bob@kin.test").unwrap();

    let friends = net.friends().unwrap();
    assert_eq!(friends.len(), 2);
    assert_eq!(friends[0], friends[1]);
    assert_eq!(net.stats().friendships, 1);
}

#[test]
fn stale_snapshot_lines_are_dropped_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "");
    {
        let mut net = Network::open(&config).unwrap();
        net.register(profile("Alice")).unwrap();
    }
    fs::write(
        dir.path().join("friends.txt"),
        "alice@kin.test:ghost@kin.test,\nghost@kin.test:alice@kin.test,\ngarbage\n",
    )
    .unwrap();

    let mut net = Network::open(&config).unwrap();
    login(&mut net, "Alice");
    assert!(net.friends().unwrap().is_empty());
}

#[test]
fn on_shutdown_loses_unflushed_changes() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir, "persistence:\n  mode: on_shutdown\n");
    assert_eq!(config.persistence.mode, PersistenceMode::OnShutdown);
    {
        let mut net = Network::open(&config).unwrap();
        net.register(profile("Alice")).unwrap();
    }

    let mut net = Network::open(&config).unwrap();
    assert!(matches!(
        net.login("alice@kin.test", "Alice-pw"),
        Err(CoreError::InvalidCredentials)
    ));
}
