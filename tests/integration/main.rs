//! Integration tests for hvctl

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use chrono::{Duration, Utc};
    use predicates::prelude::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Isolated config and cache locations
    struct Sandbox {
        dir: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        fn config(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn cache(&self) -> PathBuf {
            self.dir.path().join("inventory.json")
        }

        /// Cache holding `web` (Running) and `db` (Off), synced `age` ago
        fn write_cache(&self, age: Duration) {
            let cache = serde_json::json!({
                "version": 1,
                "last_sync": Utc::now() - age,
                "records": [
                    {
                        "id": "0b3c6a4e-1f6e-4a5e-9a38-5d1c2f0e7a11",
                        "name": "web",
                        "state": 2,
                        "index": 1
                    },
                    {
                        "id": "7f0e2d9c-8b4a-4c3e-b1d2-6a5f4e3d2c1b",
                        "name": "db",
                        "state": 3,
                        "index": 2
                    }
                ]
            });
            std::fs::write(self.cache(), serde_json::to_vec_pretty(&cache).unwrap()).unwrap();
        }

        fn hvctl(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("hvctl");
            cmd.arg("--config")
                .arg(self.config())
                .arg("--cache-file")
                .arg(self.cache());
            cmd
        }
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("hvctl")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Hyper-V"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("hvctl")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("hvctl"));
    }

    #[test]
    fn config_path() {
        let sandbox = Sandbox::new();
        sandbox
            .hvctl()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_set_then_show() {
        let sandbox = Sandbox::new();
        sandbox
            .hvctl()
            .args(["config", "set", "server.host", "hv01.lab"])
            .assert()
            .success();

        sandbox
            .hvctl()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hv01.lab"));
    }

    #[test]
    fn config_set_unknown_key() {
        let sandbox = Sandbox::new();
        sandbox
            .hvctl()
            .args(["config", "set", "server.hots", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn list_fresh_cache_without_host() {
        let sandbox = Sandbox::new();
        sandbox.write_cache(Duration::seconds(5));

        sandbox
            .hvctl()
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("INDEX"))
            .stdout(predicate::str::contains("web"))
            .stdout(predicate::str::contains("db"));
    }

    #[test]
    fn list_json_filtered() {
        let sandbox = Sandbox::new();
        sandbox.write_cache(Duration::seconds(5));

        sandbox
            .hvctl()
            .args(["list", "--format", "json", "--name", "WE"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"name\": \"web\""))
            .stdout(predicate::str::contains("db").not());
    }

    #[test]
    fn list_stale_cache_needs_host() {
        let sandbox = Sandbox::new();
        sandbox.write_cache(Duration::hours(2));

        sandbox
            .hvctl()
            .arg("list")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No Hyper-V host configured"));
    }

    #[test]
    fn list_corrupt_cache_needs_host() {
        let sandbox = Sandbox::new();
        std::fs::write(sandbox.cache(), "{ not json").unwrap();

        // A corrupt cache is treated as empty, which forces a sync
        sandbox
            .hvctl()
            .arg("list")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No Hyper-V host configured"));
    }

    #[test]
    fn start_unknown_index() {
        let sandbox = Sandbox::new();
        sandbox.write_cache(Duration::seconds(5));

        sandbox
            .hvctl()
            .args(["--host", "hv.invalid", "start", "99"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No such machine"));
    }

    #[test]
    fn start_without_target() {
        let sandbox = Sandbox::new();
        sandbox.write_cache(Duration::seconds(5));

        sandbox
            .hvctl()
            .args(["--host", "hv.invalid", "start"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid argument"));
    }

    #[test]
    fn create_with_bad_index() {
        let sandbox = Sandbox::new();
        sandbox.write_cache(Duration::seconds(5));

        sandbox
            .hvctl()
            .args(["--host", "hv.invalid", "create", "first", "base"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("is not a machine index"));
    }

    #[test]
    fn delete_without_yes_is_aborted() {
        let sandbox = Sandbox::new();
        sandbox.write_cache(Duration::seconds(5));

        sandbox
            .hvctl()
            .args(["--host", "hv.invalid", "delete", "1", "base"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Aborted"));
    }

    #[test]
    fn completions_bash() {
        cargo_bin_cmd!("hvctl")
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hvctl"));
    }
}
