//! Integration tests for runcached

mod cli_tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn runcached() -> Command {
        Command::new(env!("CARGO_BIN_EXE_runcached"))
    }

    #[test]
    fn help_displays() {
        runcached()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("host-wide result cache"));
    }

    #[test]
    fn version_displays() {
        runcached()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("runcached"));
    }

    #[test]
    fn payload_passes_through_verbatim() {
        let dir = TempDir::new().unwrap();
        runcached()
            .args(["-f"])
            .arg(dir.path().join("c"))
            .args(["--", "printf", "no-newline"])
            .assert()
            .success()
            .stdout("no-newline");
    }

    #[test]
    fn fresh_cache_reuses_result() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("c");

        let first = runcached()
            .args(["-a", "60", "-m", "^x", "-f"])
            .arg(&cache)
            .args(["--", "echo", "x$(date +%s%N)"])
            .assert()
            .success();
        let first = first.get_output().stdout.clone();

        runcached()
            .args(["-a", "60", "-m", "^x", "-f"])
            .arg(&cache)
            .args(["--", "echo", "x$(date +%s%N)"])
            .assert()
            .success()
            .stdout(first);
    }

    #[test]
    fn zero_max_age_reruns() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("c");

        let run = |cache: &std::path::Path| {
            let assert = runcached()
                .args(["-a", "0", "-m", "^x", "-f"])
                .arg(cache)
                .args(["--", "sleep 0.05; echo x$(date +%s%N)"])
                .assert()
                .success();
            assert.get_output().stdout.clone()
        };

        assert_ne!(run(&cache), run(&cache));
    }

    #[test]
    fn validation_failure_exits_nonzero() {
        let dir = TempDir::new().unwrap();
        runcached()
            .args(["-m", "^x", "-f"])
            .arg(dir.path().join("c"))
            .args(["--", "echo", "mismatch"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("did not match"));
    }

    #[test]
    fn command_failure_carries_stderr() {
        let dir = TempDir::new().unwrap();
        runcached()
            .args(["-f"])
            .arg(dir.path().join("c"))
            .args(["--", "echo boom >&2; exit 2"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("boom"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let dir = TempDir::new().unwrap();
        runcached()
            .args(["-m", "[unclosed", "-f"])
            .arg(dir.path().join("c"))
            .args(["--", "echo", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid validator pattern"));
    }

    #[test]
    #[cfg(unix)]
    fn cache_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("c");

        runcached()
            .args(["-f"])
            .arg(&cache)
            .args(["--", "echo", "payload"])
            .assert()
            .success();

        let mode = std::fs::metadata(&cache).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn lock_sidecar_is_created_and_kept() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("c");

        runcached()
            .args(["-f"])
            .arg(&cache)
            .args(["--", "echo", "payload"])
            .assert()
            .success();

        assert!(dir.path().join("c.lock").exists());
    }
}

mod coordination_tests {
    use fs4::fs_std::FileExt;
    use std::process::{Command, Stdio};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Five concurrent processes, a slow command, and no staleness
    /// window: the lock must serialize them onto a single execution
    /// whose result every process prints.
    ///
    /// Coalescing covers callers whose pre-wait snapshot precedes the
    /// winning execution. Holding a shared lock on the sidecar while
    /// the processes start keeps all of them in that position: their
    /// snapshots proceed (shared holders coexist) but no one can enter
    /// the exclusive critical section until the gate drops.
    #[test]
    fn concurrent_processes_coalesce_onto_one_execution() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("c");
        let counter = dir.path().join("executions");
        let cmd = format!(
            "echo run >> {}; sleep 0.3; echo x$(date +%s%N)",
            counter.display()
        );

        let gate = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.path().join("c.lock"))
            .unwrap();
        FileExt::lock_shared(&gate).unwrap();

        let children: Vec<_> = (0..5)
            .map(|_| {
                Command::new(env!("CARGO_BIN_EXE_runcached"))
                    .args(["-a", "0", "-m", "^x", "-f"])
                    .arg(&cache)
                    .arg("--")
                    .arg(&cmd)
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .spawn()
                    .unwrap()
            })
            .collect();

        // Give every process time to take its pre-wait snapshot and
        // queue on the exclusive lock, then open the gate.
        std::thread::sleep(Duration::from_secs(1));
        FileExt::unlock(&gate).unwrap();

        let outputs: Vec<_> = children
            .into_iter()
            .map(|child| child.wait_with_output().unwrap())
            .collect();

        for output in &outputs {
            assert!(
                output.status.success(),
                "caller failed: {}",
                String::from_utf8_lossy(&output.stderr)
            );
            assert_eq!(output.stdout, outputs[0].stdout);
        }

        let executions = std::fs::read_to_string(&counter).unwrap();
        assert_eq!(executions.lines().count(), 1, "command must run exactly once");
    }
}
