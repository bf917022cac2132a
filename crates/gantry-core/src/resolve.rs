//! Endpoint resolution: an override URL wins; otherwise the resolver command
//! (by default `terraform output -raw service_url`) runs in the target's
//! directory and its trimmed stdout is the URL.

use crate::config::GantryConfig;
use crate::errors::RunError;
use crate::process::{CommandRunner, CommandSpec};
use tracing::debug;

/// Resolve the service URL for `target`.
///
/// A non-empty `override_url` is returned unchanged without touching the
/// filesystem or spawning anything. Unknown targets and missing directories
/// are rejected before any process runs.
pub fn resolve(
    target: &str,
    override_url: Option<&str>,
    cfg: &GantryConfig,
    runner: &dyn CommandRunner,
) -> Result<String, RunError> {
    if let Some(url) = override_url {
        if !url.trim().is_empty() {
            return Ok(url.to_string());
        }
    }

    let tc = cfg
        .targets
        .get(target)
        .ok_or_else(|| RunError::Resolution {
            target: target.to_string(),
            reason: "unknown target (not present in config)".into(),
        })?;

    if !tc.dir.is_dir() {
        return Err(RunError::Resolution {
            target: target.to_string(),
            reason: format!("target directory does not exist: {}", tc.dir.display()),
        });
    }

    let spec = CommandSpec::new(&cfg.resolver.command)
        .args(cfg.resolver.args.iter().cloned())
        .current_dir(&tc.dir);
    debug!(provider = target, command = %spec.display_line(), "querying resolver");

    let out = runner.capture(&spec).map_err(|e| RunError::Resolution {
        target: target.to_string(),
        reason: format!("failed to run {}: {}", cfg.resolver.command, e),
    })?;

    if !out.success() {
        return Err(RunError::Resolution {
            target: target.to_string(),
            reason: format!(
                "{} exited with {}: {}",
                cfg.resolver.command,
                out.exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".into()),
                out.stderr.trim()
            ),
        });
    }

    let url = out.stdout.trim();
    if url.is_empty() {
        return Err(RunError::Resolution {
            target: target.to_string(),
            reason: format!("{} produced no output", cfg.resolver.command),
        });
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GantryConfig;
    use crate::process::{Captured, RunStatus};
    use std::cell::RefCell;
    use std::time::Duration;

    /// Records every invocation; `capture` replays a scripted result.
    struct FakeRunner {
        captures: RefCell<Vec<CommandSpec>>,
        result: Captured,
    }

    impl FakeRunner {
        fn returning(exit_code: Option<i32>, stdout: &str, stderr: &str) -> Self {
            Self {
                captures: RefCell::new(Vec::new()),
                result: Captured {
                    exit_code,
                    stdout: stdout.into(),
                    stderr: stderr.into(),
                },
            }
        }

        fn call_count(&self) -> usize {
            self.captures.borrow().len()
        }
    }

    impl CommandRunner for FakeRunner {
        fn capture(&self, spec: &CommandSpec) -> std::io::Result<Captured> {
            self.captures.borrow_mut().push(spec.clone());
            Ok(self.result.clone())
        }

        fn run(
            &self,
            _spec: &CommandSpec,
            _timeout: Option<Duration>,
        ) -> std::io::Result<RunStatus> {
            unreachable!("resolution never launches a run");
        }
    }

    fn cfg_with_dir(dir: &std::path::Path) -> GantryConfig {
        let yaml = format!(
            "version: 1\ntargets:\n  aws:\n    dir: {}\nscripts:\n  smoke: a.js\n  load: b.js\n",
            dir.display()
        );
        serde_yaml::from_str(&yaml).unwrap()
    }

    #[test]
    fn override_wins_without_any_process() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_with_dir(tmp.path());
        let runner = FakeRunner::returning(Some(0), "http://never-used/", "");
        let url = resolve("aws", Some("http://override:8080/"), &cfg, &runner).unwrap();
        assert_eq!(url, "http://override:8080/");
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn empty_override_falls_through_to_resolver() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_with_dir(tmp.path());
        let runner = FakeRunner::returning(Some(0), "http://svc.example/\n", "");
        let url = resolve("aws", Some("  "), &cfg, &runner).unwrap();
        assert_eq!(url, "http://svc.example/");
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn unknown_target_fails_without_process_access() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_with_dir(tmp.path());
        let runner = FakeRunner::returning(Some(0), "unused", "");
        let err = resolve("azure", None, &cfg, &runner).unwrap_err();
        assert!(matches!(err, RunError::Resolution { .. }));
        assert!(err.to_string().contains("unknown target"));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn missing_directory_fails_before_spawn() {
        let tmp = tempfile::tempdir().unwrap();
        let gone = tmp.path().join("nope");
        let cfg = cfg_with_dir(&gone);
        let runner = FakeRunner::returning(Some(0), "unused", "");
        let err = resolve("aws", None, &cfg, &runner).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn nonzero_exit_is_a_resolution_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_with_dir(tmp.path());
        let runner = FakeRunner::returning(Some(1), "", "No outputs found");
        let err = resolve("aws", None, &cfg, &runner).unwrap_err();
        assert!(err.to_string().contains("exited with 1"));
        assert!(err.to_string().contains("No outputs found"));
    }

    #[test]
    fn empty_output_is_a_resolution_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_with_dir(tmp.path());
        let runner = FakeRunner::returning(Some(0), "   \n", "");
        let err = resolve("aws", None, &cfg, &runner).unwrap_err();
        assert!(err.to_string().contains("produced no output"));
    }

    #[test]
    fn resolver_runs_in_the_target_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = cfg_with_dir(tmp.path());
        let runner = FakeRunner::returning(Some(0), "http://svc/", "");
        resolve("aws", None, &cfg, &runner).unwrap();
        let calls = runner.captures.borrow();
        assert_eq!(calls[0].program, "terraform");
        assert_eq!(calls[0].args, vec!["output", "-raw", "service_url"]);
        assert_eq!(calls[0].cwd.as_deref(), Some(tmp.path()));
    }
}
