use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::Context;
use sysinfo::{Pid, ProcessStatus, ProcessesToUpdate, System};

use crate::encode::ffmpeg::{EncodeConfig, EncodeJob, encoder_script};
use crate::foundation::error::{GeoflightError, GeoflightResult};

/// Background encoders of a working directory, tracked through files:
/// `<edge>.sh` (the script), `<edge>.pid` and `<edge>.status` (exit code).
#[derive(Clone, Debug)]
pub struct EncoderRegistry {
    dir: PathBuf,
}

/// An encoder recorded in the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderEntry {
    pub edge_id: String,
    pub pid: u32,
}

impl EncoderRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, edge_id: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{edge_id}.{ext}"))
    }

    pub fn status_path(&self, edge_id: &str) -> PathBuf {
        self.file(edge_id, "status")
    }

    /// Write the encoder script for `job` and start it detached.
    ///
    /// The caller does not wait: the encoder keeps running after the calling
    /// process exits and is joined later with [`EncoderRegistry::join_all`].
    #[tracing::instrument(skip(self, cfg, job), fields(edge = %job.edge_id))]
    pub fn spawn(&self, cfg: &EncodeConfig, job: &EncodeJob) -> GeoflightResult<u32> {
        cfg.validate()?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create encoder dir '{}'", self.dir.display()))?;

        let status = self.status_path(&job.edge_id);
        if status.exists() {
            std::fs::remove_file(&status)
                .with_context(|| format!("remove stale status '{}'", status.display()))?;
        }

        let script = self.file(&job.edge_id, "sh");
        std::fs::write(&script, encoder_script(cfg, job, &status))
            .with_context(|| format!("write encoder script '{}'", script.display()))?;

        let mut cmd = Command::new("sh");
        cmd.arg(&script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt as _;
            cmd.process_group(0);
        }

        let child = cmd.spawn().map_err(|e| {
            GeoflightError::external(format!(
                "failed to spawn encoder for edge '{}': {e}",
                job.edge_id
            ))
        })?;
        let pid = child.id();

        let pid_path = self.file(&job.edge_id, "pid");
        let tmp = self.file(&job.edge_id, "pid.tmp");
        std::fs::write(&tmp, pid.to_string())
            .with_context(|| format!("write '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &pid_path)
            .with_context(|| format!("publish '{}'", pid_path.display()))?;

        tracing::info!(pid, "encoder started");
        Ok(pid)
    }

    /// Every encoder with a pid file, sorted by edge id.
    pub fn entries(&self) -> GeoflightResult<Vec<EncoderEntry>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        let listing = std::fs::read_dir(&self.dir)
            .with_context(|| format!("list encoder dir '{}'", self.dir.display()))?;
        for item in listing {
            let path = item.context("read encoder dir entry")?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("pid") {
                continue;
            }
            let Some(edge_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read '{}'", path.display()))?;
            let pid = text.trim().parse::<u32>().map_err(|e| {
                GeoflightError::validation(format!("corrupt pid file '{}': {e}", path.display()))
            })?;
            entries.push(EncoderEntry {
                edge_id: edge_id.to_owned(),
                pid,
            });
        }
        entries.sort_by(|a, b| a.edge_id.cmp(&b.edge_id));
        Ok(entries)
    }

    /// Recorded exit code of an encoder, if it finished.
    pub fn exit_status(&self, edge_id: &str) -> GeoflightResult<Option<i32>> {
        let path = self.status_path(edge_id);
        if !path.is_file() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read '{}'", path.display()))?;
        text.trim().parse::<i32>().map(Some).map_err(|e| {
            GeoflightError::validation(format!("corrupt status file '{}': {e}", path.display()))
        })
    }

    /// Wait until every registered encoder is gone, then check their status.
    ///
    /// Polls the process table every `poll` and gives up after `timeout`.
    #[tracing::instrument(skip(self))]
    pub fn join_all(&self, timeout: Duration, poll: Duration) -> GeoflightResult<()> {
        let entries = self.entries()?;
        let started = Instant::now();
        let mut sys = System::new();
        let mut polls = 0u64;

        loop {
            let running: Vec<&EncoderEntry> = entries
                .iter()
                .filter(|e| !self.status_path(&e.edge_id).is_file())
                .filter(|e| is_alive(&mut sys, e.pid))
                .collect();
            if running.is_empty() {
                break;
            }
            if started.elapsed() >= timeout {
                return Err(GeoflightError::external(format!(
                    "timed out after {}s waiting for {} encoder(s): {}",
                    timeout.as_secs(),
                    running.len(),
                    running
                        .iter()
                        .map(|e| e.edge_id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
            if polls.is_multiple_of(20) {
                tracing::info!(running = running.len(), "waiting for encoders");
            }
            polls += 1;
            std::thread::sleep(poll);
        }

        for entry in &entries {
            match self.exit_status(&entry.edge_id)? {
                Some(0) => {}
                Some(code) => {
                    return Err(GeoflightError::external(format!(
                        "encoder for edge '{}' exited with status {code}",
                        entry.edge_id
                    )));
                }
                None => {
                    return Err(GeoflightError::external(format!(
                        "encoder for edge '{}' (pid {}) exited without recording a status",
                        entry.edge_id, entry.pid
                    )));
                }
            }
        }
        tracing::info!(encoders = entries.len(), "all encoders completed");
        Ok(())
    }
}

fn is_alive(sys: &mut System, pid: u32) -> bool {
    let pid = Pid::from_u32(pid);
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys.process(pid)
        .is_some_and(|p| !matches!(p.status(), ProcessStatus::Zombie | ProcessStatus::Dead))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/registry.rs"]
mod tests;
