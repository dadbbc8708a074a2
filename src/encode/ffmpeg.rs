use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::foundation::core::{CANVAS_SIZE, FRAME_RATE};
use crate::foundation::error::{GeoflightError, GeoflightResult};

/// Settings of the background video encoders.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncodeConfig {
    pub program: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// VP9 constant rate factor.
    pub crf: u32,
    pub join_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_owned(),
            width: u32::from(CANVAS_SIZE),
            height: u32::from(CANVAS_SIZE),
            fps: FRAME_RATE,
            crf: 30,
            join_timeout_secs: 6 * 60 * 60,
            poll_interval_ms: 1000,
        }
    }
}

impl EncodeConfig {
    pub fn validate(&self) -> GeoflightResult<()> {
        if self.program.trim().is_empty() {
            return Err(GeoflightError::validation("encoder program must be set"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(GeoflightError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(GeoflightError::validation(
                "encode width/height must be even (required for yuv420p output)",
            ));
        }
        if self.fps == 0 {
            return Err(GeoflightError::validation("encode fps must be non-zero"));
        }
        if self.crf > 63 {
            return Err(GeoflightError::validation("vp9 crf must be within 0..=63"));
        }
        if self.poll_interval_ms == 0 {
            return Err(GeoflightError::validation(
                "encoder poll interval must be non-zero",
            ));
        }
        Ok(())
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_secs(self.join_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Frames of one edge and the two videos made from them.
#[derive(Clone, Debug)]
pub struct EncodeJob {
    pub edge_id: String,
    /// Directory holding `0000.png`, `0001.png`, ...
    pub frames_dir: PathBuf,
    pub forward: PathBuf,
    pub backward: PathBuf,
}

/// Quote `s` for a POSIX shell.
pub(crate) fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn quote_path(p: &Path) -> String {
    sh_quote(&p.display().to_string())
}

/// Shell script encoding the forward video, reversing it into the backward
/// one, deleting the frames and finally recording its exit code in
/// `status_path`.
pub fn encoder_script(cfg: &EncodeConfig, job: &EncodeJob, status_path: &Path) -> String {
    let program = sh_quote(&cfg.program);
    let size = format!("{}x{}", cfg.width, cfg.height);
    let frames = job.frames_dir.join("%04d.png");
    let status = quote_path(status_path);
    let status_tmp = quote_path(&status_path.with_extension("status.tmp"));

    let forward = format!(
        "{program} -nostdin -y -hide_banner -loglevel error -r {fps} -f image2 -s {size} -i {input} \
         -vcodec libvpx-vp9 -crf {crf} -pix_fmt yuv420p {out}",
        fps = cfg.fps,
        input = quote_path(&frames),
        crf = cfg.crf,
        out = quote_path(&job.forward),
    );
    let backward = format!(
        "{program} -nostdin -y -hide_banner -loglevel error -i {input} -r {fps} \
         -vcodec libvpx-vp9 -crf {crf} -pix_fmt yuv420p -vf reverse {out}",
        input = quote_path(&job.forward),
        fps = cfg.fps,
        crf = cfg.crf,
        out = quote_path(&job.backward),
    );

    format!(
        "#!/bin/sh\n\
         set -u\n\
         status=0\n\
         {forward} || status=$?\n\
         if [ \"$status\" -eq 0 ]; then\n  {backward} || status=$?\nfi\n\
         if [ \"$status\" -eq 0 ]; then\n  rm -rf {frames_dir}\nfi\n\
         printf '%s\\n' \"$status\" > {status_tmp} && mv {status_tmp} {status}\n\
         exit \"$status\"\n",
        frames_dir = quote_path(&job.frames_dir),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
