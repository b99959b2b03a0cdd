//! Process table scanned from `/proc`
//!
//! Each numeric directory under the proc root becomes one [`WorkItem`]:
//! the pid as id, the real uid from `status` as owner, and a start instant
//! reconstructed from the `starttime` field of `stat` and the system uptime.
//! Entries that vanish between listing and reading are skipped.

use crate::pipeline::WorkItem;
use crate::source::error::{SourceError, SourceResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Default mount point of the process filesystem
pub const PROC_ROOT: &str = "/proc";

/// `starttime` position within `stat`, counted from the field after `comm`
const STARTTIME_AFTER_COMM: usize = 19;

/// Lazy iterator over the processes in a proc filesystem
#[derive(Debug)]
pub struct ProcessTable {
    root: PathBuf,
    entries: fs::ReadDir,
    /// Instant corresponding to the uptime reading below
    scanned_at: Instant,
    uptime: Duration,
    clock_ticks: u64,
}

impl ProcessTable {
    /// Open the system process table
    #[cfg(target_os = "linux")]
    pub fn open() -> SourceResult<Self> {
        Self::open_at(PROC_ROOT, system_clock_ticks())
    }

    #[cfg(not(target_os = "linux"))]
    pub fn open() -> SourceResult<Self> {
        Err(SourceError::Unsupported {
            platform: std::env::consts::OS.to_string(),
        })
    }

    /// Open a process table rooted somewhere other than `/proc`
    ///
    /// `clock_ticks` is the number of `stat` time units per second.
    pub fn open_at(root: impl AsRef<Path>, clock_ticks: u64) -> SourceResult<Self> {
        let root = root.as_ref().to_path_buf();
        let uptime_path = root.join("uptime");
        let uptime_text =
            fs::read_to_string(&uptime_path).map_err(|e| io_error(&uptime_path, e))?;
        let scanned_at = Instant::now();
        let uptime = parse_uptime(&uptime_text).ok_or_else(|| SourceError::Io {
            path: uptime_path.display().to_string(),
            message: "unrecognised uptime format".to_string(),
        })?;
        let entries = fs::read_dir(&root).map_err(|e| io_error(&root, e))?;

        log::debug!(
            "Scanning process table at {} (uptime {:?}, {} ticks/s)",
            root.display(),
            uptime,
            clock_ticks
        );

        Ok(Self {
            root,
            entries,
            scanned_at,
            uptime,
            clock_ticks: clock_ticks.max(1),
        })
    }

    fn read_process(&self, pid: u64) -> Option<WorkItem> {
        let dir = self.root.join(pid.to_string());
        let status = fs::read_to_string(dir.join("status")).ok()?;
        let stat = fs::read_to_string(dir.join("stat")).ok()?;
        let owner = parse_real_uid(&status)?;
        let ticks = parse_start_ticks(&stat)?;

        Some(WorkItem::new(pid, owner, self.started_at(ticks)))
    }

    /// Map boot-relative clock ticks onto the monotonic clock
    fn started_at(&self, ticks: u64) -> Instant {
        let since_boot = Duration::from_secs(ticks / self.clock_ticks)
            + Duration::from_nanos((ticks % self.clock_ticks) * 1_000_000_000 / self.clock_ticks);
        let age = self.uptime.saturating_sub(since_boot);
        self.scanned_at.checked_sub(age).unwrap_or(self.scanned_at)
    }
}

impl Iterator for ProcessTable {
    type Item = WorkItem;

    fn next(&mut self) -> Option<WorkItem> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    log::trace!("Skipping unreadable process entry: {}", e);
                    continue;
                }
            };
            let Some(pid) = entry.file_name().to_str().and_then(|n| n.parse::<u64>().ok())
            else {
                continue;
            };
            match self.read_process(pid) {
                Some(item) => return Some(item),
                None => log::trace!("Process {} vanished during scan", pid),
            }
        }
    }
}

fn io_error(path: &Path, e: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

#[cfg(target_os = "linux")]
fn system_clock_ticks() -> u64 {
    // SAFETY: sysconf has no preconditions
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 {
        ticks as u64
    } else {
        100
    }
}

/// Real uid: first value of the `Uid:` line
pub fn parse_real_uid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|uid| uid.parse().ok())
}

/// `starttime` in clock ticks since boot
///
/// `comm` may contain spaces and parentheses, so fields are counted from the
/// last `)`.
pub fn parse_start_ticks(stat: &str) -> Option<u64> {
    let (_, after_comm) = stat.rsplit_once(')')?;
    after_comm
        .split_whitespace()
        .nth(STARTTIME_AFTER_COMM)
        .and_then(|ticks| ticks.parse().ok())
}

/// First field of `/proc/uptime`, in seconds with a fractional part
pub fn parse_uptime(uptime: &str) -> Option<Duration> {
    let seconds: f64 = uptime.split_whitespace().next()?.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}
