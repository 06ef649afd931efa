//! Fixed-height status rendering for the training wait loop.
//!
//! These are pure functions: they turn a [`TrainingProgress`] snapshot and a
//! reference time into the lines the wait loop draws, so the rendering can
//! be tested without a terminal or a server.

use chrono::{DateTime, NaiveDateTime, Utc};
use ffs_sphere::{Job, TrainingProgress};

/// Format seconds into a compact human-readable duration.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let minutes = seconds / 60;
    let secs = seconds % 60;
    if minutes < 60 {
        return format!("{minutes}m{secs:02}s");
    }
    let hours = minutes / 60;
    let minutes = minutes % 60;
    format!("{hours}h{minutes:02}m")
}

/// Parse a server timestamp.
///
/// Accepts RFC 3339 as well as the bare `YYYY-MM-DDTHH:MM:SS[.ffffff]` form
/// (assumed UTC) that job records sometimes carry.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Build one status line per planned job.
///
/// Plan entries whose job has not been scheduled yet render as `pending`.
#[must_use]
pub fn job_status_lines(progress: &TrainingProgress, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = Vec::with_capacity(progress.job_plan.len());
    for entry in &progress.job_plan {
        let job_type = entry.job_type.as_deref().unwrap_or("?");
        let job = entry
            .job_id
            .as_deref()
            .and_then(|id| progress.jobs.get(id));
        match job {
            Some(job) => lines.push(job_line(job_type, job, now)),
            None => lines.push(format!("  pending  {job_type}")),
        }
    }
    lines
}

fn job_line(job_type: &str, job: &Job, now: DateTime<Utc>) -> String {
    let status = job.status.as_str();
    let age = job_age(job, now)
        .map(|secs| format!(" ({})", format_duration(secs)))
        .unwrap_or_default();
    let queue = match &job.queue {
        Some(queue) if !queue.is_empty() && status != "done" => format!(" [{queue}]"),
        _ => String::new(),
    };

    match status {
        "done" => {
            let duration = job_duration(job)
                .map(|secs| format!(" ({})", format_duration(secs)))
                .unwrap_or_default();
            format!("  done  {job_type}{duration}")
        }
        "running" => match job.progress {
            Some(progress) if progress > 0 => {
                format!("  running {progress}%  {job_type}{queue}{age}")
            }
            _ => format!("  running  {job_type}{queue}{age}"),
        },
        other => format!("  {other}  {job_type}{queue}{age}"),
    }
}

fn job_age(job: &Job, now: DateTime<Utc>) -> Option<u64> {
    let created = parse_timestamp(job.created_at.as_deref()?)?;
    u64::try_from(now.signed_duration_since(created).num_seconds()).ok()
}

fn job_duration(job: &Job) -> Option<u64> {
    let created = parse_timestamp(job.created_at.as_deref()?)?;
    let finished = parse_timestamp(job.finished_at.as_deref()?)?;
    u64::try_from(finished.signed_duration_since(created).num_seconds()).ok()
}
