//! Model management command implementation.
//!
//! Covers the full model lifecycle: create, list, inspect, poll training,
//! extend, encode, publish/unpublish, deprecate, and delete.

use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use dialoguer::Confirm;

use ffs_sphere::{
    CreateModelRequest, ExtendModelRequest, FoundationalModel, StatusClass, TrainingProgress,
};

use crate::cli::ModelCommands;
use crate::error::CliError;
use crate::output::{self, ColumnList, Message, ModelDetail, ModelList, OutputFormat};
use crate::render;
use crate::state::ClientState;

/// Model command executor.
pub struct ModelCommand<'a> {
    state: &'a ClientState,
}

impl<'a> ModelCommand<'a> {
    /// Create a new model command.
    #[must_use]
    pub fn new(state: &'a ClientState) -> Self {
        Self { state }
    }

    /// Execute a model subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ModelCommands,
    ) -> Result<(), CliError> {
        match command {
            ModelCommands::Create {
                name,
                data_file,
                epochs,
                ignore_columns,
            } => self.create(writer, format, name, data_file, *epochs, ignore_columns),
            ModelCommands::List { prefix } => self.list(writer, format, prefix),
            ModelCommands::Show { model_id } => self.show(writer, format, model_id),
            ModelCommands::Columns { model_id } => self.columns(writer, format, model_id),
            ModelCommands::Card { model_id } => self.card(writer, model_id),
            ModelCommands::Wait {
                model_id,
                poll_interval,
                timeout,
            } => self.wait(writer, format, model_id, *poll_interval, *timeout),
            ModelCommands::Extend {
                model_id,
                data_file,
                epochs,
            } => self.extend(writer, format, model_id, data_file, *epochs),
            ModelCommands::Encode {
                model_id,
                record_json,
                short,
            } => self.encode(writer, model_id, record_json, *short),
            ModelCommands::Publish {
                model_id,
                org,
                name,
            } => self.publish(writer, format, model_id, org, name.as_deref()),
            ModelCommands::Unpublish { model_id } => self.unpublish(writer, format, model_id),
            ModelCommands::Deprecate {
                model_id,
                message,
                expires,
            } => self.deprecate(writer, format, model_id, message, expires),
            ModelCommands::Delete { model_id, yes } => {
                self.delete(writer, format, model_id, *yes)
            }
        }
    }

    fn create<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        name: &str,
        data_file: &Path,
        epochs: Option<u32>,
        ignore_columns: &[String],
    ) -> Result<(), CliError> {
        require_data_file(data_file)?;
        let ignore: Vec<String> = ignore_columns
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        let client = self.state.client()?;
        let request = CreateModelRequest {
            name,
            data_file,
            epochs,
            ignore_columns: &ignore,
            session_name_prefix: Some(name),
        };
        let created = client.create_foundational_model(&request)?;

        if format.is_json() {
            output::print_json(
                writer,
                &serde_json::json!({ "model_id": created.model_id, "status": created.status }),
            )?;
        } else if self.state.quiet() {
            writeln!(writer, "{}", created.model_id)?;
        } else {
            writeln!(writer, "Model created: {}", created.model_id)?;
            writeln!(writer, "Status: {}", created.status)?;
            writeln!(writer)?;
            writeln!(
                writer,
                "Run 'ffs model wait {}' to monitor training.",
                created.model_id
            )?;
        }
        Ok(())
    }

    fn list<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        prefix: &str,
    ) -> Result<(), CliError> {
        let models = self.state.client()?.list_models(prefix)?;
        format.write(writer, &ModelList { models })
    }

    fn show<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        model_id: &str,
    ) -> Result<(), CliError> {
        let model = self.state.client()?.foundational_model(model_id)?;
        format.write(writer, &ModelDetail::from(model.record()))
    }

    fn columns<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        model_id: &str,
    ) -> Result<(), CliError> {
        let model = self.state.client()?.foundational_model(model_id)?;
        let columns = model.columns()?;
        format.write(writer, &ColumnList { columns })
    }

    fn card<W: Write>(&self, writer: &mut W, model_id: &str) -> Result<(), CliError> {
        let model = self.state.client()?.foundational_model(model_id)?;
        let card = model.model_card()?;
        // The card is an arbitrary document; it is always printed as JSON.
        output::print_json(writer, &card)
    }

    fn wait<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        model_id: &str,
        poll_interval: u64,
        timeout: u64,
    ) -> Result<(), CliError> {
        let client = self.state.client()?;
        let mut model = client.foundational_model(model_id)?;
        let options = WaitOptions {
            poll_interval: Duration::from_secs(poll_interval),
            timeout: Duration::from_secs(timeout),
        };
        wait_for_training(writer, &mut model, model_id, &options)?;
        if !self.state.quiet() {
            format.write(writer, &ModelDetail::from(model.record()))?;
        }
        Ok(())
    }

    fn extend<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        model_id: &str,
        data_file: &Path,
        epochs: Option<u32>,
    ) -> Result<(), CliError> {
        require_data_file(data_file)?;
        let model = self.state.client()?.foundational_model(model_id)?;
        let request = ExtendModelRequest {
            new_data_file: data_file,
            epochs,
        };
        let created = model.extend(&request)?;

        if format.is_json() {
            output::print_json(
                writer,
                &serde_json::json!({
                    "model_id": created.model_id,
                    "parent_model_id": model_id,
                    "status": created.status,
                }),
            )?;
        } else if self.state.quiet() {
            writeln!(writer, "{}", created.model_id)?;
        } else {
            writeln!(writer, "Extended model created: {}", created.model_id)?;
            writeln!(
                writer,
                "Run 'ffs model wait {}' to monitor.",
                created.model_id
            )?;
        }
        Ok(())
    }

    fn encode<W: Write>(
        &self,
        writer: &mut W,
        model_id: &str,
        record_json: &str,
        short: bool,
    ) -> Result<(), CliError> {
        let record: serde_json::Value = serde_json::from_str(record_json)
            .map_err(|e| CliError::InvalidArgument(format!("invalid record JSON: {e}")))?;
        let model = self.state.client()?.foundational_model(model_id)?;
        let vectors = model.encode(&record, short)?;
        // Embeddings are always printed as JSON.
        output::print_json(writer, &vectors)
    }

    fn publish<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        model_id: &str,
        org: &str,
        name: Option<&str>,
    ) -> Result<(), CliError> {
        let model = self.state.client()?.foundational_model(model_id)?;
        let receipt = model.publish(org, name)?;

        if format.is_json() {
            output::print_json(writer, &receipt)
        } else {
            let path = receipt.published_path.as_deref().unwrap_or(model_id);
            format.write(writer, &Message::success(format!("Published: {path}")))
        }
    }

    fn unpublish<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        model_id: &str,
    ) -> Result<(), CliError> {
        let model = self.state.client()?.foundational_model(model_id)?;
        let receipt = model.unpublish()?;

        if format.is_json() {
            output::print_json(writer, &receipt)
        } else {
            format.write(writer, &Message::success(format!("Unpublished: {model_id}")))
        }
    }

    fn deprecate<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        model_id: &str,
        message: &str,
        expires: &str,
    ) -> Result<(), CliError> {
        let model = self.state.client()?.foundational_model(model_id)?;
        let receipt = model.deprecate(message, expires)?;

        if format.is_json() {
            output::print_json(writer, &receipt)?;
        } else {
            writeln!(writer, "Deprecated: {model_id}")?;
            writeln!(writer, "Expires: {expires}")?;
        }
        Ok(())
    }

    fn delete<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        model_id: &str,
        yes: bool,
    ) -> Result<(), CliError> {
        if !yes {
            let confirmed = Confirm::new()
                .with_prompt("Are you sure you want to delete this model?")
                .default(false)
                .interact()?;
            if !confirmed {
                return Err(CliError::Aborted);
            }
        }

        let model = self.state.client()?.foundational_model(model_id)?;
        let receipt = model.delete()?;

        if format.is_json() {
            output::print_json(writer, &receipt)
        } else {
            format.write(
                writer,
                &Message::success(format!("Marked for deletion: {model_id}")),
            )
        }
    }
}

/// Source of training progress snapshots for the wait loop.
pub trait ProgressSource {
    /// Fetch the latest progress snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be fetched.
    fn poll(&mut self) -> Result<TrainingProgress, CliError>;
}

impl ProgressSource for FoundationalModel<'_> {
    fn poll(&mut self) -> Result<TrainingProgress, CliError> {
        Ok(self.refresh()?)
    }
}

struct WaitOptions {
    poll_interval: Duration,
    timeout: Duration,
}

/// Poll until training reaches a terminal status or the timeout elapses,
/// redrawing a fixed-height status block between polls.
fn wait_for_training<W: Write, S: ProgressSource>(
    writer: &mut W,
    source: &mut S,
    model_id: &str,
    options: &WaitOptions,
) -> Result<(), CliError> {
    let start = Instant::now();
    let mut drawn_lines = 0usize;

    loop {
        let progress = source.poll()?;
        let elapsed = start.elapsed();

        match StatusClass::of(&progress.status) {
            StatusClass::Done => {
                writeln!(writer)?;
                writeln!(writer, "Training complete.")?;
                return Ok(());
            }
            StatusClass::Failed => {
                writeln!(writer)?;
                writeln!(writer, "Training failed.")?;
                for job in progress.failed_jobs() {
                    writeln!(
                        writer,
                        "  {}: {}",
                        job.job_type.as_deref().unwrap_or("?"),
                        job.error.as_deref().unwrap_or("unknown error")
                    )?;
                }
                return Err(CliError::TrainingFailed {
                    model_id: model_id.to_string(),
                });
            }
            StatusClass::InProgress => {}
        }

        if elapsed > options.timeout {
            return Err(CliError::WaitTimeout {
                seconds: options.timeout.as_secs(),
                status: progress.status,
            });
        }

        // Erase the previous block before redrawing over it.
        if drawn_lines > 0 {
            write!(writer, "\x1b[{drawn_lines}A\x1b[J")?;
        }
        let lines = render::job_status_lines(&progress, Utc::now());
        writeln!(
            writer,
            "Waiting for {model_id}  ({})",
            render::format_duration(elapsed.as_secs())
        )?;
        for line in &lines {
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        drawn_lines = lines.len() + 1;

        thread::sleep(options.poll_interval);
    }
}

fn require_data_file(data_file: &Path) -> Result<(), CliError> {
    if data_file.is_file() {
        Ok(())
    } else {
        Err(CliError::InvalidArgument(format!(
            "data file not found: {}",
            data_file.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Progress source that replays a scripted sequence of snapshots.
    struct ScriptedSource {
        steps: std::vec::IntoIter<TrainingProgress>,
    }

    impl ScriptedSource {
        fn new(steps: Vec<TrainingProgress>) -> Self {
            Self {
                steps: steps.into_iter(),
            }
        }
    }

    impl ProgressSource for ScriptedSource {
        fn poll(&mut self) -> Result<TrainingProgress, CliError> {
            self.steps
                .next()
                .ok_or_else(|| CliError::Config("scripted source exhausted".into()))
        }
    }

    fn progress(payload: &str) -> TrainingProgress {
        serde_json::from_str(payload).expect("progress fixture deserializes")
    }

    fn fast_options() -> WaitOptions {
        WaitOptions {
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_secs(60),
        }
    }

    #[test]
    fn wait_finishes_on_done() {
        let mut source = ScriptedSource::new(vec![progress(r#"{"status": "done"}"#)]);
        let mut buf = Vec::new();

        wait_for_training(&mut buf, &mut source, "fm-1", &fast_options()).expect("should finish");

        let output = String::from_utf8(buf).expect("valid utf8");
        assert!(output.contains("Training complete."));
        assert!(!output.contains("Waiting for"));
    }

    #[test]
    fn wait_renders_progress_then_finishes() {
        let running = progress(
            r#"{
                "status": "training",
                "job_plan": [{"job_type": "train", "job_id": "j-1"}],
                "jobs": {"j-1": {"job_type": "train", "status": "running", "progress": 50}}
            }"#,
        );
        let mut source = ScriptedSource::new(vec![running, progress(r#"{"status": "done"}"#)]);
        let mut buf = Vec::new();

        wait_for_training(&mut buf, &mut source, "fm-1", &fast_options()).expect("should finish");

        let output = String::from_utf8(buf).expect("valid utf8");
        assert!(output.contains("Waiting for fm-1"));
        assert!(output.contains("running 50%  train"));
        assert!(output.contains("Training complete."));
    }

    #[test]
    fn wait_erases_previous_block_on_redraw() {
        let running = r#"{
            "status": "training",
            "job_plan": [{"job_type": "train", "job_id": "j-1"}],
            "jobs": {"j-1": {"job_type": "train", "status": "running"}}
        }"#;
        let mut source = ScriptedSource::new(vec![
            progress(running),
            progress(running),
            progress(r#"{"status": "done"}"#),
        ]);
        let mut buf = Vec::new();

        wait_for_training(&mut buf, &mut source, "fm-1", &fast_options()).expect("should finish");

        let output = String::from_utf8(buf).expect("valid utf8");
        // Header plus one job line were drawn, so the redraw moves up 2.
        assert!(output.contains("\x1b[2A\x1b[J"));
    }

    #[test]
    fn wait_fails_on_error_status_and_lists_failed_jobs() {
        let failed = progress(
            r#"{
                "status": "failed",
                "job_plan": [{"job_type": "train", "job_id": "j-1"}],
                "jobs": {"j-1": {"job_type": "train", "status": "error", "error": "OOM on gpu-3"}}
            }"#,
        );
        let mut source = ScriptedSource::new(vec![failed]);
        let mut buf = Vec::new();

        let err = wait_for_training(&mut buf, &mut source, "fm-1", &fast_options())
            .expect_err("should fail");
        assert!(matches!(err, CliError::TrainingFailed { .. }));

        let output = String::from_utf8(buf).expect("valid utf8");
        assert!(output.contains("Training failed."));
        assert!(output.contains("train: OOM on gpu-3"));
    }

    #[test]
    fn wait_times_out() {
        let mut source = ScriptedSource::new(vec![
            progress(r#"{"status": "training"}"#),
            progress(r#"{"status": "training"}"#),
        ]);
        let mut buf = Vec::new();
        let options = WaitOptions {
            poll_interval: Duration::from_millis(1),
            timeout: Duration::ZERO,
        };

        let err = wait_for_training(&mut buf, &mut source, "fm-1", &options)
            .expect_err("should time out");
        match err {
            CliError::WaitTimeout { seconds, status } => {
                assert_eq!(seconds, 0);
                assert_eq!(status, "training");
            }
            other => panic!("expected timeout, got {other}"),
        }
    }

    #[test]
    fn wait_propagates_poll_errors() {
        let mut source = ScriptedSource::new(vec![]);
        let mut buf = Vec::new();

        let err = wait_for_training(&mut buf, &mut source, "fm-1", &fast_options())
            .expect_err("should propagate");
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn require_data_file_rejects_missing_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.csv");
        let err = require_data_file(&missing).expect_err("should reject");
        assert!(err.to_string().contains("data file not found"));
    }

    #[test]
    fn require_data_file_accepts_existing_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b\n").expect("write");
        assert!(require_data_file(&path).is_ok());
    }
}
