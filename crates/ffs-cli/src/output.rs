//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats. Table output
//! comes in three shapes: key-value blocks, plain line lists, and one-line
//! messages.

use std::io::Write;

use serde::Serialize;

use ffs_sphere::{HealthReport, ModelRecord};

use crate::error::CliError;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

impl Format {
    /// Map the `--json` flag to a format.
    #[must_use]
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Table
        }
    }
}

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => print_json(writer, value),
            Format::Table => value.write_table(writer),
        }
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Print a value as pretty JSON, regardless of the selected format.
///
/// Used directly for payloads that are arbitrary JSON documents (model
/// cards, embeddings).
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn print_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, value)
        .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
    writeln!(writer)?;
    Ok(())
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Model details for display.
#[derive(Debug, Clone, Serialize)]
pub struct ModelDetail {
    /// Model identifier.
    pub model_id: String,
    /// Model name.
    pub name: Option<String>,
    /// Training status.
    pub status: String,
    /// Embedding-space dimensionality.
    pub dimensions: Option<u32>,
    /// Training epochs.
    pub epochs: Option<u32>,
    /// Final training loss.
    pub final_loss: Option<f64>,
    /// Compute cluster the model trained on.
    pub compute_cluster: Option<String>,
}

impl From<&ModelRecord> for ModelDetail {
    fn from(record: &ModelRecord) -> Self {
        Self {
            model_id: record.id.clone(),
            name: record.name.clone(),
            status: record.status.clone(),
            dimensions: record.dimensions,
            epochs: record.epochs,
            final_loss: record.final_loss,
            compute_cluster: record.compute_cluster.clone(),
        }
    }
}

impl TableDisplay for ModelDetail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Model ID:    {}", self.model_id)?;
        writeln!(
            writer,
            "Name:        {}",
            self.name.as_deref().unwrap_or("(unnamed)")
        )?;
        writeln!(writer, "Status:      {}", self.status)?;
        writeln!(writer, "Dimensions:  {}", dash_or(self.dimensions))?;
        writeln!(writer, "Epochs:      {}", dash_or(self.epochs))?;
        writeln!(writer, "Final Loss:  {}", dash_or(self.final_loss))?;
        writeln!(
            writer,
            "Cluster:     {}",
            dash_or(self.compute_cluster.as_deref())
        )?;
        Ok(())
    }
}

/// List of model identifiers.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ModelList {
    /// The model identifiers.
    pub models: Vec<String>,
}

impl TableDisplay for ModelList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.models.is_empty() {
            writeln!(writer, "No models found.")?;
            return Ok(());
        }
        for model in &self.models {
            writeln!(writer, "{model}")?;
        }
        Ok(())
    }
}

/// List of column names in a model's embedding space.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ColumnList {
    /// The column names.
    pub columns: Vec<String>,
}

impl TableDisplay for ColumnList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.columns.is_empty() {
            writeln!(writer, "No columns found.")?;
            return Ok(());
        }
        for column in &self.columns {
            writeln!(writer, "{column}")?;
        }
        Ok(())
    }
}

/// Server health report for display.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct HealthView(pub HealthReport);

impl TableDisplay for HealthView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Server Health")?;
        let width = self
            .0
            .fields
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0);
        for (key, value) in &self.0.fields {
            writeln!(writer, "  {key:<width$}  {}", value_text(value))?;
        }
        Ok(())
    }
}

/// Stored credential summary for display.
#[derive(Debug, Clone, Serialize)]
pub struct AuthStatus {
    /// Where the credentials came from.
    pub source: String,
    /// Masked API key.
    pub api_key: String,
    /// Pinned server URL, if any.
    pub base_url: Option<String>,
}

impl TableDisplay for AuthStatus {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Source:    {}", self.source)?;
        writeln!(writer, "API Key:   {}", self.api_key)?;
        writeln!(writer, "Base URL:  {}", dash_or(self.base_url.as_deref()))?;
        Ok(())
    }
}

/// Simple message output.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message text.
    pub message: String,
    /// Whether this is a success message.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub success: bool,
}

impl Message {
    /// Create a success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create an informational message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.success {
            writeln!(writer, "✓ {}", self.message)?;
        } else {
            writeln!(writer, "{}", self.message)?;
        }
        Ok(())
    }
}

/// Render an optional value, with a dash for absence.
fn dash_or<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}

/// Render a JSON value for a table cell: strings without quotes, everything
/// else in its JSON form.
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
