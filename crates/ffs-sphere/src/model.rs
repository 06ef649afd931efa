//! Handle for operating on a single foundational model.

use serde_json::Value;

use crate::client::{ExtendModelRequest, SphereClient};
use crate::error::Result;
use crate::types::{CreatedModel, DeletionReceipt, ModelRecord, PublishReceipt, TrainingProgress};

/// A foundational model on the server, paired with the client that fetched
/// it.
///
/// The handle carries the model's last-known record; [`refresh`] updates it
/// in place from the server.
///
/// [`refresh`]: FoundationalModel::refresh
#[derive(Debug)]
pub struct FoundationalModel<'c> {
    client: &'c SphereClient,
    record: ModelRecord,
}

impl<'c> FoundationalModel<'c> {
    pub(crate) fn new(client: &'c SphereClient, record: ModelRecord) -> Self {
        Self { client, record }
    }

    /// Model identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Last-known status string.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.record.status
    }

    /// Last-known model record.
    #[must_use]
    pub fn record(&self) -> &ModelRecord {
        &self.record
    }

    /// Fetch the current training progress and update the cached record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn refresh(&mut self) -> Result<TrainingProgress> {
        let progress: TrainingProgress = self.client.get_json("refresh", &self.path("status"))?;
        if let Some(record) = &progress.model {
            self.record = record.clone();
        } else {
            self.record.status.clone_from(&progress.status);
        }
        Ok(progress)
    }

    /// Column names in the model's embedding space.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn columns(&self) -> Result<Vec<String>> {
        let listing: ColumnListing = self.client.get_json("columns", &self.path("columns"))?;
        Ok(listing.columns)
    }

    /// The model card, an arbitrary JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn model_card(&self) -> Result<Value> {
        self.client.get_json("model_card", &self.path("card"))
    }

    /// Extend this model with new data, producing a child model.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file is missing or the upload fails.
    pub fn extend(&self, request: &ExtendModelRequest<'_>) -> Result<CreatedModel> {
        let metadata = serde_json::json!({ "epochs": request.epochs });
        self.client
            .post_multipart("extend", &self.path("extend"), &metadata, request.new_data_file)
    }

    /// Encode a record into the embedding space.
    ///
    /// With `short` set the server returns a 3D embedding suitable for
    /// visualization instead of the full vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn encode(&self, record: &Value, short: bool) -> Result<Value> {
        let body = serde_json::json!({ "record": record, "short": short });
        self.client.post_json("encode", &self.path("encode"), &body)
    }

    /// Publish this model under an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn publish(&self, org_id: &str, name: Option<&str>) -> Result<PublishReceipt> {
        let body = serde_json::json!({ "org_id": org_id, "name": name });
        self.client.post_json("publish", &self.path("publish"), &body)
    }

    /// Withdraw a previously published model.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn unpublish(&self) -> Result<Value> {
        self.client
            .post_json("unpublish", &self.path("unpublish"), &serde_json::json!({}))
    }

    /// Deprecate this model with a warning shown to consumers until the
    /// expiration date.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn deprecate(&self, warning_message: &str, expiration_date: &str) -> Result<Value> {
        let body = serde_json::json!({
            "warning_message": warning_message,
            "expiration_date": expiration_date,
        });
        self.client
            .post_json("deprecate", &self.path("deprecate"), &body)
    }

    /// Mark this model for deletion, consuming the handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn delete(self) -> Result<DeletionReceipt> {
        self.client
            .delete_json("delete", &format!("/api/v1/models/{}", self.record.id))
    }

    fn path(&self, tail: &str) -> String {
        format!("/api/v1/models/{}/{tail}", self.record.id)
    }
}

#[derive(Debug, serde::Deserialize)]
struct ColumnListing {
    #[serde(default)]
    columns: Vec<String>,
}
