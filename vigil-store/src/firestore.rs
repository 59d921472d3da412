//! Firestore REST implementation of [`DocumentStore`].
//!
//! Documents live under
//! `v1/projects/{project}/databases/(default)/documents/{collection}/{id}`.
//! A GET answering 404 means the document is absent; a PATCH on the full
//! document path writes it. Firestore's wire shape wraps every value in a
//! typed envelope (`stringValue`, `integerValue`, ...), so flat JSON
//! documents are translated on the way in and out.

use crate::http::HttpClient;
use crate::{DocumentStore, StoreError};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

pub struct FirestoreStore {
    http: HttpClient,
    project_id: String,
    auth_token: Option<String>,
}

impl FirestoreStore {
    /// Build a store client for one Firestore project.
    ///
    /// `auth_token` is an OAuth bearer token; pass `None` against the
    /// emulator, which accepts unauthenticated traffic.
    pub fn new(
        endpoint: &str,
        project_id: impl Into<String>,
        auth_token: Option<String>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            http: HttpClient::new(endpoint)?,
            project_id: project_id.into(),
            auth_token,
        })
    }

    fn document_path(&self, collection: &str, id: &str) -> String {
        format!(
            "v1/projects/{}/databases/(default)/documents/{}/{}",
            self.project_id, collection, id
        )
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let path = self.document_path(collection, id);
        let found: Option<Value> = self
            .http
            .get_json_opt(&path, self.auth_token.as_deref())
            .await?;
        debug!(
            target: "store.firestore",
            collection,
            id,
            present = found.is_some(),
            "firestore.exists"
        );
        Ok(found.is_some())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let path = self.document_path(collection, id);
        match self
            .http
            .get_json_opt::<Value>(&path, self.auth_token.as_deref())
            .await?
        {
            Some(body) => Ok(Some(decode_document(&body)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        let path = self.document_path(collection, id);
        let body = json!({ "fields": encode_fields(doc)? });
        let _reply: Value = self
            .http
            .patch_json(&path, self.auth_token.as_deref(), &body)
            .await?;
        debug!(target: "store.firestore", collection, id, "firestore.set");
        Ok(())
    }
}

/// Encode a flat JSON object into Firestore's typed field map.
fn encode_fields(doc: &Value) -> Result<Value, StoreError> {
    let obj = doc
        .as_object()
        .ok_or_else(|| StoreError::Document("document must be a JSON object".into()))?;

    let mut fields = Map::new();
    for (key, value) in obj {
        let wrapped = match value {
            Value::String(s) => json!({ "stringValue": s }),
            Value::Bool(b) => json!({ "booleanValue": b }),
            Value::Null => json!({ "nullValue": null }),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    // Firestore carries 64-bit integers as decimal strings.
                    json!({ "integerValue": i.to_string() })
                } else {
                    json!({ "doubleValue": n.as_f64() })
                }
            }
            other => {
                return Err(StoreError::Document(format!(
                    "field '{key}' has unsupported value: {other}"
                )))
            }
        };
        fields.insert(key.clone(), wrapped);
    }
    Ok(Value::Object(fields))
}

/// Decode a Firestore document body back into a flat JSON object.
fn decode_document(body: &Value) -> Result<Value, StoreError> {
    let fields = match body.get("fields") {
        Some(Value::Object(fields)) => fields,
        // A document can legally have no fields at all.
        None => return Ok(json!({})),
        Some(other) => {
            return Err(StoreError::Document(format!(
                "'fields' is not an object: {other}"
            )))
        }
    };

    let mut flat = Map::new();
    for (key, wrapped) in fields {
        let value = decode_value(key, wrapped)?;
        flat.insert(key.clone(), value);
    }
    Ok(Value::Object(flat))
}

fn decode_value(key: &str, wrapped: &Value) -> Result<Value, StoreError> {
    let obj = wrapped.as_object().ok_or_else(|| {
        StoreError::Document(format!("field '{key}' is not a typed value: {wrapped}"))
    })?;

    if let Some(s) = obj.get("stringValue").and_then(Value::as_str) {
        return Ok(Value::String(s.to_string()));
    }
    if let Some(b) = obj.get("booleanValue").and_then(Value::as_bool) {
        return Ok(Value::Bool(b));
    }
    if let Some(raw) = obj.get("integerValue").and_then(Value::as_str) {
        let parsed: i64 = raw.parse().map_err(|_| {
            StoreError::Document(format!("field '{key}' has non-numeric integerValue"))
        })?;
        return Ok(json!(parsed));
    }
    if let Some(d) = obj.get("doubleValue").and_then(Value::as_f64) {
        return Ok(json!(d));
    }
    if obj.contains_key("nullValue") {
        return Ok(Value::Null);
    }
    Err(StoreError::Document(format!(
        "field '{key}' has unsupported wire type: {wrapped}"
    )))
}
