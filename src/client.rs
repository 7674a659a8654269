//! HTTP client for the masterdata upsert API.
//!
//! Every exported call validates/normalizes its batch locally first and
//! fails before any network interaction if a record is invalid. After
//! submission, the per-record outcomes are reconciled positionally from
//! the server's result array; per-item `ERROR` states are data, not call
//! failures.
//!
//! The client holds no mutable state and is safe to share across tasks.
//! Cancellation and timeouts are the caller's concern: drop the future or
//! configure [`Client::with_timeout`]; no call is retried internally.

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::batch::{normalize_batch, validate_batch};
use crate::error::{ApiError, ApiResult, UploadResult, ValidationError};
use crate::models::{
    decode_results, BankAccount, GlAccount, ImportBankAccountResult, ImportGlAccountResult,
    ImportObjectResult, ImportPartnerResult, Invoice, ObjectTenantOwner, Partner,
    RealEstateObject,
};

/// Default base URL of the API.
pub const BASE_URL: &str = "https://masterdata.example.com/api/public";

/// Magic `source` value that makes the endpoints validate the submission
/// without side effects.
pub const SOURCE_TEST_ENDPOINT_NOP: &str = "TestEndpointNOP";

/// Environment variable holding the API key for [`Client::from_env`].
pub const API_KEY_ENV: &str = "MASTERLOAD_API_KEY";

/// Server-side import options shared by the masterdata batch endpoints.
///
/// These flags govern server-side partial-application semantics; they are
/// orthogonal to the SDK's own client-side fail-fast validation.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Fail the whole request if any record is invalid server-side.
    pub fail_on_invalid: bool,
    /// Import either all records or none in case of any error.
    pub all_or_none: bool,
    /// Optional name or ID of who did the import.
    pub source: Option<String>,
}

impl ImportOptions {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Import options of the GL-account endpoint.
#[derive(Debug, Clone, Default)]
pub struct GlAccountImportOptions {
    /// Find existing accounts by name if not found by number.
    pub find_by_name: bool,
    /// Append object numbers to account numbers to make them unique.
    pub object_specific_account_nos: bool,
    pub base: ImportOptions,
}

/// Import options of the partner-companies endpoint.
#[derive(Debug, Clone, Default)]
pub struct PartnerImportOptions {
    /// Let the server import cleaned-up versions of invalid records.
    pub use_cleaned_invalid: bool,
    pub base: ImportOptions,
}

/// In-memory file content for the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content,
        }
    }

    /// Reads the file at `path` into memory.
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Ok(Self { file_name, content })
    }
}

/// Client for the masterdata upsert API.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl Client {
    /// Creates a client with an explicit API key and the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    /// Creates a client from the `MASTERLOAD_API_KEY` environment
    /// variable (dotenv-aware).
    pub fn from_env() -> ApiResult<Self> {
        let _ = dotenvy::dotenv();
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| ApiError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Overrides the base URL, e.g. for testing against a local server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Applies a per-request timeout to every call of this client.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sends a JSON POST and returns the 200 response body. Non-200 is a
    /// protocol error carrying the status; transport errors pass through.
    async fn post_json<P: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        payload: &P,
    ) -> ApiResult<String> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .json(payload);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.as_u16() != 200 {
            return Err(ApiError::Status {
                status: status.as_u16(),
                text: body,
            });
        }
        Ok(body)
    }

    /// Upserts bank accounts via `/masterdata/bank-accounts`.
    ///
    /// Accounts are normalized in place and the whole batch fails locally
    /// if any account is invalid.
    pub async fn post_bank_accounts(
        &self,
        accounts: &mut [BankAccount],
        options: &ImportOptions,
    ) -> ApiResult<Vec<ImportBankAccountResult>> {
        normalize_batch("BankAccount", accounts, false)?;
        let query = base_query(options);
        let body = self
            .post_json("/masterdata/bank-accounts", &query, accounts)
            .await?;
        decode_results(&body, accounts.len())
    }

    /// Upserts general-ledger accounts via `/masterdata/gl-accounts`.
    pub async fn post_gl_accounts(
        &self,
        accounts: &[GlAccount],
        options: &GlAccountImportOptions,
    ) -> ApiResult<Vec<ImportGlAccountResult>> {
        validate_batch("GLAccount", accounts)?;
        let mut query = Vec::new();
        push_flag(&mut query, "findByName", options.find_by_name);
        push_flag(
            &mut query,
            "objectSpecificAccountNos",
            options.object_specific_account_nos,
        );
        query.extend(base_query(&options.base));
        let body = self
            .post_json("/masterdata/gl-accounts", &query, accounts)
            .await?;
        decode_results(&body, accounts.len())
    }

    /// Upserts partner companies via `/masterdata/partner-companies`.
    ///
    /// Partners are normalized in place (flat IBAN/BIC pairs folded into
    /// the bank-account list) and the batch fails locally on any invalid
    /// record. `use_cleaned_invalid` is forwarded to the server and only
    /// affects records the server itself considers invalid.
    pub async fn post_partners(
        &self,
        partners: &mut [Partner],
        options: &PartnerImportOptions,
    ) -> ApiResult<Vec<ImportPartnerResult>> {
        normalize_batch("Partner", partners, false)?;
        let mut query = Vec::new();
        push_flag(&mut query, "failOnInvalid", options.base.fail_on_invalid);
        push_flag(&mut query, "useCleanedInvalid", options.use_cleaned_invalid);
        push_flag(&mut query, "allOrNone", options.base.all_or_none);
        push_source(&mut query, options.base.source.as_deref());
        let body = self
            .post_json("/masterdata/partner-companies", &query, partners)
            .await?;
        decode_results(&body, partners.len())
    }

    /// Upserts real-estate objects via `/masterdata/real-estate-objects`.
    /// Objects are identified by their number.
    pub async fn post_real_estate_objects(
        &self,
        objects: &mut [RealEstateObject],
        source: Option<&str>,
    ) -> ApiResult<Vec<ImportObjectResult>> {
        normalize_batch("RealEstateObject", objects, false)?;
        let mut query = Vec::new();
        push_source(&mut query, source);
        let body = self
            .post_json("/masterdata/real-estate-objects", &query, objects)
            .await?;
        decode_results(&body, objects.len())
    }

    /// Upserts tenant-owner assignments via
    /// `/masterdata/real-estate-object-tenant-owners`.
    pub async fn post_object_tenant_owners(
        &self,
        tenant_owners: &[ObjectTenantOwner],
        source: Option<&str>,
    ) -> ApiResult<Vec<ImportObjectResult>> {
        validate_batch("ObjectTenantOwner", tenant_owners)?;
        let mut query = Vec::new();
        push_source(&mut query, source);
        let body = self
            .post_json(
                "/masterdata/real-estate-object-tenant-owners",
                &query,
                tenant_owners,
            )
            .await?;
        decode_results(&body, tenant_owners.len())
    }

    /// Upserts instances of the tenant class `class_name`, using the
    /// property `id_prop_name` as the identifier.
    ///
    /// Every instance must carry a non-null value for `id_prop_name`;
    /// violations fail locally before calling out.
    pub async fn post_object_instances(
        &self,
        class_name: &str,
        id_prop_name: &str,
        instances: &[Map<String, Value>],
        source: Option<&str>,
    ) -> ApiResult<()> {
        let mut err = ValidationError::new();
        if class_name.is_empty() {
            err.push("className", "is required");
        }
        if id_prop_name.is_empty() {
            err.push("idPropName", "is required");
        }
        if err.is_empty() {
            for (i, instance) in instances.iter().enumerate() {
                let id = instance.get(id_prop_name);
                if id.is_none() || id == Some(&Value::Null) {
                    err.push(
                        format!("{class_name}[{i}]"),
                        format!("has no ID prop {id_prop_name:?}"),
                    );
                }
            }
        }
        err.into_result()?;

        let mut query = Vec::new();
        push_source(&mut query, source);
        let endpoint = format!("/masterdata/upsert-objects/{class_name}/id-prop/{id_prop_name}");
        self.post_json(&endpoint, &query, instances).await?;
        Ok(())
    }

    /// Uploads a document via `/upload` and returns the created document
    /// ID. A 409 response is surfaced as
    /// [`UploadError::Duplicate`](crate::error::UploadError::Duplicate).
    pub async fn upload_document(
        &self,
        document_category: Uuid,
        document: UploadFile,
        invoice: Option<UploadFile>,
        tags: &[String],
    ) -> UploadResult<Uuid> {
        use crate::error::UploadError;

        let mut form = reqwest::multipart::Form::new()
            .text("documentCategory", document_category.to_string());
        for tag in tags {
            form = form.text("tag", tag.clone());
        }
        form = form.part(
            "document",
            reqwest::multipart::Part::bytes(document.content).file_name(document.file_name),
        );
        if let Some(invoice) = invoice {
            form = form.part(
                "invoice",
                reqwest::multipart::Part::bytes(invoice.content).file_name(invoice.file_name),
            );
        }

        let url = format!("{}/upload", self.base_url);
        let mut request = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        match status {
            200 => Uuid::parse_str(body.trim()).map_err(|_| UploadError::InvalidDocumentId(body)),
            409 => Err(UploadError::Duplicate(body)),
            _ => Err(UploadError::Status { status, text: body }),
        }
    }

    /// Validates `invoice`, serializes it to JSON and uploads it as the
    /// `invoice` part alongside the document file.
    pub async fn upload_invoice(
        &self,
        document_category: Uuid,
        document: UploadFile,
        invoice: &mut Invoice,
        tags: &[String],
    ) -> UploadResult<Uuid> {
        use crate::error::UploadError;

        invoice.validate()?;
        let content = serde_json::to_vec(invoice).map_err(|e| {
            UploadError::InvalidInvoice(crate::error::FieldError::new(
                "invoice",
                format!("failed to serialize: {e}"),
            ))
        })?;
        let invoice_file = UploadFile::new("invoice.json", content);
        self.upload_document(document_category, document, Some(invoice_file), tags)
            .await
    }
}

fn base_query(options: &ImportOptions) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    push_flag(&mut query, "failOnInvalid", options.fail_on_invalid);
    push_flag(&mut query, "allOrNone", options.all_or_none);
    push_source(&mut query, options.source.as_deref());
    query
}

fn push_flag(query: &mut Vec<(&'static str, String)>, name: &'static str, set: bool) {
    if set {
        query.push((name, "true".to_string()));
    }
}

fn push_source(query: &mut Vec<(&'static str, String)>, source: Option<&str>) {
    if let Some(source) = source {
        if !source.is_empty() {
            query.push(("source", source.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Iban;

    #[test]
    fn test_query_flags_only_when_set() {
        let query = base_query(&ImportOptions::default());
        assert!(query.is_empty());

        let query = base_query(&ImportOptions {
            fail_on_invalid: true,
            all_or_none: true,
            ..ImportOptions::default().with_source("MY_SERVICE")
        });
        assert_eq!(
            query,
            vec![
                ("failOnInvalid", "true".to_string()),
                ("allOrNone", "true".to_string()),
                ("source", "MY_SERVICE".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_batch_fails_before_any_request() {
        // Unroutable base URL: reaching the network would fail with a
        // transport error, not a validation error.
        let client = Client::new("test-key").with_base_url("http://127.0.0.1:1");
        let mut partners = vec![Partner::new("")];
        let err = client
            .post_partners(&mut partners, &PartnerImportOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_object_instances_require_id_prop() {
        let client = Client::new("test-key").with_base_url("http://127.0.0.1:1");
        let mut with_id = Map::new();
        with_id.insert("code".to_string(), Value::String("X1".to_string()));
        let mut without_id = Map::new();
        without_id.insert("name".to_string(), Value::String("no code".to_string()));

        let err = client
            .post_object_instances("Contract", "code", &[with_id, without_id], None)
            .await
            .unwrap_err();
        let ApiError::Validation(err) = err else {
            panic!("expected validation error");
        };
        assert_eq!(err.len(), 1);
        assert!(err.to_string().contains("Contract[1]"));
    }

    #[tokio::test]
    async fn test_invalid_invoice_fails_before_upload() {
        let client = Client::new("test-key").with_base_url("http://127.0.0.1:1");
        let mut invoice = Invoice {
            iban: Some(Iban::new("DE89370400440532013001")),
            ..Invoice::default()
        };
        let err = client
            .upload_invoice(
                Uuid::nil(),
                UploadFile::new("doc.pdf", vec![1, 2, 3]),
                &mut invoice,
                &[],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::UploadError::InvalidInvoice(_)
        ));
    }
}
