// insiders-client/src/client.rs
// Insiders client - backend endpoints on top of an HttpClient transport

use std::path::Path;

use serde_json::{Map, Value};
use shared::client::{
    ForgotPasswordRequest, LegacySignupRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
};
use shared::response::unwrap_data;
use shared::{CustomerDraft, CustomerId, CustomerRecord, CustomerUpdate, MessageResponse};
use tracing::{debug, info, instrument, warn};

use insiders_tabular::{RawRow, Reconciler, parse_csv};

use crate::http::{ApiRequest, Body, HttpClient, NetworkHttpClient};
use crate::session::SessionContext;
use crate::upload::{RowSource, UploadOutcome, extract_rows};
use crate::{AuthEncoding, BackendProfile, ClientConfig, ClientError, ClientResult};

/// Multipart field the upload endpoint reads
const UPLOAD_FIELD: &str = "file";

/// Typed client for the Insiders Club backend
///
/// Generic over the transport so tests can swap the network out.
#[derive(Debug, Clone)]
pub struct InsidersClient<H: HttpClient = NetworkHttpClient> {
    config: ClientConfig,
    http: H,
    reconciler: Reconciler,
}

impl InsidersClient<NetworkHttpClient> {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = NetworkHttpClient::new(&config)?;
        Ok(Self::with_transport(config, http))
    }
}

impl<H: HttpClient> InsidersClient<H> {
    pub fn with_transport(config: ClientConfig, http: H) -> Self {
        let reconciler = Reconciler::with_schema(config.profile.schema());
        Self {
            config,
            http,
            reconciler,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &H {
        &self.http
    }

    // ========== Session ==========

    /// Re-install the cookies stored in `session`
    pub fn attach_session(&self, session: &SessionContext) {
        if let Some(cookies) = session.cookies() {
            self.http.restore_cookies(cookies);
        }
    }

    fn store_cookies(&self, session: &mut SessionContext) {
        session.set_cookies(self.http.cookies());
    }

    /// Sign out: forget the user, the admin marker and the cookies
    pub fn logout(&self, session: &mut SessionContext) -> ClientResult<()> {
        session.clear()?;
        info!("Signed out");
        Ok(())
    }

    // ========== Auth ==========

    fn login_request(
        &self,
        path: &str,
        email: &str,
        password: &str,
        failure: &'static str,
    ) -> ClientResult<ApiRequest> {
        let request = ApiRequest::post(path, failure);
        Ok(match self.config.auth_encoding {
            AuthEncoding::Form => request.form(&[("email", email), ("password", password)]),
            AuthEncoding::Json => request.json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })?,
        })
    }

    /// Create a self-service account
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> ClientResult<CustomerRecord> {
        let api = ApiRequest::post("customers", "Signup failed");
        let api = match self.config.profile {
            BackendProfile::Legacy => api.json(&LegacySignupRequest::from(request))?,
            BackendProfile::Fixed | BackendProfile::Dynamic => api.json(request)?,
        };
        let body = self.http.execute(api).await?;

        let record = match unwrap_data(body.into_json()) {
            Value::Object(row) => self.reconciler.reconcile_row(&row, 1),
            _ => {
                let row: RawRow = [
                    ("name", Value::from(request.name.as_str())),
                    ("email", Value::from(request.email.as_str())),
                    ("phone", Value::from(request.phone.as_str())),
                    ("isEmployee", Value::from(request.is_employee)),
                ]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect();
                self.reconciler.reconcile_row(&row, 1)
            }
        };
        info!(id = %record.id(), "Account created");
        Ok(record)
    }

    /// Customer sign-in; the returned record becomes the session user
    #[instrument(skip(self, password, session))]
    pub async fn customer_login(
        &self,
        email: &str,
        password: &str,
        session: &mut SessionContext,
    ) -> ClientResult<CustomerRecord> {
        let request = self.login_request("auth/customer-login", email, password, "Login failed")?;
        let body = self.http.execute(request).await?;

        let value = body.into_json();
        let user = match value.get("data").or_else(|| value.get("user")) {
            Some(Value::Object(row)) => self.reconciler.reconcile_row(row, 1),
            _ => {
                let message = value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Invalid credentials");
                return Err(ClientError::Unauthorized(message.to_string()));
            }
        };

        session.set_user(user.clone());
        self.store_cookies(session);
        session.save()?;
        info!(id = %user.id(), "Customer signed in");
        Ok(user)
    }

    /// Admin sign-in; only the email is kept as the session marker
    #[instrument(skip(self, password, session))]
    pub async fn admin_login(
        &self,
        email: &str,
        password: &str,
        session: &mut SessionContext,
    ) -> ClientResult<MessageResponse> {
        let request =
            self.login_request("auth/signin", email, password, "Invalid admin credentials")?;
        let body = self.http.execute(request).await?;
        let ack = acknowledge(body, "Signed in");
        if ack.success == Some(false) {
            let message = ack
                .message
                .unwrap_or_else(|| "Invalid admin credentials".to_string());
            return Err(ClientError::Unauthorized(message));
        }

        session.set_admin(email);
        self.store_cookies(session);
        session.save()?;
        info!("Admin signed in");
        Ok(ack)
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<MessageResponse> {
        let request = ApiRequest::post("auth/forgot-password", "Could not send reset link")
            .json(&ForgotPasswordRequest {
                email: email.to_string(),
            })?;
        let body = self.http.execute(request).await?;
        Ok(acknowledge(body, "Reset link sent"))
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> ClientResult<MessageResponse> {
        let request = ApiRequest::post("auth/reset-password", "Password reset failed").json(
            &ResetPasswordRequest {
                token: token.to_string(),
                new_password: new_password.to_string(),
            },
        )?;
        let body = self.http.execute(request).await?;
        Ok(acknowledge(body, "Password reset successfully"))
    }

    // ========== Customers ==========

    /// All customers, reconciled; accepts `{data: [...]}` or a bare array
    pub async fn list_customers(&self) -> ClientResult<Vec<CustomerRecord>> {
        let body = self
            .http
            .execute(ApiRequest::get("customers", "Failed to load customers"))
            .await?;
        let rows: Vec<RawRow> = match unwrap_data(body.into_json()) {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(row) => Some(row),
                    _ => None,
                })
                .collect(),
            other => {
                return Err(ClientError::InvalidResponse(format!(
                    "expected a customer list, got {}",
                    kind_of(&other)
                )));
            }
        };
        debug!(rows = rows.len(), "Customers loaded");
        Ok(self.reconciler.reconcile_rows(&rows))
    }

    pub async fn get_customer(&self, id: &CustomerId) -> ClientResult<CustomerRecord> {
        let body = self
            .http
            .execute(ApiRequest::get(format!("customers/{id}"), "Failed to load customer"))
            .await?;
        match unwrap_data(body.into_json()) {
            Value::Object(row) => {
                let mut record = self.reconciler.reconcile_row(&row, 1);
                record.set_id(id.clone());
                Ok(record)
            }
            _ => Err(ClientError::NotFound(format!("Customer {id} not found"))),
        }
    }

    /// Create a customer; the body shape follows the backend profile
    #[instrument(skip(self, draft))]
    pub async fn add_customer(&self, draft: &CustomerDraft) -> ClientResult<CustomerRecord> {
        let request =
            ApiRequest::post("customers", "Failed to add customer").json(&self.create_body(draft)?)?;
        let body = self.http.execute(request).await?;

        let record = match unwrap_data(body.into_json()) {
            Value::Object(row) if !row.is_empty() => self.reconciler.reconcile_row(&row, 1),
            _ => draft.record.clone(),
        };
        info!(id = %record.id(), "Customer added");
        Ok(record)
    }

    fn create_body(&self, draft: &CustomerDraft) -> ClientResult<Value> {
        let password = draft.password.clone().filter(|p| !p.is_empty());
        let body = match (&draft.record, self.config.profile) {
            (CustomerRecord::Dynamic(d), _) => {
                let mut body = Map::new();
                body.insert(
                    "dynamicFields".into(),
                    serde_json::to_value(&d.dynamic_fields)?,
                );
                if let Some(password) = password {
                    body.insert("password".into(), Value::String(password));
                }
                Value::Object(body)
            }
            (CustomerRecord::Fixed(f), BackendProfile::Legacy) => {
                serde_json::to_value(LegacySignupRequest {
                    cus_name: f.name.clone(),
                    email: f.email.clone(),
                    password: password.unwrap_or_default(),
                    mobile: f.phone.clone(),
                })?
            }
            (record @ CustomerRecord::Fixed(_), _) => {
                serde_json::to_value(CustomerUpdate::from_record(record).with_password(password))?
            }
        };
        Ok(body)
    }

    /// Update allow-listed fields; `None` fields are not sent
    pub async fn update_customer(
        &self,
        id: &CustomerId,
        update: &CustomerUpdate,
    ) -> ClientResult<MessageResponse> {
        let request =
            ApiRequest::put(format!("customers/{id}"), "Failed to update customer").json(update)?;
        let body = self.http.execute(request).await?;
        info!(%id, "Customer updated");
        Ok(acknowledge(body, "Customer updated successfully"))
    }

    pub async fn delete_customer(&self, id: &CustomerId) -> ClientResult<MessageResponse> {
        let body = self
            .http
            .execute(ApiRequest::delete(
                format!("customers/{id}"),
                "Failed to delete customer",
            ))
            .await?;
        info!(%id, "Customer deleted");
        Ok(acknowledge(body, "Customer deleted successfully"))
    }

    pub async fn delete_all_customers(&self) -> ClientResult<MessageResponse> {
        let body = self
            .http
            .execute(ApiRequest::delete("customers", "Failed to delete customers"))
            .await?;
        warn!("All customers deleted");
        Ok(acknowledge(body, "All customers deleted"))
    }

    // ========== Upload ==========

    /// Upload a CSV file and return the rows it produced
    pub async fn upload_customers(&self, path: &Path) -> ClientResult<UploadOutcome> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("customers.csv")
            .to_string();
        self.upload_bytes(&file_name, bytes).await
    }

    /// Upload pipeline: post the file, detect the response envelope, fall
    /// back to parsing the file locally, then reconcile.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_bytes(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<UploadOutcome> {
        let request = ApiRequest::post("customers/upload-csv", "Upload failed").file(
            UPLOAD_FIELD,
            file_name,
            bytes.clone(),
        );
        let body = self.http.execute(request).await?;

        let message = body
            .as_json()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let (source, rows) = match body.as_json().and_then(extract_rows) {
            Some((shape, rows)) => {
                info!(strategy = ?shape, rows = rows.len(), "Using rows from backend response");
                (RowSource::Backend(shape), rows)
            }
            None => {
                let rows = match std::str::from_utf8(&bytes) {
                    Ok(text) => parse_csv(text),
                    Err(e) => {
                        warn!(error = %e, "Uploaded file is not UTF-8 text");
                        Vec::new()
                    }
                };
                info!(rows = rows.len(), "Backend response had no rows, parsed file locally");
                (RowSource::ClientFallback, rows)
            }
        };

        if rows.is_empty() {
            return Err(ClientError::NoDataFound);
        }

        Ok(UploadOutcome {
            records: self.reconciler.reconcile_rows(&rows),
            source,
            message,
        })
    }
}

/// Read a mutating endpoint's success body
fn acknowledge(body: Body, fallback: &str) -> MessageResponse {
    match body {
        Body::Json(Value::String(text)) | Body::Text(text) => {
            MessageResponse::from_body(&text, fallback)
        }
        Body::Json(value) => MessageResponse::from_body(&value.to_string(), fallback),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
