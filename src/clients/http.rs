//! JSON-over-HTTP adapters for the collaborator ports.
//!
//! Every collaborator answers with a `{ "data": ... }` envelope. HTTP 404
//! maps to [`CollaboratorError::NotFound`], any other non-2xx status to
//! [`CollaboratorError::Rejected`], and connection or decoding failures to
//! [`CollaboratorError::Transport`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    BarberDirectory, BlockTimeService, CollaboratorError, HairColorCatalog, HairStyleCatalog,
    PaymentGateway,
};
use crate::domain::{
    BarberSnapshot, BookingToken, HairColorSnapshot, HairStyleSnapshot, PaymentRecord,
    PaymentType,
};

/// Builds the HTTP client shared by all adapters.
///
/// # Errors
///
/// Returns [`CollaboratorError::Transport`] if the TLS backend cannot be
/// initialised.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, CollaboratorError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CollaboratorError::Transport(format!("failed to create HTTP client: {e}")))
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Base URL plus shared client.
#[derive(Debug, Clone)]
struct JsonApi {
    client: reqwest::Client,
    base_url: String,
}

impl JsonApi {
    fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get<R: DeserializeOwned>(&self, path: &str, entity: &str) -> Result<R, CollaboratorError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(format!("GET {path}: {e}")))?;
        decode(response, entity).await
    }

    async fn post<B, R>(&self, path: &str, body: &B, entity: &str) -> Result<R, CollaboratorError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(format!("POST {path}: {e}")))?;
        decode(response, entity).await
    }
}

async fn decode<R: DeserializeOwned>(
    response: reqwest::Response,
    entity: &str,
) -> Result<R, CollaboratorError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CollaboratorError::NotFound(entity.to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CollaboratorError::Rejected(format!("{entity}: HTTP {status}: {body}")));
    }
    let envelope: DataEnvelope<R> = response
        .json()
        .await
        .map_err(|e| CollaboratorError::Transport(format!("{entity}: malformed response: {e}")))?;
    Ok(envelope.data)
}

/// Barber directory over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBarberDirectory {
    api: JsonApi,
}

impl HttpBarberDirectory {
    /// Creates an adapter for the barber service at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            api: JsonApi::new(client, base_url),
        }
    }
}

#[async_trait]
impl BarberDirectory for HttpBarberDirectory {
    async fn list_barbers(&self) -> Result<Vec<BarberSnapshot>, CollaboratorError> {
        self.api.get("/barbers", "barbers").await
    }

    async fn get_barber(&self, id: i32) -> Result<BarberSnapshot, CollaboratorError> {
        self.api
            .get(&format!("/barbers/{id}"), &format!("barber {id}"))
            .await
    }
}

#[derive(Debug, Serialize)]
struct CheckBlockTimeBody<'a> {
    date: &'a str,
    time: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckBlockTimeReply {
    is_blocked: bool,
}

/// Block-time service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBlockTimeService {
    api: JsonApi,
}

impl HttpBlockTimeService {
    /// Creates an adapter for the scheduling service at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            api: JsonApi::new(client, base_url),
        }
    }
}

#[async_trait]
impl BlockTimeService for HttpBlockTimeService {
    async fn is_blocked(&self, date: &str, time: &str) -> Result<bool, CollaboratorError> {
        let reply: CheckBlockTimeReply = self
            .api
            .post("/block-times/check", &CheckBlockTimeBody { date, time }, "block time")
            .await?;
        Ok(reply.is_blocked)
    }
}

/// Hair style catalog over HTTP.
#[derive(Debug, Clone)]
pub struct HttpHairStyleCatalog {
    api: JsonApi,
}

impl HttpHairStyleCatalog {
    /// Creates an adapter for the hair style service at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            api: JsonApi::new(client, base_url),
        }
    }
}

#[async_trait]
impl HairStyleCatalog for HttpHairStyleCatalog {
    async fn get_hair_style(&self, id: i32) -> Result<HairStyleSnapshot, CollaboratorError> {
        self.api
            .get(&format!("/hair-styles/{id}"), &format!("hair style {id}"))
            .await
    }
}

/// Hair color catalog over HTTP.
#[derive(Debug, Clone)]
pub struct HttpHairColorCatalog {
    api: JsonApi,
}

impl HttpHairColorCatalog {
    /// Creates an adapter for the hair color service at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            api: JsonApi::new(client, base_url),
        }
    }
}

#[async_trait]
impl HairColorCatalog for HttpHairColorCatalog {
    async fn get_hair_color(&self, id: i32) -> Result<HairColorSnapshot, CollaboratorError> {
        self.api
            .get(&format!("/hair-colors/{id}"), &format!("hair color {id}"))
            .await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBody {
    #[serde(rename = "orderUUID")]
    order_uuid: BookingToken,
    payment_type: PaymentType,
    amount: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionReply {
    payment_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentsByOrderIdsBody<'a> {
    order_ids: &'a [i32],
}

/// Payment service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    api: JsonApi,
}

impl HttpPaymentGateway {
    /// Creates an adapter for the payment service at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            api: JsonApi::new(client, base_url),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate(
        &self,
        token: BookingToken,
        payment_type: PaymentType,
        amount: i64,
    ) -> Result<String, CollaboratorError> {
        let body = TransactionBody {
            order_uuid: token,
            payment_type,
            amount,
        };
        let reply: TransactionReply = self.api.post("/transactions", &body, "transaction").await?;
        Ok(reply.payment_url)
    }

    async fn payments_by_order_ids(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<PaymentRecord>, CollaboratorError> {
        self.api
            .post(
                "/payments/by-order-ids",
                &PaymentsByOrderIdsBody { order_ids },
                "payments",
            )
            .await
    }
}
