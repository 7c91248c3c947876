//! REST adapter for the brokerage API.
//!
//! Implements [`BrokerageApi`] over HTTP. Request building, bearer-token
//! headers, and response/error mapping live here and nowhere else.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, LOCATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::TokenStore;
use crate::error::{Error, Result};
use crate::models::{
    AccountDetail, AccountHash, AccountNumberEntry, NewOrder, Order, OrderId, PlacedOrder,
    Quote, QuoteMap, Symbol,
};

use super::api::BrokerageApi;
use super::config::ClientConfig;

/// HTTP implementation of the brokerage port.
pub struct RestClient {
    http: reqwest::Client,
    token: TokenStore,
    config: ClientConfig,
}

impl RestClient {
    /// Build a REST client from configuration and a loaded token.
    pub fn new(config: ClientConfig, token: TokenStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            token,
            config,
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.token.bearer())
                .map_err(|_| Error::Auth("token contains invalid header characters".into()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.token.ensure_fresh()?;
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%url, "GET");

        let response = self.http.get(&url).headers(self.headers()?).send().await?;
        Self::handle_response(response).await
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        self.token.ensure_fresh()?;
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .headers(self.headers()?)
            .query(query)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let status_code = status.as_u16();
        let body: serde_json::Value = response.json().await.unwrap_or_default();

        if status_code == 401 {
            return Err(Error::Auth(
                "API rejected the token (401). Re-run your provider's auth tool".into(),
            ));
        }

        Err(Error::from_api_response(status_code, body))
    }

    fn quotes_path() -> &'static str {
        "/marketdata/v1/quotes"
    }
}

#[async_trait]
impl BrokerageApi for RestClient {
    async fn get_account_numbers(&self) -> Result<Vec<AccountNumberEntry>> {
        self.get("/trader/v1/accounts/accountNumbers").await
    }

    async fn get_accounts(&self) -> Result<Vec<AccountDetail>> {
        self.get_with_query("/trader/v1/accounts", &[("fields", "positions")])
            .await
    }

    async fn get_quote(&self, symbol: &Symbol) -> Result<Quote> {
        let quotes = self.get_quotes(std::slice::from_ref(symbol)).await?;
        quotes
            .into_iter()
            .find(|q| &q.symbol == symbol)
            .ok_or_else(|| Error::Api {
                status: 404,
                message: format!("no quote returned for {symbol}"),
                body: serde_json::Value::Null,
            })
    }

    async fn get_quotes(&self, symbols: &[Symbol]) -> Result<Vec<Quote>> {
        let joined = symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let map: QuoteMap = self
            .get_with_query(Self::quotes_path(), &[("symbols", joined.as_str())])
            .await?;

        Ok(map
            .iter()
            .map(|(symbol, entry)| Quote::from_entry(symbol, entry))
            .collect())
    }

    async fn get_orders(&self, account: &AccountHash) -> Result<Vec<Order>> {
        self.get(&format!("/trader/v1/accounts/{account}/orders"))
            .await
    }

    async fn place_order(&self, account: &AccountHash, order: &NewOrder) -> Result<PlacedOrder> {
        self.token.ensure_fresh()?;
        let url = format!(
            "{}/trader/v1/accounts/{account}/orders",
            self.config.base_url
        );
        debug!(%url, "POST order");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(order)
            .send()
            .await?;

        let status = response.status();

        // Placement success is 201 Created with an empty body; the order ID
        // arrives in the Location header.
        if status.is_success() {
            let order_id = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|loc| loc.rsplit('/').next())
                .filter(|id| !id.is_empty())
                .map(OrderId::new);

            return Ok(PlacedOrder {
                order_id,
                status_code: status.as_u16(),
            });
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::OrderExecution {
            status: Some(status.as_u16()),
            message: if message.is_empty() {
                "order rejected with empty response body".to_string()
            } else {
                message
            },
        })
    }
}
