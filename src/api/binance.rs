use super::Exchange;
use crate::config::ExchangeConfig;
use crate::models::{Candle, Interval, LotSize, OrderConfirmation};
use crate::Result;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use uuid::Uuid;

// Binance Spot REST API
// Docs: https://developers.binance.com/docs/binance-spot-api-docs/rest-api
const KLINES_PATH: &str = "/api/v3/klines";
const TICKER_PRICE_PATH: &str = "/api/v3/ticker/price";
const EXCHANGE_INFO_PATH: &str = "/api/v3/exchangeInfo";
const ORDER_PATH: &str = "/api/v3/order";
const ACCOUNT_PATH: &str = "/api/v3/account";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const REQUEST_TIMEOUT_SECS: u64 = 30;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
struct Credentials {
    api_key: String,
    api_secret: String,
}

/// Client for the Binance spot API
///
/// Public endpoints work without credentials; signed endpoints (orders,
/// balances) fail with an error if the key or secret is missing.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    recv_window_ms: u64,
}

// ============== Response Types ==============

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    symbol: String,
    filters: Vec<SymbolFilter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolFilter {
    filter_type: String,
    #[serde(default)]
    min_qty: Option<String>,
    #[serde(default)]
    step_size: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResponse {
    symbol: String,
    order_id: u64,
    client_order_id: String,
    transact_time: i64,
    status: String,
    executed_qty: String,
    // Binance's spelling
    #[serde(rename = "cummulativeQuoteQty")]
    cumulative_quote_qty: String,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    balances: Vec<Balance>,
}

#[derive(Debug, Deserialize)]
struct Balance {
    asset: String,
    free: String,
}

// ============== Implementation ==============

impl BinanceClient {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let credentials = match (&config.api_key, &config.api_secret) {
            (Some(api_key), Some(api_secret)) => Some(Credentials {
                api_key: api_key.clone(),
                api_secret: api_secret.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            recv_window_ms: config.recv_window_ms,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    async fn public_get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "Binance public request");

        let response = self.client.get(&url).query(query).send().await?;
        parse_response(response).await
    }

    async fn signed_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or("Binance API key/secret not configured")?;

        params.push(("recvWindow", self.recv_window_ms.to_string()));
        params.push(("timestamp", Utc::now().timestamp_millis().to_string()));

        let query = encode_params(&params);
        let signature = sign(&credentials.api_secret, &query)?;
        let url = format!("{}{}?{}&signature={}", self.base_url, path, query, signature);
        tracing::debug!(%method, path, "Binance signed request");

        let response = self
            .client
            .request(method, &url)
            .header(API_KEY_HEADER, &credentials.api_key)
            .send()
            .await?;
        parse_response(response).await
    }
}

impl Exchange for BinanceClient {
    async fn get_candles(&self, symbol: &str, interval: Interval, limit: u32) -> Result<Vec<Candle>> {
        let rows: Vec<Vec<serde_json::Value>> = self
            .public_get(
                KLINES_PATH,
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let candles = rows
            .iter()
            .map(|row| parse_kline(row))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(symbol, %interval, count = candles.len(), "Fetched klines");
        Ok(candles)
    }

    async fn get_spot_price(&self, symbol: &str) -> Result<f64> {
        let ticker: TickerPrice = self
            .public_get(TICKER_PRICE_PATH, &[("symbol", symbol.to_string())])
            .await?;
        parse_decimal(&ticker.price, "price")
    }

    async fn get_lot_size(&self, symbol: &str) -> Result<LotSize> {
        let info: ExchangeInfo = self
            .public_get(EXCHANGE_INFO_PATH, &[("symbol", symbol.to_string())])
            .await?;

        let symbol_info = info
            .symbols
            .into_iter()
            .find(|s| s.symbol == symbol)
            .ok_or_else(|| format!("Symbol {} not listed in exchange info", symbol))?;

        let filter = symbol_info
            .filters
            .into_iter()
            .find(|f| f.filter_type == "LOT_SIZE")
            .ok_or_else(|| format!("No LOT_SIZE filter for {}", symbol))?;

        let min_qty = filter.min_qty.ok_or("LOT_SIZE filter missing minQty")?;
        let step_size = filter.step_size.ok_or("LOT_SIZE filter missing stepSize")?;

        Ok(LotSize {
            min_qty: parse_decimal(&min_qty, "minQty")?,
            step_size: parse_decimal(&step_size, "stepSize")?,
        })
    }

    async fn submit_market_buy(&self, symbol: &str, quantity: &str) -> Result<OrderConfirmation> {
        let params = vec![
            ("symbol", symbol.to_string()),
            ("side", "BUY".to_string()),
            ("type", "MARKET".to_string()),
            ("quantity", quantity.to_string()),
            ("newClientOrderId", Uuid::new_v4().simple().to_string()),
        ];

        let order: OrderResponse = self.signed_request(Method::POST, ORDER_PATH, params).await?;

        Ok(OrderConfirmation {
            symbol: order.symbol,
            order_id: order.order_id,
            client_order_id: order.client_order_id,
            status: order.status,
            executed_qty: parse_decimal(&order.executed_qty, "executedQty")?,
            cumulative_quote_qty: parse_decimal(&order.cumulative_quote_qty, "cummulativeQuoteQty")?,
            transact_time: millis_to_datetime(order.transact_time)?,
        })
    }

    async fn get_asset_balance(&self, asset: &str) -> Result<f64> {
        let account: AccountInfo = self
            .signed_request(Method::GET, ACCOUNT_PATH, Vec::new())
            .await?;

        match account.balances.iter().find(|b| b.asset.eq_ignore_ascii_case(asset)) {
            Some(balance) => parse_decimal(&balance.free, "free"),
            None => Ok(0.0),
        }
    }
}

// ============== Helpers ==============

/// HMAC-SHA256 of the query string, hex encoded
pub fn sign(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| format!("Invalid API secret: {}", e))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

// Values are symbols, decimals and hex ids, none of which need escaping
fn encode_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(err) => format!("Binance API error ({}): code {} - {}", status, err.code, err.msg),
            Err(_) => format!("Binance API error ({}): {}", status, body),
        };
        return Err(message.into());
    }

    Ok(serde_json::from_str(&body)?)
}

fn parse_decimal(value: &str, field: &str) -> Result<f64> {
    let parsed = value
        .parse::<f64>()
        .map_err(|e| format!("Invalid {} '{}': {}", field, value, e))?;
    Ok(parsed)
}

fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>> {
    let timestamp = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| format!("Timestamp out of range: {}", millis))?;
    Ok(timestamp)
}

/// Kline row: [openTime, open, high, low, close, volume, closeTime, ...]
fn parse_kline(row: &[serde_json::Value]) -> Result<Candle> {
    if row.len() < 7 {
        return Err(format!("Kline row has {} fields, expected at least 7", row.len()).into());
    }

    let time = |idx: usize| -> Result<DateTime<Utc>> {
        let millis = row[idx]
            .as_i64()
            .ok_or_else(|| format!("Kline field {} is not a timestamp", idx))?;
        millis_to_datetime(millis)
    };
    let number = |idx: usize| -> Result<f64> {
        let text = row[idx]
            .as_str()
            .ok_or_else(|| format!("Kline field {} is not a string", idx))?;
        parse_decimal(text, "kline value")
    };

    Ok(Candle {
        open_time: time(0)?,
        open: number(1)?,
        high: number(2)?,
        low: number(3)?,
        close: number(4)?,
        volume: number(5)?,
        close_time: time(6)?,
    })
}
