// Source: https://api.bybit.com/v5/market/orderbook (category=spot)

// Envelope shared by every V5 endpoint. `result` is `{}` on errors, so it is
// kept untyped until retCode says it is usable.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitResponse {
    pub ret_code: i64,
    #[serde(default)]
    pub ret_msg: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

#[derive(Debug, serde::Deserialize)]
pub struct BybitOrderbook {
    pub s: String,
    pub b: Vec<[String; 2]>, // [[price, size], ...]
    pub a: Vec<[String; 2]>,
    #[serde(default)]
    pub ts: i64,
}
