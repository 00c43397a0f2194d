// Source: https://api.binance.com/api/v3/depth
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthResponse {
    #[serde(default)]
    pub last_update_id: u64,
    pub bids: Vec<[String; 2]>, // [price, qty]
    pub asks: Vec<[String; 2]>,
}

// Error body, e.g. {"code":-1121,"msg":"Invalid symbol."}
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}
