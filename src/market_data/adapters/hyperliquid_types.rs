// Source: POST https://api.hyperliquid.xyz/info {"type":"l2Book","coin":...}
// The same book shape is pushed on the `l2Book` websocket channel.
#[derive(Debug, serde::Deserialize)]
pub struct L2Book {
    pub coin: String,
    pub levels: (Vec<WsLevel>, Vec<WsLevel>), // (bids, asks)
    pub time: u64,
}

#[derive(Debug, serde::Deserialize)]
pub struct WsLevel {
    pub px: String, // price string, e.g. "1234.56"
    pub sz: String, // size string, e.g. "0.01"
    pub n: u32,     // number of orders at this level
}

#[derive(Debug, serde::Serialize)]
pub struct InfoRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coin: &'a str,
}
