// Convert wire strings into orders tagged with the venue that produced them.
// Venues quote prices and sizes as decimal strings; anything that does not
// parse to a finite, non-negative number poisons the whole snapshot.

use crate::engine::types::Order;
use crate::market_data::adapters::SourceError;

#[derive(Debug, Clone)]
pub struct Normaliser {
    pub source_id: String,
    pub source_name: Option<String>,
}

impl Normaliser {
    pub fn new(source_id: impl Into<String>, source_name: Option<String>) -> Self {
        Self { source_id: source_id.into(), source_name }
    }

    pub fn parse_decimal(s: &str) -> Result<f64, SourceError> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| SourceError::Decode(format!("not a number: {s:?}")))?;
        if !value.is_finite() || value < 0.0 {
            return Err(SourceError::Decode(format!("out of range: {s:?}")));
        }
        Ok(value)
    }

    pub fn level(&self, px: &str, sz: &str) -> Result<Order, SourceError> {
        Ok(Order {
            price: Self::parse_decimal(px)?,
            amount: Self::parse_decimal(sz)?,
            source_id: self.source_id.clone(),
            source_name: self.source_name.clone(),
        })
    }

    pub fn side<'a, I>(&self, levels: I) -> Result<Vec<Order>, SourceError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        levels.into_iter().map(|(px, sz)| self.level(px, sz)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        let norm = Normaliser::new("binance", Some("Binance".into()));
        let order = norm.level("1234.56", "0.010").unwrap();
        assert_eq!(order.price, 1234.56);
        assert_eq!(order.amount, 0.01);
        assert_eq!(order.source_id, "binance");
        assert_eq!(order.source_name.as_deref(), Some("Binance"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Normaliser::parse_decimal("abc").is_err());
        assert!(Normaliser::parse_decimal("NaN").is_err());
        assert!(Normaliser::parse_decimal("inf").is_err());
        assert!(Normaliser::parse_decimal("-1").is_err());
        assert_eq!(Normaliser::parse_decimal(" 42 ").unwrap(), 42.0);
    }

    #[test]
    fn test_side_fails_as_a_whole() {
        let norm = Normaliser::new("x", None);
        let ok = norm.side([("1", "2"), ("3", "4")]).unwrap();
        assert_eq!(ok.len(), 2);
        assert!(norm.side([("1", "2"), ("oops", "4")]).is_err());
    }
}
