// File: crates/chart-core/src/record.rs
// Summary: Untyped upstream records and the backtest result payload consumed by the dashboard.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ChartResult;
use crate::series::coerce_f64;

/// One time step as delivered upstream: field name -> JSON value. Never mutated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    pub fn new() -> Self { Self(Map::new()) }

    /// Builder-style insert, handy for tests and CSV adapters.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }

    /// First key in `keys` that is present and not null.
    pub fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !v.is_null())
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self { Self(map) }
}

/// Trade log entry: `{ "timestamp": "...", "type": "BUY" | "SELL" }`.
/// Fields arrive loosely typed; anything unusable reads as empty and the trade
/// is dropped later by the overlay pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub side: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    #[serde(rename = "RSI", default, deserialize_with = "lenient::rows")]
    pub rsi: Option<Vec<RawRecord>>,
    #[serde(rename = "SMA_Crossover", default, deserialize_with = "lenient::rows")]
    pub sma_crossover: Option<Vec<RawRecord>>,
    #[serde(rename = "Overbought_Threshold", default, deserialize_with = "lenient::number")]
    pub overbought_threshold: Option<f64>,
    #[serde(rename = "Oversold_Threshold", default, deserialize_with = "lenient::number")]
    pub oversold_threshold: Option<f64>,
}

/// Backtest result as returned by the backtest API. Every part is optional on
/// the wire; accessors treat missing arrays as empty. Parts with the wrong
/// shape read as missing, and rows that are not objects are skipped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    #[serde(default, deserialize_with = "lenient::rows")]
    pub ohcl_data: Option<Vec<RawRecord>>,
    #[serde(default, deserialize_with = "lenient::rows")]
    pub equity_curve_data: Option<Vec<RawRecord>>,
    #[serde(default, deserialize_with = "lenient::indicators")]
    pub technical_indicators: Option<TechnicalIndicators>,
    #[serde(default, deserialize_with = "lenient::trades")]
    pub trade_log_data: Option<Vec<TradeRecord>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub summary: Option<Map<String, Value>>,
}

impl BacktestResult {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn ohlc(&self) -> &[RawRecord] {
        self.ohcl_data.as_deref().unwrap_or(&[])
    }

    pub fn equity_curve(&self) -> &[RawRecord] {
        self.equity_curve_data.as_deref().unwrap_or(&[])
    }

    /// RSI rows, or `None` when the backtest did not produce the indicator at all.
    pub fn rsi(&self) -> Option<&[RawRecord]> {
        self.technical_indicators.as_ref()?.rsi.as_deref()
    }

    pub fn sma_crossover(&self) -> Option<&[RawRecord]> {
        self.technical_indicators.as_ref()?.sma_crossover.as_deref()
    }

    pub fn trades(&self) -> &[TradeRecord] {
        self.trade_log_data.as_deref().unwrap_or(&[])
    }

    pub fn summary_value(&self, key: &str) -> Option<f64> {
        self.summary.as_ref()?.get(key).and_then(coerce_f64)
    }
}

// Field deserializers that never fail on a value of the wrong type.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};
    use tracing::debug;

    use super::{RawRecord, TechnicalIndicators, TradeRecord};
    use crate::series::coerce_f64;

    fn array<'de, D: Deserializer<'de>>(d: D, what: &str) -> Result<Option<Vec<Value>>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => Some(items),
            None | Some(Value::Null) => None,
            Some(other) => {
                debug!(field = what, kind = kind_of(&other), "expected an array, ignoring");
                None
            }
        })
    }

    pub fn rows<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<RawRecord>>, D::Error> {
        Ok(array(d, "rows")?.map(|items| {
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(RawRecord(map)),
                    other => {
                        debug!(kind = kind_of(&other), "dropping non-object row");
                        None
                    }
                })
                .collect()
        }))
    }

    pub fn trades<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<TradeRecord>>, D::Error> {
        Ok(array(d, "trade_log_data")?.map(|items| {
            items
                .into_iter()
                .filter_map(|v| match serde_json::from_value::<TradeRecord>(v) {
                    Ok(t) => Some(t),
                    Err(err) => {
                        debug!(%err, "dropping trade row");
                        None
                    }
                })
                .collect()
        }))
    }

    pub fn indicators<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TechnicalIndicators>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(v @ Value::Object(_)) => match serde_json::from_value(v) {
                Ok(ti) => Some(ti),
                Err(err) => {
                    debug!(%err, "ignoring technical_indicators");
                    None
                }
            },
            _ => None,
        })
    }

    pub fn object<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Map<String, Value>>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        })
    }

    /// Numbers or numeric strings; anything else reads as missing.
    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(coerce_f64))
    }

    /// Strings as-is, numbers in their decimal form, anything else empty.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    fn kind_of(v: &Value) -> &'static str {
        match v {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
