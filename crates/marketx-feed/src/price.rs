//! Gold price feed: fetch a three-commodity snapshot and write it into the
//! price card.
//!
//! Fields are formatted independently: one bad field shows its placeholder
//! while the others still display. Only a failed request or an unreadable
//! body blanks the whole card.

use crate::ticker::Ticker;
use async_trait::async_trait;
use marketx_core::{
    config::FeedConfig,
    document::{Document, SharedDocument},
    error::MarketxError,
};
use serde::Deserialize;
use serde_json::Value;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Prefix written before every displayed price.
pub const CURRENCY_MARKER: &str = "$ ";

/// The three prices on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Commodity {
    Bar,
    Phi,
    Nutiem,
}

impl Commodity {
    pub const ALL: [Commodity; 3] = [Commodity::Bar, Commodity::Phi, Commodity::Nutiem];

    /// Key in the feed's JSON object.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Phi => "phi",
            Self::Nutiem => "nutiem",
        }
    }

    /// Page element showing this price.
    pub fn slot_id(&self) -> &'static str {
        match self {
            Self::Bar => "barPrice",
            Self::Phi => "phiPrice",
            Self::Nutiem => "nutiemPrice",
        }
    }

    /// Text shown when the price is unavailable.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Bar | Self::Phi => "---",
            Self::Nutiem => "Error",
        }
    }
}

/// Latest feed payload. Each field is a number, a numeric string, or absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriceSnapshot {
    #[serde(default)]
    pub bar: Option<Value>,
    #[serde(default)]
    pub phi: Option<Value>,
    #[serde(default)]
    pub nutiem: Option<Value>,
}

impl PriceSnapshot {
    pub fn field(&self, commodity: Commodity) -> Option<&Value> {
        match commodity {
            Commodity::Bar => self.bar.as_ref(),
            Commodity::Phi => self.phi.as_ref(),
            Commodity::Nutiem => self.nutiem.as_ref(),
        }
    }
}

/// Drop the fractional part of a price without rounding.
///
/// Numbers truncate toward zero; strings keep everything before the first
/// `.`. Returns `None` for anything that isn't a usable number.
pub fn format_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i.to_string());
            }
            if let Some(u) = n.as_u64() {
                return Some(u.to_string());
            }
            let f = n.as_f64()?;
            if !f.is_finite() {
                return None;
            }
            let whole = f.trunc();
            if whole.abs() < i64::MAX as f64 {
                Some((whole as i64).to_string())
            } else {
                Some(format!("{whole:.0}"))
            }
        }
        Value::String(s) => {
            let prefix = s.trim().split('.').next().unwrap_or_default();
            let digits = prefix.strip_prefix(['-', '+']).unwrap_or(prefix);
            let numeric = digits.chars().any(|c| c.is_ascii_digit())
                && digits.chars().all(|c| c.is_ascii_digit() || c == ',');
            numeric.then(|| prefix.to_string())
        }
        _ => None,
    }
}

/// Where price snapshots come from.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Human-readable source name.
    fn name(&self) -> &str;

    /// Fetch the latest snapshot.
    async fn fetch(&self) -> Result<PriceSnapshot, MarketxError>;
}

/// Price source backed by a JSON HTTP endpoint.
pub struct HttpPriceSource {
    client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpPriceSource {
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            timeout: None,
        }
    }

    /// Create from config values. A zero timeout means none.
    pub fn from_config(cfg: &FeedConfig) -> Self {
        let mut source = Self::new(&cfg.url);
        if cfg.timeout_secs > 0 {
            source.timeout = Some(Duration::from_secs(cfg.timeout_secs));
        }
        source
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self) -> Result<PriceSnapshot, MarketxError> {
        let mut req = self.client.get(&self.url);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| MarketxError::Feed(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(MarketxError::Feed(format!("feed error {status}: {body}")));
        }

        resp.json::<PriceSnapshot>()
            .await
            .map_err(|e| MarketxError::Feed(format!("response parse failed: {e}")))
    }
}

/// Result of one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// All three prices displayed.
    Complete,
    /// These fields fell back to their placeholder; the rest displayed.
    Partial(Vec<Commodity>),
    /// Request or payload failed; every slot shows its placeholder.
    Failed(String),
}

/// Write a fetch result from the source named `source` into the price
/// slots.
pub fn apply_snapshot(
    source: &str,
    doc: &mut dyn Document,
    result: &Result<PriceSnapshot, MarketxError>,
) -> RefreshOutcome {
    let snapshot = match result {
        Ok(s) => s,
        Err(e) => {
            error!("feed: {source}: error loading gold price data: {e}");
            for commodity in Commodity::ALL {
                doc.set_text(commodity.slot_id(), commodity.placeholder());
            }
            return RefreshOutcome::Failed(e.to_string());
        }
    };

    let mut degraded = Vec::new();
    for commodity in Commodity::ALL {
        let text = match snapshot.field(commodity).and_then(format_value) {
            Some(value) => format!("{CURRENCY_MARKER}{value}"),
            None => {
                warn!(
                    "feed: {source}: '{}' missing or not a number: {:?}",
                    commodity.key(),
                    snapshot.field(commodity)
                );
                degraded.push(commodity);
                commodity.placeholder().to_string()
            }
        };
        if !doc.set_text(commodity.slot_id(), &text) {
            debug!("feed: '{}' not on page", commodity.slot_id());
        }
    }

    if degraded.is_empty() {
        info!("feed: {source}: prices updated");
        RefreshOutcome::Complete
    } else {
        RefreshOutcome::Partial(degraded)
    }
}

/// Fetch once and write the result. Never fails; failures become
/// placeholders.
///
/// The document is locked only after the request completes, so a slow
/// request never blocks other writers.
pub async fn refresh_prices<D: Document>(
    source: &dyn PriceSource,
    doc: &Mutex<D>,
) -> RefreshOutcome {
    let result = source.fetch().await;
    let mut doc = doc.lock().await;
    apply_snapshot(source.name(), &mut *doc, &result)
}

/// Refresh now and then every `period` until the ticker is stopped.
///
/// Each refresh runs as its own task, so a hung request doesn't hold back
/// the next tick. Stopping the ticker aborts requests still in flight.
pub fn spawn_price_poller<D: Document + 'static>(
    source: Arc<dyn PriceSource>,
    doc: SharedDocument<D>,
    period: Duration,
) -> Ticker {
    let mut in_flight: JoinSet<RefreshOutcome> = JoinSet::new();
    Ticker::spawn("feed", period, move || {
        while let Some(done) = in_flight.try_join_next() {
            if let Err(e) = done {
                warn!("feed: {}: refresh task failed: {e}", source.name());
            }
        }
        if !in_flight.is_empty() {
            debug!("feed: {} refresh(es) still in flight", in_flight.len());
        }

        let source = source.clone();
        let doc = doc.clone();
        in_flight.spawn(async move { refresh_prices(&*source, &*doc).await });
        async { ControlFlow::Continue(()) }
    })
}
