//! Date/time card: today's date, a fixed "posted at" label, and the live
//! time.

use crate::ticker::Ticker;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use marketx_core::{
    config::ClockConfig,
    document::{Document, SharedDocument},
    error::MarketxError,
};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Slot showing the current date.
pub const DATE_ID: &str = "date";
/// Slot showing the fixed posted time.
pub const POSTED_TIME_ID: &str = "time-post";
/// Slot showing the current time.
pub const TIME_ID: &str = "time";

/// Formats and writes the clock slots.
#[derive(Debug, Clone)]
pub struct ClockDisplay {
    date_format: String,
    time_format: String,
    posted_time: String,
}

impl ClockDisplay {
    /// Build from config, rejecting format strings chrono can't render.
    pub fn from_config(cfg: &ClockConfig) -> Result<Self, MarketxError> {
        check_format("clock.date_format", &cfg.date_format)?;
        check_format("clock.time_format", &cfg.time_format)?;
        Ok(Self {
            date_format: cfg.date_format.clone(),
            time_format: cfg.time_format.clone(),
            posted_time: cfg.posted_time.clone(),
        })
    }

    pub fn format_date(&self, now: &NaiveDateTime) -> String {
        now.format(&self.date_format).to_string()
    }

    pub fn format_time(&self, now: &NaiveDateTime) -> String {
        now.format(&self.time_format).to_string()
    }

    /// Write all three slots for `now`. Returns how many were on the page.
    pub fn update(&self, doc: &mut dyn Document, now: &NaiveDateTime) -> usize {
        let slots = [
            (DATE_ID, self.format_date(now)),
            (POSTED_TIME_ID, self.posted_time.clone()),
            (TIME_ID, self.format_time(now)),
        ];
        slots
            .iter()
            .filter(|(id, text)| doc.set_text(id, text))
            .count()
    }
}

fn check_format(key: &str, format: &str) -> Result<(), MarketxError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(MarketxError::Config(format!(
            "{key}: invalid format string '{format}'"
        )));
    }
    Ok(())
}

/// Update the clock now and then every `period` using local time.
pub fn spawn_clock<D: Document + 'static>(
    display: Arc<ClockDisplay>,
    doc: SharedDocument<D>,
    period: Duration,
) -> Ticker {
    Ticker::spawn("clock", period, move || {
        let display = display.clone();
        let doc = doc.clone();
        async move {
            let now = chrono::Local::now().naive_local();
            let written = display.update(&mut *doc.lock().await, &now);
            if written == 0 {
                debug!("clock: no clock slots on page");
            }
            ControlFlow::Continue(())
        }
    })
}
