//! The running landing page: one shared document plus everything that
//! writes to it.

use crate::commands::{self, Command};
use marketx_content::effects::{
    Intersection, MobileMenu, NavHighlighter, ScrollReveal, Typewriter, NAV_MENU_LINKS,
    REVEAL_TARGETS, TYPEWRITER_TARGET,
};
use marketx_content::{ContentRenderer, RenderReport, TranslationTable};
use marketx_core::{
    config::Config,
    document::{Element, Page, SharedDocument},
    error::MarketxError,
    language::Language,
};
use marketx_feed::clock::{self, ClockDisplay};
use marketx_feed::{
    refresh_prices, spawn_clock, spawn_price_poller, Commodity, HttpPriceSource, PriceSource,
    RefreshOutcome, Ticker,
};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Text in the price slots before the first refresh.
const PRICE_LOADING: &str = "...";

/// Build a page with every element the runtime writes to.
///
/// Content slots start with their English copy, as served.
pub fn landing_page(table: &TranslationTable) -> Page {
    let mut page = Page::new()
        .with_element("body", "")
        .with_element("lang-eng", Language::English.code())
        .with_element("lang-kh", Language::Khmer.code())
        .with_element("nav-menu", "")
        .with_element("mobile-menu-button", "");

    for id in REVEAL_TARGETS {
        page.insert(id, Element::default());
    }
    for link in NAV_MENU_LINKS {
        page.insert(link, Element::default());
    }
    for commodity in Commodity::ALL {
        page.insert(commodity.slot_id(), Element::new(PRICE_LOADING));
    }
    for id in [clock::DATE_ID, clock::POSTED_TIME_ID, clock::TIME_ID] {
        page.insert(id, Element::default());
    }
    for (slot, entry) in table.slots() {
        page.insert(slot, Element::new(entry.get(Language::English)));
    }
    page
}

/// Owned context for one running page.
pub struct Site {
    config: Config,
    doc: SharedDocument,
    renderer: ContentRenderer,
    menu: MobileMenu,
    reveal: ScrollReveal,
    nav: NavHighlighter,
    source: Arc<dyn PriceSource>,
    clock: Arc<ClockDisplay>,
    tickers: Vec<Ticker>,
    started: bool,
}

impl Site {
    /// Assemble a site around an existing page and price source.
    pub fn new(
        config: Config,
        table: TranslationTable,
        page: Page,
        source: Arc<dyn PriceSource>,
    ) -> Result<Self, MarketxError> {
        let clock = Arc::new(ClockDisplay::from_config(&config.clock)?);
        Ok(Self {
            config,
            doc: Arc::new(Mutex::new(page)),
            renderer: ContentRenderer::new(table),
            menu: MobileMenu::landing(),
            reveal: ScrollReveal::new(),
            nav: NavHighlighter::landing(),
            source,
            clock,
            tickers: Vec::new(),
            started: false,
        })
    }

    /// Build the landing page from config: translation table, HTTP feed.
    pub fn from_config(config: Config) -> Result<Self, MarketxError> {
        let table = TranslationTable::load(config.site.translations.as_deref())?;
        let page = landing_page(&table);
        let source: Arc<dyn PriceSource> = Arc::new(HttpPriceSource::from_config(&config.feed));
        Self::new(config, table, page, source)
    }

    pub fn name(&self) -> &str {
        &self.config.site.name
    }

    pub fn language(&self) -> Language {
        self.renderer.current()
    }

    pub fn menu_id(&self) -> &str {
        self.menu.menu_id()
    }

    /// Number of running background loops.
    pub fn running(&self) -> usize {
        self.tickers.iter().filter(|t| !t.is_finished()).count()
    }

    /// Render English, install the effects, and start the background loops.
    ///
    /// Starting a running site changes nothing and reports the current
    /// language.
    pub async fn start(&mut self) -> RenderReport {
        if self.started {
            warn!("site: {} already started", self.config.site.name);
            let mut doc = self.doc.lock().await;
            let language = self.renderer.current();
            return self.renderer.render(&mut *doc, language);
        }
        self.started = true;

        let report = {
            let mut doc = self.doc.lock().await;
            let report = self.renderer.render(&mut *doc, Language::English);
            self.menu.install(&mut *doc);
            let observed = self.reveal.observe(&mut *doc, REVEAL_TARGETS);
            debug!("site: observing {observed} sections for reveal");
            report
        };

        if self.config.clock.enabled {
            self.tickers.push(spawn_clock(
                self.clock.clone(),
                self.doc.clone(),
                Duration::from_secs(self.config.clock.interval_secs),
            ));
        }
        if self.config.feed.enabled {
            self.tickers.push(spawn_price_poller(
                self.source.clone(),
                self.doc.clone(),
                Duration::from_secs(self.config.feed.interval_secs),
            ));
        }
        if self.config.effects.typewriter {
            match self.spawn_typewriter().await {
                Some(ticker) => self.tickers.push(ticker),
                None => debug!("site: '{TYPEWRITER_TARGET}' not on page, typewriter skipped"),
            }
        }

        info!(
            "site: {} started | {} | {} loops",
            self.config.site.name,
            report.language,
            self.running()
        );
        report
    }

    async fn spawn_typewriter(&self) -> Option<Ticker> {
        let mut typewriter = {
            let mut doc = self.doc.lock().await;
            Typewriter::start(&mut *doc, TYPEWRITER_TARGET)?
        };
        let doc = self.doc.clone();
        let period = Duration::from_millis(self.config.effects.typewriter_ms);
        Some(Ticker::spawn("typewriter", period, move || {
            // A busy document skips this frame instead of queueing behind it.
            let flow = match doc.try_lock() {
                Ok(mut page) => {
                    if typewriter.step(&mut *page) {
                        ControlFlow::Continue(())
                    } else {
                        ControlFlow::Break(())
                    }
                }
                Err(_) => ControlFlow::Continue(()),
            };
            std::future::ready(flow)
        }))
    }

    /// Stop every background loop.
    pub fn stop(&mut self) {
        for ticker in self.tickers.drain(..) {
            ticker.stop();
        }
        self.started = false;
        info!("site: stopped");
    }

    /// Flip between English and Khmer.
    pub async fn toggle_language(&mut self) -> RenderReport {
        let mut doc = self.doc.lock().await;
        self.renderer.toggle(&mut *doc)
    }

    pub async fn set_language(&mut self, language: Language) -> RenderReport {
        let mut doc = self.doc.lock().await;
        self.renderer.render(&mut *doc, language)
    }

    /// Toggle the mobile menu. Returns whether it is open.
    pub async fn toggle_menu(&self) -> bool {
        let mut doc = self.doc.lock().await;
        self.menu.toggle(&mut *doc)
    }

    /// Feed an intersection batch to the reveal effect only.
    pub async fn reveal(&mut self, entries: &[Intersection]) -> Vec<String> {
        let mut doc = self.doc.lock().await;
        self.reveal.on_intersect(&mut *doc, entries)
    }

    /// Feed an intersection batch to both the reveal effect and the nav
    /// highlighter. Returns (revealed sections, active nav links).
    pub async fn intersect(&mut self, entries: &[Intersection]) -> (Vec<String>, Vec<String>) {
        let mut doc = self.doc.lock().await;
        let revealed = self.reveal.on_intersect(&mut *doc, entries);
        let active = self.nav.on_intersect(&mut *doc, entries);
        (revealed, active)
    }

    /// One price refresh outside the poller's schedule.
    pub async fn refresh_prices(&self) -> RefreshOutcome {
        refresh_prices(&*self.source, &*self.doc).await
    }

    /// Copy of the current page.
    pub async fn snapshot(&self) -> Page {
        self.doc.lock().await.clone()
    }

    /// Serve console commands from stdin until Ctrl-C or end of input.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{} is live. Type /help for commands.", self.config.site.name);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            let line = line.trim();
                            if line.is_empty() {
                                continue;
                            }
                            match Command::parse(line) {
                                Some(cmd) => println!("{}", commands::handle(cmd, self).await),
                                None => println!("Unknown command: {line} (try /help)"),
                            }
                        }
                        Ok(None) => {
                            info!("site: console closed, waiting for shutdown signal");
                            tokio::signal::ctrl_c().await?;
                            info!("Received shutdown signal");
                            break;
                        }
                        Err(e) => {
                            warn!("site: console read failed: {e}");
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.stop();
        Ok(())
    }
}

#[cfg(test)]
mod tests;
