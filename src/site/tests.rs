use super::*;
use async_trait::async_trait;
use marketx_content::effects::{MENU_CLOSED_GLYPH, MENU_OPEN_GLYPH};
use marketx_content::TranslationEntry;
use marketx_core::document::Document;
use marketx_feed::PriceSnapshot;
use serde_json::json;

struct FixedSource(Option<serde_json::Value>);

#[async_trait]
impl PriceSource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch(&self) -> Result<PriceSnapshot, MarketxError> {
        match &self.0 {
            Some(v) => Ok(serde_json::from_value(v.clone())?),
            None => Err(MarketxError::Feed("offline".into())),
        }
    }
}

fn fixed(payload: serde_json::Value) -> Arc<dyn PriceSource> {
    Arc::new(FixedSource(Some(payload)))
}

fn small_table() -> TranslationTable {
    let mut table = TranslationTable::new();
    table.insert("hero-subtext", TranslationEntry::new("Hi!", "\u{179f}\u{17bd}"));
    table.insert("nav-link-1", TranslationEntry::new("Home", "KH home"));
    table
}

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.effects.typewriter_ms = 5;
    config
}

fn small_site(config: Config, source: Arc<dyn PriceSource>) -> Site {
    let table = small_table();
    let page = landing_page(&table);
    Site::new(config, table, page, source).unwrap()
}

#[test]
fn test_landing_page_has_every_hook() {
    let table = TranslationTable::bundled().unwrap();
    let page = landing_page(&table);

    for id in ["body", "lang-eng", "lang-kh", "nav-menu", "mobile-menu-button"] {
        assert!(page.contains(id), "missing {id}");
    }
    for id in REVEAL_TARGETS {
        assert!(page.contains(id), "missing {id}");
    }
    for commodity in Commodity::ALL {
        assert_eq!(page.text(commodity.slot_id()), Some(PRICE_LOADING));
    }
    for (slot, entry) in table.slots() {
        assert_eq!(page.text(slot), Some(entry.get(Language::English)));
    }
    for id in NAV_MENU_LINKS {
        assert!(page.contains(id), "missing {id}");
    }
    assert!(page.contains(clock::TIME_ID));
}

#[test]
fn test_from_config_uses_bundled_table() {
    let site = Site::from_config(Config::default()).unwrap();
    assert_eq!(site.name(), "Market X Trader");
    assert_eq!(site.language(), Language::English);
}

#[test]
fn test_invalid_clock_format_fails() {
    let mut config = Config::default();
    config.clock.date_format = "%Q".into();
    assert!(Site::from_config(config).is_err());
}

#[tokio::test]
async fn test_start_renders_and_runs_loops() {
    let mut site = small_site(
        quiet_config(),
        fixed(json!({"bar": 2010.9, "phi": 150, "nutiem": "99.5"})),
    );

    let report = site.start().await;
    assert_eq!(report.language, Language::English);
    assert_eq!(site.running(), 3);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let page = site.snapshot().await;
    assert!(page.has_class("lang-eng", "active-lang"));
    assert_eq!(page.text("mobile-menu-button"), Some(MENU_CLOSED_GLYPH));
    assert!(page.has_class("hero-section", "fade-in"));
    assert_eq!(page.text("barPrice"), Some("$ 2010"));
    assert_eq!(page.text("phiPrice"), Some("$ 150"));
    assert_eq!(page.text("nutiemPrice"), Some("$ 99"));
    assert!(!page.text(clock::DATE_ID).unwrap_or_default().is_empty());
    assert!(page.text(clock::POSTED_TIME_ID).unwrap_or_default().starts_with("9:00"));

    site.stop();
    assert_eq!(site.running(), 0);
}

#[tokio::test]
async fn test_typewriter_reveals_hero_subtext() {
    let mut site = small_site(quiet_config(), fixed(json!({})));
    site.start().await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    let page = site.snapshot().await;
    assert_eq!(page.text("hero-subtext"), Some("Hi!"));
    assert!(page.has_class("hero-subtext", "blink"));
    site.stop();
}

#[tokio::test]
async fn test_disabled_loops_are_not_started() {
    let mut config = quiet_config();
    config.feed.enabled = false;
    config.clock.enabled = false;
    config.effects.typewriter = false;
    let mut site = small_site(config, fixed(json!({})));

    site.start().await;
    assert_eq!(site.running(), 0);
    let page = site.snapshot().await;
    assert_eq!(page.text("barPrice"), Some(PRICE_LOADING));
    assert_eq!(page.text("hero-subtext"), Some("Hi!"));
}

#[tokio::test]
async fn test_language_toggle_round_trip() {
    let mut config = quiet_config();
    config.effects.typewriter = false;
    let mut site = small_site(config, fixed(json!({})));
    site.start().await;

    let report = site.toggle_language().await;
    assert_eq!(report.language, Language::Khmer);
    let page = site.snapshot().await;
    assert_eq!(page.text("nav-link-1"), Some("KH home"));
    assert!(page.has_class("body", "lang-khmer-active"));
    assert!(page.has_class("lang-kh", "active-lang"));

    site.toggle_language().await;
    let page = site.snapshot().await;
    assert_eq!(page.text("nav-link-1"), Some("Home"));
    assert!(!page.has_class("body", "lang-khmer-active"));

    site.set_language(Language::Khmer).await;
    assert_eq!(site.language(), Language::Khmer);
    site.stop();
}

#[tokio::test]
async fn test_second_start_keeps_loops_and_language() {
    let mut site = small_site(quiet_config(), fixed(json!({"bar": 1})));
    site.start().await;
    assert_eq!(site.running(), 3);
    site.toggle_language().await;

    let report = site.start().await;
    assert_eq!(report.language, Language::Khmer);
    assert_eq!(site.language(), Language::Khmer);
    assert_eq!(site.running(), 3);
    assert_eq!(site.snapshot().await.text("nav-link-1"), Some("KH home"));

    // A stopped site can be started again.
    site.stop();
    site.start().await;
    assert_eq!(site.running(), 3);
    assert_eq!(site.language(), Language::English);
    site.stop();
}

#[tokio::test]
async fn test_menu_and_intersections() {
    let mut config = quiet_config();
    config.feed.enabled = false;
    config.clock.enabled = false;
    config.effects.typewriter = false;
    let mut site = small_site(config, fixed(json!({})));
    site.start().await;

    assert!(site.toggle_menu().await);
    assert_eq!(
        site.snapshot().await.text("mobile-menu-button"),
        Some(MENU_OPEN_GLYPH)
    );
    assert!(!site.toggle_menu().await);

    let revealed = site.reveal(&[Intersection::entering("site-footer")]).await;
    assert_eq!(revealed, vec!["site-footer".to_string()]);

    let (revealed, active) = site
        .intersect(&[Intersection::entering("course-section")])
        .await;
    assert_eq!(revealed, vec!["course-section".to_string()]);
    assert_eq!(active, vec!["nav-link-3".to_string()]);
    let page = site.snapshot().await;
    assert!(page.has_class("course-section", "visible"));
    assert!(page.has_class("nav-link-3", "active"));
}

#[tokio::test]
async fn test_manual_refresh_failure_shows_placeholders() {
    let mut config = quiet_config();
    config.feed.enabled = false;
    let site = small_site(config, Arc::new(FixedSource(None)));

    let outcome = site.refresh_prices().await;
    assert!(matches!(outcome, RefreshOutcome::Failed(_)));
    let page = site.snapshot().await;
    assert_eq!(page.text("barPrice"), Some("---"));
    assert_eq!(page.text("nutiemPrice"), Some("Error"));
}

#[tokio::test]
async fn test_console_commands_drive_site() {
    let mut config = quiet_config();
    config.feed.enabled = false;
    config.clock.enabled = false;
    config.effects.typewriter = false;
    let mut site = small_site(config, fixed(json!({"bar": 1, "phi": 2, "nutiem": 3})));
    site.start().await;

    let out = commands::handle(Command::Language(Some("KH".into())), &mut site).await;
    assert!(out.contains("[KH]"));
    let out = commands::handle(Command::Language(Some("fr".into())), &mut site).await;
    assert!(out.starts_with("Error"));
    assert_eq!(site.language(), Language::Khmer);

    let out = commands::handle(Command::Prices, &mut site).await;
    assert!(out.contains("bar: $ 1"));

    let out = commands::handle(Command::Scroll(vec!["team-section".into()]), &mut site).await;
    assert!(out.contains("nav-link-4"));

    let out = commands::handle(Command::Show, &mut site).await;
    assert!(out.contains("Market X Trader"));
    assert!(out.contains("Menu: closed"));
}
