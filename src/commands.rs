//! Console commands for a running site. Each maps to one page interaction.

use crate::site::Site;
use marketx_content::effects::Intersection;
use marketx_core::document::Document;
use marketx_core::language::Language;
use marketx_feed::clock::{DATE_ID, POSTED_TIME_ID, TIME_ID};
use marketx_feed::{Commodity, RefreshOutcome};

/// Known console commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle the language, or switch to the named one.
    Language(Option<String>),
    /// Toggle the mobile menu.
    Menu,
    /// Sections scrolled into view for the reveal effect only.
    Reveal(Vec<String>),
    /// Sections currently in view: reveal and nav highlighting.
    Scroll(Vec<String>),
    /// Refresh prices now.
    Prices,
    /// Print the live page state.
    Show,
    Help,
}

impl Command {
    /// Parse a console line. Returns `None` for anything that isn't a known
    /// `/` command.
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let cmd = words.next()?;
        let args: Vec<String> = words.map(str::to_string).collect();
        match cmd {
            "/lang" | "/language" => Some(Self::Language(args.into_iter().next())),
            "/menu" => Some(Self::Menu),
            "/reveal" => Some(Self::Reveal(args)),
            "/scroll" => Some(Self::Scroll(args)),
            "/prices" => Some(Self::Prices),
            "/show" => Some(Self::Show),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Run a command against the site and return the response text.
pub async fn handle(cmd: Command, site: &mut Site) -> String {
    match cmd {
        Command::Language(arg) => handle_language(site, arg.as_deref()).await,
        Command::Menu => {
            if site.toggle_menu().await {
                "Menu opened.".to_string()
            } else {
                "Menu closed.".to_string()
            }
        }
        Command::Reveal(ids) => handle_reveal(site, &ids).await,
        Command::Scroll(ids) => handle_scroll(site, &ids).await,
        Command::Prices => handle_prices(site).await,
        Command::Show => handle_show(site).await,
        Command::Help => handle_help(),
    }
}

async fn handle_language(site: &mut Site, arg: Option<&str>) -> String {
    let report = match arg {
        None => site.toggle_language().await,
        Some(code) => match code.parse::<Language>() {
            Ok(lang) => site.set_language(lang).await,
            Err(e) => return format!("Error: {e}"),
        },
    };
    format!(
        "Language: {} [{}] ({} slots, {} not on page)",
        report.language.display_name(),
        report.language,
        report.written,
        report.missing.len()
    )
}

async fn handle_reveal(site: &mut Site, ids: &[String]) -> String {
    if ids.is_empty() {
        return "Usage: /reveal <section-id>...".to_string();
    }
    let entries: Vec<Intersection> = ids.iter().map(|id| Intersection::entering(id)).collect();
    let revealed = site.reveal(&entries).await;
    if revealed.is_empty() {
        "Nothing new revealed.".to_string()
    } else {
        format!("Revealed: {}", revealed.join(", "))
    }
}

async fn handle_scroll(site: &mut Site, ids: &[String]) -> String {
    let entries: Vec<Intersection> = ids.iter().map(|id| Intersection::entering(id)).collect();
    let (revealed, active) = site.intersect(&entries).await;
    let mut out = String::new();
    if !revealed.is_empty() {
        out.push_str(&format!("Revealed: {}\n", revealed.join(", ")));
    }
    if active.is_empty() {
        out.push_str("Active nav: none");
    } else {
        out.push_str(&format!("Active nav: {}", active.join(", ")));
    }
    out
}

async fn handle_prices(site: &Site) -> String {
    let outcome = site.refresh_prices().await;
    let page = site.snapshot().await;
    let mut out = String::from("Gold prices\n");
    for commodity in Commodity::ALL {
        out.push_str(&format!(
            "  {}: {}\n",
            commodity.key(),
            page.text(commodity.slot_id()).unwrap_or("-")
        ));
    }
    match outcome {
        RefreshOutcome::Complete => {}
        RefreshOutcome::Partial(missing) => {
            let keys: Vec<&str> = missing.iter().map(|c| c.key()).collect();
            out.push_str(&format!("Unavailable: {}\n", keys.join(", ")));
        }
        RefreshOutcome::Failed(e) => out.push_str(&format!("Feed error: {e}\n")),
    }
    out.trim_end().to_string()
}

async fn handle_show(site: &Site) -> String {
    let page = site.snapshot().await;
    let text = |id: &str| page.text(id).unwrap_or("-").to_string();
    let prices: Vec<String> = Commodity::ALL
        .iter()
        .map(|c| format!("{} {}", c.key(), text(c.slot_id())))
        .collect();
    format!(
        "{}\n\
         Language: {}\n\
         Menu: {}\n\
         Date: {} | Posted: {} | Now: {}\n\
         Prices: {}\n\
         Hero: {}",
        site.name(),
        site.language().display_name(),
        if page.has_class(site.menu_id(), "active") {
            "open"
        } else {
            "closed"
        },
        text(DATE_ID),
        text(POSTED_TIME_ID),
        text(TIME_ID),
        prices.join(", "),
        text("hero-subtext"),
    )
}

fn handle_help() -> String {
    "Commands\n\
     /lang [ENG|KH]      Toggle or set the page language\n\
     /menu               Toggle the mobile menu\n\
     /reveal <id>...     Scroll sections into view (reveal only)\n\
     /scroll <id>...     Sections in view (reveal and nav highlight)\n\
     /prices             Refresh gold prices now\n\
     /show               Print the live page state\n\
     /help               Show this message"
        .to_string()
}
