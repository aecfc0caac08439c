//! Interactive catalog browser driven by line commands on stdin.

use clap::Args;
use std::io::{self, BufRead, Write};

use kitvault_core::{CatalogStore, EntryRequest, FavoritesStore, Kit, Navigator, Tab, View};

use crate::app::App;

const HELP: &str =
    "Commands: open <n>, back, search <query>, fav <n>, home, favorites, profile, exit, quit";

/// Browse the catalog interactively
#[derive(Args)]
pub struct BrowseCommand {
    /// Entry path, e.g. "/admin?key=..." to open the admin view
    #[arg(long, default_value = "/")]
    entry: String,
}

impl BrowseCommand {
    pub fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let request = EntryRequest::parse(&self.entry);
        let mut browser = Browser::new(
            &app.store,
            app.favorites(),
            Navigator::from_entry(&request, app.admin.access()),
            app.admin.is_authenticated(),
        );

        let stdin = io::stdin();
        let stdout = io::stdout();
        browser.run(stdin.lock(), stdout.lock())?;
        Ok(())
    }
}

/// An item that `open <n>` can select.
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    League(String),
    Club(String),
    Kit(String),
}

struct Browser<'a> {
    store: &'a CatalogStore,
    favorites: FavoritesStore,
    nav: Navigator,
    is_admin: bool,
    query: String,
    entries: Vec<Entry>,
}

impl<'a> Browser<'a> {
    fn new(
        store: &'a CatalogStore,
        favorites: FavoritesStore,
        nav: Navigator,
        is_admin: bool,
    ) -> Self {
        Self {
            store,
            favorites,
            nav,
            is_admin,
            query: String::new(),
            entries: Vec::new(),
        }
    }

    fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", HELP)?;
        self.render(&mut out)?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "q" {
                break;
            }
            match self.handle(line) {
                Ok(()) => self.render(&mut out)?,
                Err(message) => writeln!(out, "! {}", message)?,
            }
        }
        Ok(())
    }

    fn handle(&mut self, line: &str) -> Result<(), String> {
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        match command {
            "open" => {
                let store = self.store;
                let result = match self.entry(arg)? {
                    Entry::League(id) => self.nav.select_league(&id),
                    Entry::Club(id) => {
                        let club = store
                            .get_club(&id)
                            .ok_or_else(|| format!("Club not found: {}", id))?;
                        self.nav.select_club(club)
                    }
                    Entry::Kit(_) => return Err("Kits have no detail view".to_string()),
                };
                result.map_err(|e| e.to_string())
            }
            "fav" => match self.entry(arg)? {
                Entry::Kit(id) => {
                    self.favorites.toggle(&id);
                    Ok(())
                }
                _ => Err("Only kits can be favorites".to_string()),
            },
            "back" => self.nav.back().map_err(|e| e.to_string()),
            "search" => {
                self.nav.switch_tab(Tab::Search).map_err(|e| e.to_string())?;
                self.query = arg.to_string();
                Ok(())
            }
            "home" => self.nav.switch_tab(Tab::Home).map_err(|e| e.to_string()),
            "favorites" => self
                .nav
                .switch_tab(Tab::Favorites)
                .map_err(|e| e.to_string()),
            "profile" => self.nav.switch_tab(Tab::Profile).map_err(|e| e.to_string()),
            "exit" => self.nav.exit_admin().map_err(|e| e.to_string()),
            "help" => Err(HELP.to_string()),
            other => Err(format!("Unknown command '{}'. {}", other, HELP)),
        }
    }

    fn entry(&self, arg: &str) -> Result<Entry, String> {
        let index: usize = arg
            .parse()
            .map_err(|_| format!("Expected an item number, got '{}'", arg))?;
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .cloned()
            .ok_or_else(|| format!("No item {}", index))
    }

    fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let store = self.store;
        self.entries.clear();
        writeln!(out)?;

        match self.nav.view() {
            View::Home => {
                let settings = store.settings();
                writeln!(out, "{}", settings.app_name)?;
                writeln!(out, "{}", settings.welcome_text)?;
                for league in store.leagues_sorted() {
                    self.entries.push(Entry::League(league.id.clone()));
                    let clubs = store.clubs_by_league(&league.id).len();
                    writeln!(
                        out,
                        "{:>3}. {} ({} clubs)",
                        self.entries.len(),
                        league.name,
                        clubs
                    )?;
                }
            }
            View::Clubs => {
                let league_id = self.nav.selected_league().unwrap_or_default();
                writeln!(out, "{}", store.league_name(league_id))?;
                let mut clubs = store.clubs_by_league(league_id);
                CatalogStore::sort_clubs(&mut clubs);
                if clubs.is_empty() {
                    writeln!(out, "  No clubs yet")?;
                }
                for club in clubs {
                    self.entries.push(Entry::Club(club.id.clone()));
                    let kits = store.kits_by_club(&club.id).len();
                    writeln!(
                        out,
                        "{:>3}. {} ({} kits)",
                        self.entries.len(),
                        club.name,
                        kits
                    )?;
                }
            }
            View::Kits => {
                let club_id = self.nav.selected_club().unwrap_or_default();
                writeln!(out, "{}", store.club_name(club_id))?;
                let mut kits = store.kits_by_club(club_id);
                CatalogStore::sort_kits(&mut kits);
                if kits.is_empty() {
                    writeln!(out, "  No kits yet")?;
                }
                self.render_kits(out, &kits)?;
            }
            View::Search => {
                writeln!(out, "Search: {}", self.query)?;
                let results = store.search(&self.query);
                if results.is_empty() {
                    writeln!(out, "  No results")?;
                }
                for league in &results.leagues {
                    self.entries.push(Entry::League(league.id.clone()));
                    writeln!(out, "{:>3}. [league] {}", self.entries.len(), league.name)?;
                }
                for club in &results.clubs {
                    self.entries.push(Entry::Club(club.id.clone()));
                    writeln!(out, "{:>3}. [club] {}", self.entries.len(), club.name)?;
                }
                self.render_kits(out, &results.kits)?;
            }
            View::Favorites => {
                writeln!(out, "Favorites")?;
                let mut kits = self.favorites.resolve(store.kits());
                CatalogStore::sort_kits(&mut kits);
                if kits.is_empty() {
                    writeln!(out, "  No favorites yet")?;
                }
                self.render_kits(out, &kits)?;
            }
            View::Profile => {
                let settings = store.settings();
                let (leagues, clubs, kits) = store.catalog().counts();
                writeln!(out, "{} v{}", settings.app_name, settings.version)?;
                writeln!(out, "  {} leagues, {} clubs, {} kits", leagues, clubs, kits)?;
                writeln!(out, "  {} favorites", self.favorites.len())?;
            }
            View::Admin => {
                writeln!(out, "Admin")?;
                if self.is_admin {
                    let (leagues, clubs, kits) = store.catalog().counts();
                    writeln!(out, "  {} leagues, {} clubs, {} kits", leagues, clubs, kits)?;
                    writeln!(
                        out,
                        "  Pending changes: {}",
                        if store.has_pending_changes() { "yes" } else { "no" }
                    )?;
                } else {
                    writeln!(out, "  Login required: run 'kitvault admin login'")?;
                }
                writeln!(out, "  Type 'exit' to leave")?;
            }
        }
        Ok(())
    }

    fn render_kits<W: Write>(&mut self, out: &mut W, kits: &[&Kit]) -> io::Result<()> {
        let store = self.store;
        for kit in kits {
            self.entries.push(Entry::Kit(kit.id.clone()));
            let marker = if self.favorites.contains(&kit.id) { "*" } else { " " };
            writeln!(
                out,
                "{:>3}. {}{:<5} {} ({})",
                self.entries.len(),
                marker,
                kit.kit_type,
                kit.name,
                store.club_name(&kit.club_id)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitvault_core::AccessGate;

    fn browse<'a>(
        store: &'a CatalogStore,
        nav: Navigator,
        script: &str,
    ) -> (String, Browser<'a>) {
        let mut browser = Browser::new(store, FavoritesStore::in_memory(), nav, false);
        let mut out = Vec::new();
        browser.run(script.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), browser)
    }

    #[test]
    fn test_open_league_lists_clubs() {
        let store = CatalogStore::seeded();
        let (out, browser) = browse(&store, Navigator::new(), "open 1\n");

        assert_eq!(browser.nav.view(), View::Clubs);
        assert_eq!(browser.nav.selected_league(), Some("premier-league"));
        assert!(out.contains("Premier League"));
    }

    #[test]
    fn test_kits_view_lists_club_kits() {
        let store = CatalogStore::seeded();
        let (out, browser) = browse(&store, Navigator::new(), "search manchester city\nopen 1\n");

        assert_eq!(browser.nav.view(), View::Kits);
        assert_eq!(browser.nav.selected_club(), Some("man-city"));
        assert!(out.contains("Home  Manchester City Home 2024/25 (Manchester City)"));
        assert!(out.contains("Away  Manchester City Away 2024/25 (Manchester City)"));
    }

    #[test]
    fn test_back_from_kits_keeps_league() {
        let store = CatalogStore::seeded();
        let (_, browser) = browse(&store, Navigator::new(), "open 1\nopen 1\nback\n");

        assert_eq!(browser.nav.view(), View::Clubs);
        assert_eq!(browser.nav.selected_club(), None);
        assert!(browser.nav.selected_league().is_some());
    }

    #[test]
    fn test_search_then_open_club() {
        let store = CatalogStore::seeded();
        let (out, browser) = browse(&store, Navigator::new(), "search bayern\nopen 1\n");

        assert!(out.contains("[club] Bayern"));
        assert_eq!(browser.nav.view(), View::Kits);
        assert_eq!(browser.nav.selected_club(), Some("bayern"));
        assert_eq!(browser.nav.selected_league(), Some("bundesliga"));
    }

    #[test]
    fn test_toggle_favorite_from_search() {
        let store = CatalogStore::seeded();
        let script = "search psg home\nfav 1\nfavorites\n";
        let (out, browser) = browse(&store, Navigator::new(), script);

        assert!(browser.favorites.contains("psg-home-24"));
        assert_eq!(browser.nav.view(), View::Favorites);
        assert!(out.contains("*Home"));
    }

    #[test]
    fn test_invalid_commands_report_errors() {
        let store = CatalogStore::seeded();
        let script = "back\nopen 99\nexit\nquit\nopen 1\n";
        let (out, browser) = browse(&store, Navigator::new(), script);

        assert!(out.contains("! Cannot go back from the home view"));
        assert!(out.contains("! No item 99"));
        assert!(out.contains("! Cannot exit admin from the home view"));
        assert_eq!(browser.nav.view(), View::Home);
    }

    #[test]
    fn test_admin_entry_and_exit() {
        let store = CatalogStore::seeded();
        let access = AccessGate::new(Some("door".to_string()));
        let nav = Navigator::from_entry(&EntryRequest::parse("/admin?key=door"), &access);
        let (out, browser) = browse(&store, nav, "profile\nexit\n");

        assert!(out.contains("Login required"));
        assert!(out.contains("! Cannot switch tabs from the admin view"));
        assert_eq!(browser.nav.view(), View::Home);
    }
}
