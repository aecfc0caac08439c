//! Screen navigation state machine.
//!
//! ```text
//!  home --select league--> clubs --select club--> kits
//!  home <------back------- clubs <-----back------ kits
//!  search --select league--> clubs, search --select club--> kits
//!  any non-admin view --tab--> home | search | favorites | profile
//!  admin --exit--> home
//! ```
//!
//! `admin` is only reachable through an entry request carrying a valid
//! access key.

use std::fmt;

use serde::Serialize;

use crate::auth::AccessGate;
use crate::models::Club;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Home,
    Clubs,
    Kits,
    Search,
    Favorites,
    Profile,
    Admin,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            View::Home => "home",
            View::Clubs => "clubs",
            View::Kits => "kits",
            View::Search => "search",
            View::Favorites => "favorites",
            View::Profile => "profile",
            View::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

/// Views reachable from the persistent navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Search,
    Favorites,
    Profile,
}

impl From<Tab> for View {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::Home => View::Home,
            Tab::Search => View::Search,
            Tab::Favorites => View::Favorites,
            Tab::Profile => View::Profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    InvalidTransition { from: View, action: &'static str },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::InvalidTransition { from, action } => {
                write!(f, "Cannot {} from the {} view", action, from)
            }
        }
    }
}

impl std::error::Error for NavError {}

/// The initial navigation request: a path plus an optional access key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryRequest {
    pub path: String,
    pub key: Option<String>,
}

impl EntryRequest {
    /// Parses `path?key=value` style input. Other query parameters are
    /// ignored.
    pub fn parse(input: &str) -> Self {
        let (path, query) = input.split_once('?').unwrap_or((input, ""));
        let key = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == "key")
            .map(|(_, value)| {
                urlencoding::decode(value)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.to_string())
            });
        Self {
            path: path.to_string(),
            key,
        }
    }

    pub fn is_admin_path(&self) -> bool {
        self.path.to_lowercase().contains("/admin")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    view: View,
    selected_league: Option<String>,
    selected_club: Option<String>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Starts at `home` with nothing selected.
    pub fn new() -> Self {
        Self {
            view: View::Home,
            selected_league: None,
            selected_club: None,
        }
    }

    /// Starts at `admin` when the request targets the admin path with a
    /// valid key, otherwise at `home`.
    pub fn from_entry(request: &EntryRequest, access: &AccessGate) -> Self {
        let mut navigator = Self::new();
        if request.is_admin_path() {
            if access.validate(request.key.as_deref()) {
                navigator.view = View::Admin;
            } else {
                tracing::warn!("Invalid admin access key, starting at home");
            }
        }
        navigator
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected_league(&self) -> Option<&str> {
        self.selected_league.as_deref()
    }

    pub fn selected_club(&self) -> Option<&str> {
        self.selected_club.as_deref()
    }

    pub fn select_league(&mut self, league_id: &str) -> Result<(), NavError> {
        self.expect(&[View::Home, View::Search], "select a league")?;
        self.selected_league = Some(league_id.to_string());
        self.selected_club = None;
        self.view = View::Clubs;
        Ok(())
    }

    /// Opens a club's kits. The club's league becomes the selected league
    /// so that going back lands on its club list.
    pub fn select_club(&mut self, club: &Club) -> Result<(), NavError> {
        self.expect(&[View::Clubs, View::Search], "select a club")?;
        if self.view == View::Search || self.selected_league.is_none() {
            self.selected_league = Some(club.league_id.clone());
        }
        self.selected_club = Some(club.id.clone());
        self.view = View::Kits;
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), NavError> {
        match self.view {
            View::Kits => {
                self.selected_club = None;
                self.view = View::Clubs;
                Ok(())
            }
            View::Clubs => {
                self.selected_league = None;
                self.view = View::Home;
                Ok(())
            }
            from => Err(NavError::InvalidTransition {
                from,
                action: "go back",
            }),
        }
    }

    /// Switches to a navigation-bar view. Selections are kept.
    pub fn switch_tab(&mut self, tab: Tab) -> Result<(), NavError> {
        if self.view == View::Admin {
            return Err(NavError::InvalidTransition {
                from: View::Admin,
                action: "switch tabs",
            });
        }
        self.view = tab.into();
        Ok(())
    }

    /// Leaves `admin` for `home`, clearing selections.
    pub fn exit_admin(&mut self) -> Result<(), NavError> {
        self.expect(&[View::Admin], "exit admin")?;
        *self = Self::new();
        Ok(())
    }

    fn expect(&self, allowed: &[View], action: &'static str) -> Result<(), NavError> {
        if allowed.contains(&self.view) {
            Ok(())
        } else {
            Err(NavError::InvalidTransition {
                from: self.view,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_catalog;

    fn club(id: &str) -> Club {
        seed_catalog()
            .clubs
            .into_iter()
            .find(|c| c.id == id)
            .unwrap()
    }

    fn gate() -> AccessGate {
        AccessGate::new(Some("letmein".to_string()))
    }

    #[test]
    fn test_initial_state() {
        let nav = Navigator::new();
        assert_eq!(nav.view(), View::Home);
        assert_eq!(nav.selected_league(), None);
        assert_eq!(nav.selected_club(), None);
    }

    #[test]
    fn test_drill_down_and_back() {
        let mut nav = Navigator::new();
        nav.select_league("premier-league").unwrap();
        assert_eq!(nav.view(), View::Clubs);

        nav.select_club(&club("arsenal")).unwrap();
        assert_eq!(nav.view(), View::Kits);
        assert_eq!(nav.selected_club(), Some("arsenal"));

        nav.back().unwrap();
        assert_eq!(nav.view(), View::Clubs);
        assert_eq!(nav.selected_club(), None);
        assert_eq!(nav.selected_league(), Some("premier-league"));

        nav.back().unwrap();
        assert_eq!(nav.view(), View::Home);
        assert_eq!(nav.selected_league(), None);
    }

    #[test]
    fn test_invalid_transitions_leave_state_unchanged() {
        let mut nav = Navigator::new();
        let err = nav.back().unwrap_err();
        assert_eq!(
            err,
            NavError::InvalidTransition {
                from: View::Home,
                action: "go back"
            }
        );
        assert_eq!(err.to_string(), "Cannot go back from the home view");

        assert!(nav.select_club(&club("arsenal")).is_err());
        assert_eq!(nav, Navigator::new());
    }

    #[test]
    fn test_tabs_keep_selection() {
        let mut nav = Navigator::new();
        nav.select_league("la-liga").unwrap();
        nav.switch_tab(Tab::Favorites).unwrap();

        assert_eq!(nav.view(), View::Favorites);
        assert_eq!(nav.selected_league(), Some("la-liga"));
        assert!(nav.back().is_err());
    }

    #[test]
    fn test_search_can_open_league_or_club() {
        let mut nav = Navigator::new();
        nav.switch_tab(Tab::Search).unwrap();
        nav.select_club(&club("juventus")).unwrap();

        assert_eq!(nav.view(), View::Kits);
        assert_eq!(nav.selected_league(), Some("serie-a"));

        nav.back().unwrap();
        assert_eq!(nav.view(), View::Clubs);

        let mut nav = Navigator::new();
        nav.switch_tab(Tab::Search).unwrap();
        nav.select_league("bundesliga").unwrap();
        assert_eq!(nav.view(), View::Clubs);
    }

    #[test]
    fn test_entry_request_parse() {
        let request = EntryRequest::parse("/Admin?x=1&key=let%20me");
        assert_eq!(request.path, "/Admin");
        assert_eq!(request.key.as_deref(), Some("let me"));
        assert!(request.is_admin_path());

        let plain = EntryRequest::parse("/");
        assert_eq!(plain.key, None);
        assert!(!plain.is_admin_path());
    }

    #[test]
    fn test_admin_entry_requires_valid_key() {
        let nav = Navigator::from_entry(&EntryRequest::parse("/admin?key=letmein"), &gate());
        assert_eq!(nav.view(), View::Admin);

        let nav = Navigator::from_entry(&EntryRequest::parse("/admin?key=nope"), &gate());
        assert_eq!(nav.view(), View::Home);

        let nav = Navigator::from_entry(&EntryRequest::parse("/?key=letmein"), &gate());
        assert_eq!(nav.view(), View::Home);
    }

    #[test]
    fn test_admin_is_not_a_tab_and_exits_home() {
        let mut nav = Navigator::from_entry(&EntryRequest::parse("/admin?key=letmein"), &gate());
        assert!(nav.switch_tab(Tab::Home).is_err());
        assert!(nav.back().is_err());

        nav.exit_admin().unwrap();
        assert_eq!(nav, Navigator::new());
        assert!(nav.exit_admin().is_err());
    }
}
