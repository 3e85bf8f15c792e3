//! Page routing state machine and session state.
//!
//! Navigation can target any page, but `dashboard`, `transactions` and
//! `analytics` are only reachable with a signed-in user; anything else is
//! redirected to `login`. Every navigation advances an epoch so that network
//! responses issued for an earlier page can be recognised and dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Login,
    Register,
    Dashboard,
    Transactions,
    Analytics,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Login,
        Page::Register,
        Page::Dashboard,
        Page::Transactions,
        Page::Analytics,
    ];

    /// Pages shown in the main navigation bar
    pub const NAVIGATION: [Page; 3] = [Page::Dashboard, Page::Transactions, Page::Analytics];

    pub fn requires_auth(self) -> bool {
        matches!(self, Page::Dashboard | Page::Transactions | Page::Analytics)
    }

    /// Pages that register charts with the chart adapter
    pub fn has_charts(self) -> bool {
        matches!(self, Page::Analytics)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Register => "register",
            Page::Dashboard => "dashboard",
            Page::Transactions => "transactions",
            Page::Analytics => "analytics",
        }
    }

    pub fn title_key(self) -> &'static str {
        match self {
            Page::Login => "auth.login",
            Page::Register => "auth.register",
            Page::Dashboard => "nav.dashboard",
            Page::Transactions => "nav.transactions",
            Page::Analytics => "nav.analytics",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.as_str() == value)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is signed in, if anyone
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn login(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        self.user = None;
    }
}

/// Page actually entered for a navigation request
pub fn resolve_navigation(requested: Page, session: &Session) -> Page {
    if requested.requires_auth() && !session.is_logged_in() {
        Page::Login
    } else {
        requested
    }
}

/// Result of a single navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub from: Page,
    pub to: Page,
    /// The requested page was gated and the user was sent to login instead
    pub redirected: bool,
    /// Charts of the previous page must be destroyed before rendering `to`
    pub release_charts: bool,
}

/// Identity of the page render a request was issued from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub page: Page,
    pub epoch: u64,
}

/// Generations of one kind of load issued from within a page.
///
/// Filter changes reload data without navigating, so the router ticket
/// alone cannot tell an older in-page response from the newest one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSequence {
    latest: u64,
}

impl LoadSequence {
    /// Start a new load; every earlier generation goes stale
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, generation: u64) -> bool {
        generation == self.latest
    }
}

/// Current page plus a counter bumped on every render of a page
#[derive(Debug, Clone, PartialEq)]
pub struct Router {
    current: Page,
    epoch: u64,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: Page::Login,
            epoch: 0,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn navigate(&mut self, requested: Page, session: &Session) -> Navigation {
        let from = self.current;
        let to = resolve_navigation(requested, session);
        self.current = to;
        self.epoch += 1;

        Navigation {
            from,
            to,
            redirected: to != requested,
            release_charts: from.has_charts(),
        }
    }

    /// Re-render the current page, e.g. after a language switch, invalidating
    /// outstanding requests. The page remounts, so its charts go too.
    pub fn refresh(&mut self) -> Navigation {
        self.epoch += 1;
        Navigation {
            from: self.current,
            to: self.current,
            redirected: false,
            release_charts: self.current.has_charts(),
        }
    }

    pub fn ticket(&self) -> RequestTicket {
        RequestTicket {
            page: self.current,
            epoch: self.epoch,
        }
    }

    /// Whether a response for `ticket` may still be applied
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.page == self.current && ticket.epoch == self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: None,
            created_at: None,
        }
    }

    #[test]
    fn test_gated_pages_redirect_to_login_when_logged_out() {
        let session = Session::default();
        for page in [Page::Dashboard, Page::Transactions, Page::Analytics] {
            let mut router = Router::new();
            let nav = router.navigate(page, &session);
            assert_eq!(nav.to, Page::Login);
            assert!(nav.redirected);
            assert_eq!(router.current(), Page::Login);
        }
    }

    #[test]
    fn test_public_pages_never_redirect() {
        let session = Session::default();
        let mut router = Router::new();
        assert_eq!(router.navigate(Page::Register, &session).to, Page::Register);
        assert_eq!(router.navigate(Page::Login, &session).to, Page::Login);
    }

    #[test]
    fn test_logged_in_user_reaches_every_page() {
        let session = Session::signed_in(user());
        let mut router = Router::new();
        for page in Page::ALL {
            let nav = router.navigate(page, &session);
            assert_eq!(nav.to, page);
            assert!(!nav.redirected);
        }
    }

    #[test]
    fn test_logout_closes_gated_pages_again() {
        let mut session = Session::signed_in(user());
        assert_eq!(resolve_navigation(Page::Analytics, &session), Page::Analytics);
        session.logout();
        assert!(!session.is_logged_in());
        assert_eq!(resolve_navigation(Page::Analytics, &session), Page::Login);
    }

    #[test]
    fn test_leaving_analytics_releases_charts() {
        let session = Session::signed_in(user());
        let mut router = Router::new();
        router.navigate(Page::Analytics, &session);
        let nav = router.navigate(Page::Dashboard, &session);
        assert!(nav.release_charts);
        let nav = router.navigate(Page::Transactions, &session);
        assert!(!nav.release_charts);
    }

    #[test]
    fn test_tickets_go_stale_after_navigation() {
        let session = Session::signed_in(user());
        let mut router = Router::new();
        router.navigate(Page::Analytics, &session);
        let ticket = router.ticket();
        assert!(router.is_current(&ticket));

        router.navigate(Page::Dashboard, &session);
        assert!(!router.is_current(&ticket));

        // coming back does not revive the old ticket
        router.navigate(Page::Analytics, &session);
        assert!(!router.is_current(&ticket));
    }

    #[test]
    fn test_refresh_invalidates_tickets_on_same_page() {
        let mut router = Router::new();
        let ticket = router.ticket();
        let nav = router.refresh();
        assert!(!router.is_current(&ticket));
        assert_eq!(router.current(), Page::Login);
        assert_eq!(nav.to, Page::Login);
        assert!(!nav.release_charts);
    }

    #[test]
    fn test_refresh_on_analytics_releases_charts() {
        let session = Session::signed_in(user());
        let mut router = Router::new();
        router.navigate(Page::Analytics, &session);
        let epoch = router.epoch();

        let nav = router.refresh();
        assert_eq!(nav.from, Page::Analytics);
        assert_eq!(nav.to, Page::Analytics);
        assert!(!nav.redirected);
        assert!(nav.release_charts);
        assert_eq!(router.epoch(), epoch + 1);
    }

    #[test]
    fn test_newer_load_supersedes_older_on_same_page() {
        let session = Session::signed_in(user());
        let mut router = Router::new();
        router.navigate(Page::Analytics, &session);
        let mut loads = LoadSequence::default();

        let month_ticket = router.ticket();
        let month = loads.issue();
        let year_ticket = router.ticket();
        let year = loads.issue();

        // same page render, so only the sequence tells them apart
        assert_eq!(month_ticket, year_ticket);
        assert!(!loads.is_latest(month));
        assert!(loads.is_latest(year));
    }

    #[test]
    fn test_page_parse_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::parse(page.as_str()), Some(page));
        }
        assert_eq!(Page::parse("categories"), None);
    }
}
