// src/router.rs
//! Path → screen mapping for both portals, with the session guard applied on
//! entry.

use std::fmt;

use crate::app_log;
use crate::core::SessionStore;
use crate::types::Portal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Employer: job list when signed in, welcome page otherwise.
    /// Talent: landing page.
    Home,
    Login,
    Register,
    /// Employer only
    PostJob,
    /// Talent only: the public job board
    Jobs,
    /// Employer: posting with its applications. Talent: posting details.
    JobDetail(u64),
    /// Talent only from here on
    Apply(u64),
    MyApplications,
    Profile,
    EditProfile,
    NotFound(String),
}

/// What the router decided for a route given the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

impl Resolution {
    pub fn route(&self) -> &Route {
        match self {
            Resolution::Render(route) | Resolution::Redirect(route) => route,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Router {
    portal: Portal,
}

impl Router {
    pub fn new(portal: Portal) -> Self {
        Self { portal }
    }

    pub fn portal(&self) -> Portal {
        self.portal
    }

    pub fn parse(&self, path: &str) -> Route {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        let route = match (self.portal, segments.as_slice()) {
            (_, []) => Some(Route::Home),
            (_, ["login"]) => Some(Route::Login),
            (_, ["jobs", id]) => id.parse().ok().map(Route::JobDetail),
            (Portal::Employer, ["register"]) => Some(Route::Register),
            (Portal::Employer, ["post-job"]) => Some(Route::PostJob),
            (Portal::Talent, ["register-talent"]) => Some(Route::Register),
            (Portal::Talent, ["jobs"]) => Some(Route::Jobs),
            (Portal::Talent, ["jobs", id, "apply"]) => id.parse().ok().map(Route::Apply),
            (Portal::Talent, ["my-applications"]) => Some(Route::MyApplications),
            (Portal::Talent, ["profile"]) => Some(Route::Profile),
            (Portal::Talent, ["profile", "edit"]) => Some(Route::EditProfile),
            _ => None,
        };

        route.unwrap_or_else(|| Route::NotFound(path.to_string()))
    }

    pub fn path(&self, route: &Route) -> String {
        match route {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => match self.portal {
                Portal::Employer => "/register".to_string(),
                Portal::Talent => "/register-talent".to_string(),
            },
            Route::PostJob => "/post-job".to_string(),
            Route::Jobs => "/jobs".to_string(),
            Route::JobDetail(id) => format!("/jobs/{}", id),
            Route::Apply(id) => format!("/jobs/{}/apply", id),
            Route::MyApplications => "/my-applications".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::EditProfile => "/profile/edit".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn requires_session(&self, route: &Route) -> bool {
        match self.portal {
            Portal::Employer => matches!(route, Route::PostJob | Route::JobDetail(_)),
            Portal::Talent => matches!(
                route,
                Route::Apply(_) | Route::MyApplications | Route::Profile | Route::EditProfile
            ),
        }
    }

    fn redirects_when_signed_in(&self, route: &Route) -> bool {
        self.portal == Portal::Employer && matches!(route, Route::Login | Route::Register)
    }

    /// Apply the guard. Checked once on entry; a session that ends while a
    /// screen is open is handled by the screen itself.
    pub fn resolve(&self, route: Route, session: &SessionStore) -> Resolution {
        let signed_in = session.is_authenticated();

        if !signed_in && self.requires_session(&route) {
            app_log!(info, "{} requires a session, redirecting to login", self.path(&route));
            return Resolution::Redirect(Route::Login);
        }
        if signed_in && self.redirects_when_signed_in(&route) {
            return Resolution::Redirect(Route::Home);
        }
        Resolution::Render(route)
    }

    /// Parse then resolve
    pub fn navigate(&self, path: &str, session: &SessionStore) -> Resolution {
        self.resolve(self.parse(path), session)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::NotFound(path) => write!(f, "not found ({})", path),
            other => write!(f, "{:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryStorage;
    use crate::types::User;
    use serde_json::json;

    fn signed_in(portal: Portal) -> SessionStore {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "name": "Sam",
            "email": "sam@example.test",
            "type": portal.account_type().as_str(),
            "created_at": "2024-01-01 10:00:00",
            "updated_at": "2024-01-01 10:00:00"
        }))
        .unwrap();
        let mut session = SessionStore::new(portal, MemoryStorage::new());
        session.login(user, "tok".into()).unwrap();
        session
    }

    #[test]
    fn parses_portal_specific_paths() {
        let employer = Router::new(Portal::Employer);
        assert_eq!(employer.parse("/post-job"), Route::PostJob);
        assert_eq!(employer.parse("/jobs/12"), Route::JobDetail(12));
        assert_eq!(employer.parse("/register-talent"), Route::NotFound("/register-talent".into()));

        let talent = Router::new(Portal::Talent);
        assert_eq!(talent.parse("/jobs/7/apply"), Route::Apply(7));
        assert_eq!(talent.parse("/profile/edit/"), Route::EditProfile);
        assert_eq!(talent.parse("/jobs/abc"), Route::NotFound("/jobs/abc".into()));
        assert_eq!(talent.path(&Route::Register), "/register-talent");
    }

    #[test]
    fn employer_guard() {
        let router = Router::new(Portal::Employer);
        let anonymous = SessionStore::new(Portal::Employer, MemoryStorage::new());

        assert_eq!(router.navigate("/post-job", &anonymous), Resolution::Redirect(Route::Login));
        assert_eq!(router.navigate("/jobs/4", &anonymous), Resolution::Redirect(Route::Login));
        assert_eq!(router.navigate("/", &anonymous), Resolution::Render(Route::Home));

        let session = signed_in(Portal::Employer);
        assert_eq!(router.navigate("/login", &session), Resolution::Redirect(Route::Home));
        assert_eq!(router.navigate("/register", &session), Resolution::Redirect(Route::Home));
        assert_eq!(router.navigate("/jobs/4", &session), Resolution::Render(Route::JobDetail(4)));
    }

    #[test]
    fn talent_guard() {
        let router = Router::new(Portal::Talent);
        let anonymous = SessionStore::new(Portal::Talent, MemoryStorage::new());

        assert_eq!(router.navigate("/jobs", &anonymous), Resolution::Render(Route::Jobs));
        assert_eq!(router.navigate("/jobs/2", &anonymous), Resolution::Render(Route::JobDetail(2)));
        assert_eq!(router.navigate("/my-applications", &anonymous), Resolution::Redirect(Route::Login));

        let session = signed_in(Portal::Talent);
        assert_eq!(router.navigate("/login", &session), Resolution::Render(Route::Login));
        assert_eq!(router.navigate("/profile", &session), Resolution::Render(Route::Profile));
    }
}
