use std::fmt;

/// Client-side pages of the encyclopedia.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Learn,
    Article { slug: String },
    Admin,
    NotFound,
}

/// What to render for a requested route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Show(Route),
    RedirectHome,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["learn"] => Route::Learn,
            ["admin"] => Route::Admin,
            ["article", slug] => Route::Article {
                slug: slug.to_string(),
            },
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Learn => "/learn".to_string(),
            Route::Article { slug } => format!("/article/{slug}"),
            Route::Admin => "/admin".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn requires_admin(&self) -> bool {
        matches!(self, Route::Admin)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Gates protected routes on a server-confirmed admin session.
pub fn resolve(route: Route, is_admin: bool) -> Navigation {
    if route.requires_admin() && !is_admin {
        tracing::debug!("redirecting {} to home, no admin session", route);
        return Navigation::RedirectHome;
    }
    Navigation::Show(route)
}
