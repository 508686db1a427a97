use crate::dashboard::{
    Session,
    guards::{Navigation, auth_guard, role_guard},
};
use crate::model::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
    Home,
    Tasks,
    Leaves,
    LeaveManagement,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Auth,
    Role,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub view: View,
    pub guards: &'static [Guard],
    pub roles: &'static [Role],
    pub children: Vec<Route>,
}

impl Route {
    fn leaf(path: &'static str, view: View) -> Self {
        Self {
            path,
            view,
            guards: &[],
            roles: &[],
            children: Vec::new(),
        }
    }
}

pub fn app_routes() -> Vec<Route> {
    vec![
        Route {
            guards: &[Guard::Auth],
            ..Route::leaf("login", View::Login)
        },
        Route {
            guards: &[Guard::Auth],
            children: vec![
                Route::leaf("", View::Home),
                Route::leaf("tasks", View::Tasks),
                Route::leaf("leaves", View::Leaves),
                Route {
                    guards: &[Guard::Role],
                    roles: &[Role::Admin],
                    ..Route::leaf("leave-management", View::LeaveManagement)
                },
            ],
            ..Route::leaf("", View::Dashboard)
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Views from the outermost shell down to the page.
    Render(Vec<View>),
    Redirect(&'static str),
}

/// Matches `path` against the route table and runs guards from parent to
/// child. The first redirect wins. Unmatched paths render `NotFound`.
pub fn resolve(routes: &[Route], path: &str, session: &Session) -> Resolution {
    let path = path.trim_matches('/');
    let mut chain = Vec::new();
    if !match_routes(routes, path, &mut chain) {
        return Resolution::Render(vec![View::NotFound]);
    }

    for route in &chain {
        for guard in route.guards {
            let navigation = match guard {
                Guard::Auth => auth_guard(route.path, session),
                Guard::Role => role_guard(route.roles, session),
            };
            if let Navigation::Redirect(to) = navigation {
                return Resolution::Redirect(to);
            }
        }
    }
    Resolution::Render(chain.iter().map(|r| r.view).collect())
}

fn match_routes<'r>(routes: &'r [Route], path: &str, chain: &mut Vec<&'r Route>) -> bool {
    for route in routes {
        if route.children.is_empty() {
            if route.path == path {
                chain.push(route);
                return true;
            }
            continue;
        }

        let rest = if route.path.is_empty() {
            Some(path)
        } else if path == route.path {
            Some("")
        } else {
            path.strip_prefix(route.path)
                .and_then(|rest| rest.strip_prefix('/'))
        };
        if let Some(rest) = rest {
            chain.push(route);
            if match_routes(&route.children, rest, chain) {
                return true;
            }
            chain.pop();
        }
    }
    false
}
