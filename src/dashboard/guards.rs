use crate::dashboard::Session;
use crate::model::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(&'static str),
}

/// Keeps signed-in users off the login page and everyone else on it.
pub fn auth_guard(route_path: &str, session: &Session) -> Navigation {
    let logged_in = session.is_logged_in();
    match (route_path == "login", logged_in) {
        (true, true) => Navigation::Redirect("/"),
        (false, false) => Navigation::Redirect("/login"),
        _ => Navigation::Allow,
    }
}

/// An empty role list admits anyone.
pub fn role_guard(roles: &[Role], session: &Session) -> Navigation {
    if roles.is_empty() {
        return Navigation::Allow;
    }
    match session.role() {
        Some(role) if role != Role::Unknown && roles.contains(&role) => Navigation::Allow,
        _ => Navigation::Redirect("/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{MemoryCookieStore, testing::user};

    fn session(role: Option<Role>) -> Session {
        let session = Session::restore(MemoryCookieStore::new());
        if let Some(role) = role {
            session.set_user(user(1, "x@company.com", role)).unwrap();
        }
        session
    }

    #[test]
    fn auth_guard_redirects_by_login_state() {
        let anonymous = session(None);
        let employee = session(Some(Role::Employee));

        assert_eq!(auth_guard("login", &anonymous), Navigation::Allow);
        assert_eq!(auth_guard("", &anonymous), Navigation::Redirect("/login"));
        assert_eq!(auth_guard("login", &employee), Navigation::Redirect("/"));
        assert_eq!(auth_guard("", &employee), Navigation::Allow);
    }

    #[test]
    fn role_guard_checks_membership() {
        let admins = [Role::Admin];

        assert_eq!(role_guard(&admins, &session(Some(Role::Admin))), Navigation::Allow);
        assert_eq!(role_guard(&admins, &session(Some(Role::Employee))), Navigation::Redirect("/"));
        assert_eq!(role_guard(&admins, &session(None)), Navigation::Redirect("/"));
        assert_eq!(role_guard(&[], &session(None)), Navigation::Allow);
    }

    #[test]
    fn unknown_role_never_passes() {
        let session = session(Some(Role::Unknown));
        assert_eq!(role_guard(&[Role::Unknown], &session), Navigation::Redirect("/"));
    }
}
