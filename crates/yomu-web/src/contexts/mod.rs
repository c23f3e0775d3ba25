use std::rc::Rc;

mod auth;
pub use auth::AuthContext;

mod notification;
pub use notification::NotificationContext;

thread_local! {
    static AUTH: Rc<AuthContext> = AuthContext::new();
    static NOTIFICATIONS: Rc<NotificationContext> = NotificationContext::new();
}

pub fn auth() -> Rc<AuthContext> {
    AUTH.with(|auth| auth.clone())
}

pub fn notifications() -> Rc<NotificationContext> {
    NOTIFICATIONS.with(|notifications| notifications.clone())
}
