use yomu_api::{Client, Error};

use crate::common::snackbar;
use crate::contexts;
use crate::utils::{api_host, token};

/// Client for the backend, carrying the token from local storage.
pub fn client() -> Client {
    Client::new(api_host()).with_token(token())
}

/// Log a failed call and tell the user; a 401 also ends the session.
pub fn report(action: &str, err: &Error) {
    error!("{}: {}", action, err);
    if err.is_unauthorized() {
        contexts::auth().expire();
    } else {
        snackbar::show(format!("{}: {}", action, err));
    }
}
