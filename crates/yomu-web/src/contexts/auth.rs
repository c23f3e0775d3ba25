use std::rc::Rc;

use dominator::{clone, routing};
use futures_signals::signal::{Mutable, Signal};
use wasm_bindgen::UnwrapThrowExt;
use yomu_lib::models::{AuthResponse, User};

use crate::common::{Route, snackbar};
use crate::query;
use crate::utils::{AsyncLoader, TOKEN_KEY, local_storage, token};

/// The logged-in user, shared by every page.
pub struct AuthContext {
    pub user: Mutable<Option<User>>,
    loaded: Mutable<bool>,
    loader: AsyncLoader,
}

impl AuthContext {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            user: Mutable::new(None),
            loaded: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    /// Resolve the stored token into a user.
    pub fn load(auth: Rc<Self>) {
        if token().is_none() {
            auth.user.set(None);
            auth.loaded.set_neq(true);
            return;
        }

        auth.loader.load(clone!(auth => async move {
            match query::client().me().await {
                Ok(user) => {
                    info!("logged in as {}", user.username);
                    auth.user.set(Some(user));
                }
                Err(e) if e.is_unauthorized() => {
                    auth.expire();
                }
                Err(e) => {
                    error!("error fetching current user: {}", e);
                    snackbar::show(format!("Failed to load profile: {}", e));
                }
            }
            auth.loaded.set_neq(true);
        }));
    }

    pub fn login(&self, response: AuthResponse) {
        local_storage()
            .set(TOKEN_KEY, &response.token)
            .unwrap_throw();
        self.user.set(Some(response.user));
        self.loaded.set_neq(true);
    }

    pub fn logout(&self) {
        self.loader.cancel();
        local_storage().delete(TOKEN_KEY).unwrap_throw();
        self.user.set(None);
        self.loaded.set_neq(true);
    }

    /// The backend rejected our token.
    pub fn expire(&self) {
        if token().is_some() {
            snackbar::show("Session expired, please login again".to_string());
        }
        self.logout();
        routing::go_to_url(&Route::Login.url());
    }

    pub fn is_logged_in(&self) -> bool {
        token().is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.lock_ref().as_ref().map(|user| user.id)
    }

    pub fn is_admin(&self) -> bool {
        self.user
            .lock_ref()
            .as_ref()
            .map(|user| user.role.is_admin())
            .unwrap_or(false)
    }

    /// Owners and admins may edit or delete a resource.
    pub fn can_modify(&self, owner_id: i64) -> bool {
        self.user
            .lock_ref()
            .as_ref()
            .map(|user| user.id == owner_id || user.role.is_admin())
            .unwrap_or(false)
    }

    pub fn loaded_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.loaded.signal()
    }

    pub fn is_logged_in_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.user.signal_ref(|user| user.is_some())
    }

    pub fn is_admin_signal(&self) -> impl Signal<Item = bool> + use<> {
        self.user
            .signal_ref(|user| user.as_ref().map(|user| user.role.is_admin()).unwrap_or(false))
    }
}
