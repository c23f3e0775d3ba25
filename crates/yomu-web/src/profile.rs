use std::rc::Rc;

use dominator::{Dom, EventOptions, clone, html, routing};
use futures_signals::signal::{Mutable, SignalExt};
use wasm_bindgen::UnwrapThrowExt;
use yomu_lib::models::{ChangePasswordInput, ProfileInput};

use crate::common::{Route, Topbar, events, field, input, select, snackbar};
use crate::contexts;
use crate::query;
use crate::utils::{AsyncLoader, THEME_KEY, apply_theme, local_storage};

const MIN_PASSWORD_LEN: usize = 6;

pub struct Profile {
    email: Mutable<String>,
    avatar_url: Mutable<String>,
    old_password: Mutable<String>,
    new_password: Mutable<String>,
    confirm_password: Mutable<String>,
    theme: Mutable<String>,
    loader: AsyncLoader,
}

impl Profile {
    pub fn new() -> Rc<Self> {
        let user = contexts::auth().user.get_cloned();
        let theme = local_storage()
            .get(THEME_KEY)
            .unwrap_throw()
            .unwrap_or_else(|| "system".to_string());

        Rc::new(Self {
            email: Mutable::new(user.as_ref().map(|user| user.email.clone()).unwrap_or_default()),
            avatar_url: Mutable::new(user.and_then(|user| user.avatar_url).unwrap_or_default()),
            old_password: Mutable::new("".to_string()),
            new_password: Mutable::new("".to_string()),
            confirm_password: Mutable::new("".to_string()),
            theme: Mutable::new(theme),
            loader: AsyncLoader::new(),
        })
    }

    fn update_profile(profile: Rc<Self>) {
        let non_empty = |value: String| {
            let value = value.trim().to_string();
            (!value.is_empty()).then_some(value)
        };
        let input = ProfileInput {
            email: non_empty(profile.email.get_cloned()),
            avatar_url: non_empty(profile.avatar_url.get_cloned()),
        };

        profile.loader.load(async move {
            match query::client().update_profile(&input).await {
                Ok(user) => {
                    contexts::auth().user.set(Some(user));
                    snackbar::show("Profile updated".to_string());
                }
                Err(e) => query::report("Failed to update profile", &e),
            }
        });
    }

    fn change_password(profile: Rc<Self>) {
        let new_password = profile.new_password.get_cloned();
        if new_password.len() < MIN_PASSWORD_LEN {
            snackbar::show("Password must be at least 6 characters".to_string());
            return;
        }
        if new_password != profile.confirm_password.get_cloned() {
            snackbar::show("Passwords do not match".to_string());
            return;
        }

        let input = ChangePasswordInput {
            old_password: profile.old_password.get_cloned(),
            new_password,
        };
        profile.loader.load(clone!(profile => async move {
            match query::client().change_password(&input).await {
                Ok(_) => {
                    profile.old_password.set("".to_string());
                    profile.new_password.set("".to_string());
                    profile.confirm_password.set("".to_string());
                    snackbar::show("Password changed".to_string());
                }
                Err(e) => query::report("Failed to change password", &e),
            }
        }));
    }

    fn render_account(profile: Rc<Self>) -> Dom {
        html!("form", {
            .class("profile-form")
            .children(&mut [
                html!("h3", {
                    .text_signal(contexts::auth().user.signal_ref(|user| {
                        user.as_ref().map(|user| format!("{} ({})", user.username, user.role)).unwrap_or_default()
                    }))
                }),
                field("Email", input(profile.email.clone(), "email", "Email")),
                field("Avatar URL", input(profile.avatar_url.clone(), "url", "https://")),
                html!("button", {
                    .attribute("type", "submit")
                    .text("Save")
                }),
            ])
            .event_with_options(&EventOptions::preventable(), clone!(profile => move |e: events::Submit| {
                e.prevent_default();
                Self::update_profile(profile.clone());
            }))
        })
    }

    fn render_password(profile: Rc<Self>) -> Dom {
        html!("form", {
            .class("profile-form")
            .children(&mut [
                html!("h3", {
                    .text("Change Password")
                }),
                field("Current Password", input(profile.old_password.clone(), "password", "Current Password")),
                field("New Password", input(profile.new_password.clone(), "password", "New Password")),
                field("Confirm Password", input(profile.confirm_password.clone(), "password", "Confirm Password")),
                html!("button", {
                    .attribute("type", "submit")
                    .attribute_signal("disabled", profile.loader.is_loading().map(|loading| loading.then_some("true")))
                    .text("Change Password")
                }),
            ])
            .event_with_options(&EventOptions::preventable(), clone!(profile => move |e: events::Submit| {
                e.prevent_default();
                Self::change_password(profile.clone());
            }))
        })
    }

    fn render_appearance(profile: Rc<Self>) -> Dom {
        html!("div", {
            .class("profile-form")
            .future(profile.theme.signal_cloned().for_each(|theme| {
                local_storage().set(THEME_KEY, &theme).unwrap_throw();
                apply_theme();
                async {}
            }))
            .children(&mut [
                html!("h3", {
                    .text("Appearance")
                }),
                field("Theme", select(profile.theme.clone(), &[
                    ("system", "System"),
                    ("light", "Light"),
                    ("dark", "Dark"),
                ])),
            ])
        })
    }

    pub fn render(profile: Rc<Self>) -> Dom {
        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Profile", false),
                html!("div", {
                    .class("topbar-spacing")
                }),
                Self::render_account(profile.clone()),
                Self::render_password(profile.clone()),
                Self::render_appearance(profile.clone()),
                html!("button", {
                    .class("danger")
                    .text("Logout")
                    .event(|_: events::Click| {
                        contexts::auth().logout();
                        routing::go_to_url(&Route::Login.url());
                    })
                }),
            ])
        })
    }
}
