use std::rc::Rc;

use dominator::{Dom, EventOptions, clone, html, link, routing};
use futures_signals::signal::{Mutable, SignalExt};
use yomu_lib::models::RegisterInput;

use crate::common::{Route, Topbar, events, field, input, snackbar};
use crate::contexts;
use crate::query;
use crate::utils::AsyncLoader;

const MIN_PASSWORD_LEN: usize = 6;

pub struct Register {
    username: Mutable<String>,
    email: Mutable<String>,
    password: Mutable<String>,
    confirm: Mutable<String>,
    loader: AsyncLoader,
}

impl Register {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            username: Mutable::new("".to_string()),
            email: Mutable::new("".to_string()),
            password: Mutable::new("".to_string()),
            confirm: Mutable::new("".to_string()),
            loader: AsyncLoader::new(),
        })
    }

    fn validate(&self) -> Result<RegisterInput, &'static str> {
        let input = RegisterInput {
            username: self.username.get_cloned().trim().to_string(),
            email: self.email.get_cloned().trim().to_string(),
            password: self.password.get_cloned(),
        };

        if input.username.is_empty() {
            return Err("Username is required");
        }
        if !input.email.contains('@') {
            return Err("Email is not valid");
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters");
        }
        if input.password != self.confirm.get_cloned() {
            return Err("Passwords do not match");
        }
        Ok(input)
    }

    pub fn register(register: Rc<Self>) {
        let input = match register.validate() {
            Ok(input) => input,
            Err(message) => {
                snackbar::show(message.to_string());
                return;
            }
        };

        register.loader.load(async move {
            match query::client().register(&input).await {
                Ok(response) => {
                    info!("registered {}", response.user.username);
                    contexts::auth().login(response);
                    routing::go_to_url(&Route::Home.url());
                }
                Err(e) => {
                    error!("error register: {}", e);
                    snackbar::show(format!("Register failed: {}", e));
                }
            }
        });
    }

    pub fn render(register: Rc<Self>) -> Dom {
        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Register", true),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("form", {
                    .class("auth-form")
                    .children(&mut [
                        field("Username", input(register.username.clone(), "text", "Username")),
                        field("Email", input(register.email.clone(), "email", "Email")),
                        field("Password", input(register.password.clone(), "password", "Password")),
                        field("Confirm Password", input(register.confirm.clone(), "password", "Confirm Password")),
                        html!("button", {
                            .class("primary")
                            .attribute("type", "submit")
                            .attribute_signal("disabled", register.loader.is_loading().map(|loading| loading.then_some("true")))
                            .text("Register")
                        }),
                        link!(Route::Login.url(), {
                            .text("Already have an account? Login")
                        }),
                    ])
                    .event_with_options(&EventOptions::preventable(), clone!(register => move |e: events::Submit| {
                        e.prevent_default();
                        Self::register(register.clone());
                    }))
                }),
            ])
        })
    }
}
