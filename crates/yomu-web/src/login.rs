use std::rc::Rc;

use dominator::{Dom, EventOptions, clone, html, link, routing};
use futures_signals::signal::{Mutable, SignalExt};
use yomu_lib::models::LoginInput;

use crate::common::{Route, Topbar, events, field, input, snackbar};
use crate::contexts;
use crate::query;
use crate::utils::AsyncLoader;

pub struct Login {
    username: Mutable<String>,
    password: Mutable<String>,
    loader: AsyncLoader,
}

impl Login {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            username: Mutable::new("".to_string()),
            password: Mutable::new("".to_string()),
            loader: AsyncLoader::new(),
        })
    }

    pub fn login(login: Rc<Self>) {
        let input = LoginInput {
            username: login.username.get_cloned().trim().to_string(),
            password: login.password.get_cloned(),
        };
        if input.username.is_empty() || input.password.is_empty() {
            snackbar::show("Username and password are required".to_string());
            return;
        }

        login.loader.load(clone!(login => async move {
            match query::client().login(&input).await {
                Ok(response) => {
                    info!("login as {}", response.user.username);
                    login.password.set("".to_string());
                    contexts::auth().login(response);
                    routing::go_to_url(&Route::Home.url());
                }
                Err(e) => {
                    error!("error login: {}", e);
                    snackbar::show(format!("Login failed: {}", e));
                }
            }
        }));
    }

    pub fn render(login: Rc<Self>) -> Dom {
        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Login", true),
                html!("div", {
                    .class("topbar-spacing")
                }),
                html!("form", {
                    .class("auth-form")
                    .children(&mut [
                        field("Username", input(login.username.clone(), "text", "Username")),
                        field("Password", input(login.password.clone(), "password", "Password")),
                        html!("button", {
                            .class("primary")
                            .attribute("type", "submit")
                            .attribute_signal("disabled", login.loader.is_loading().map(|loading| loading.then_some("true")))
                            .text("Login")
                        }),
                        link!(Route::Register.url(), {
                            .text("Create an account")
                        }),
                    ])
                    .event_with_options(&EventOptions::preventable(), clone!(login => move |e: events::Submit| {
                        e.prevent_default();
                        Self::login(login.clone());
                    }))
                }),
            ])
        })
    }
}
