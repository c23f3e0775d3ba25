use std::rc::Rc;

use dominator::{Dom, clone, html, with_node};
use futures_signals::signal::{Mutable, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yomu_lib::models::{Role, User};

use crate::admin::render_nav;
use crate::common::{AdminSection, Spinner, Topbar, confirm, events, snackbar};
use crate::contexts;
use crate::query;
use crate::utils::{AsyncLoader, format_date};

pub struct AdminUsers {
    users: MutableVec<User>,
    is_loading: Mutable<bool>,
    loader: AsyncLoader,
}

impl AdminUsers {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            users: MutableVec::new(),
            is_loading: Mutable::new(false),
            loader: AsyncLoader::new(),
        })
    }

    fn fetch(admin: Rc<Self>) {
        admin.is_loading.set_neq(true);
        admin.loader.load(clone!(admin => async move {
            match query::client().users().await {
                Ok(users) => admin.users.lock_mut().replace_cloned(users),
                Err(e) => {
                    query::report("Failed to load users", &e);
                    admin.users.lock_mut().clear();
                }
            }
            admin.is_loading.set_neq(false);
        }));
    }

    fn set_role(admin: Rc<Self>, id: i64, role: Role) {
        spawn_local(clone!(admin => async move {
            match query::client().set_user_role(id, role).await {
                Ok(user) => {
                    let mut users = admin.users.lock_mut();
                    if let Some(index) = users.iter().position(|u| u.id == user.id) {
                        users.set_cloned(index, user);
                    }
                }
                Err(e) => {
                    query::report("Failed to change role", &e);
                    Self::fetch(admin.clone());
                }
            }
        }));
    }

    fn delete(admin: Rc<Self>, user: &User) {
        if !confirm(&format!("Delete user {}?", user.username)) {
            return;
        }

        let id = user.id;
        spawn_local(clone!(admin => async move {
            match query::client().delete_user(id).await {
                Ok(_) => {
                    snackbar::show("User deleted".to_string());
                    admin.users.lock_mut().retain(|user| user.id != id);
                }
                Err(e) => query::report("Failed to delete user", &e),
            }
        }));
    }

    fn render_row(admin: Rc<Self>, user: User) -> Dom {
        let id = user.id;
        let is_self = contexts::auth().user_id() == Some(id);

        html!("tr", {
            .children(&mut [
                html!("td", {
                    .text(&user.username)
                }),
                html!("td", {
                    .text(&user.email)
                }),
                html!("td", {
                    .text(&user.created_at.as_ref().map(format_date).unwrap_or_default())
                }),
                html!("td", {
                    .child(html!("select" => HtmlSelectElement, {
                        .apply_if(is_self, |dom| dom.attribute("disabled", "true"))
                        .children([Role::User, Role::Admin].iter().map(|role| html!("option", {
                            .attribute("value", &role.to_string())
                            .property("selected", *role == user.role)
                            .text(&role.to_string())
                        })))
                        .with_node!(select => {
                            .event(clone!(admin => move |_: events::Change| {
                                match select.value().parse::<Role>() {
                                    Ok(role) => Self::set_role(admin.clone(), id, role),
                                    Err(e) => error!("{}", e),
                                }
                            }))
                        })
                    }))
                }),
                html!("td", {
                    .apply_if(!is_self, |dom| dom.child(html!("button", {
                        .class("danger")
                        .text("Delete")
                        .event(clone!(admin, user => move |_: events::Click| {
                            Self::delete(admin.clone(), &user);
                        }))
                    })))
                }),
            ])
        })
    }

    pub fn render(admin: Rc<Self>) -> Dom {
        Self::fetch(admin.clone());

        html!("div", {
            .class("main")
            .children(&mut [
                Topbar::render("Admin", false),
                html!("div", {
                    .class("topbar-spacing")
                }),
                render_nav(AdminSection::Users),
                html!("table", {
                    .class("admin-table")
                    .children(&mut [
                        html!("thead", {
                            .child(html!("tr", {
                                .children(["Username", "Email", "Joined", "Role", ""].iter().map(|label| html!("th", {
                                    .text(label)
                                })))
                            }))
                        }),
                        html!("tbody", {
                            .children_signal_vec(admin.users.signal_vec_cloned().map(clone!(admin => move |user| {
                                Self::render_row(admin.clone(), user)
                            })))
                        }),
                    ])
                }),
            ])
            .child_signal(Spinner::render_while(admin.is_loading.signal()))
        })
    }
}
