//! The demo app: a layout with a welcome page, a nested app section and a not found page.

use serde_json::json;
use waypoint_router::prelude::*;

use crate::render::{Click, Frame, Line};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Layout,
    Welcome,
    AppPage,
    AppHome,
    AppAbout,
    AppContact,
    Other,
    NotFound,
}

pub fn routes() -> Result<RouteTree<Page>, RouteConfigError> {
    RouteTree::new(vec![RouteNode::new("/", Page::Layout)
        .child(RouteNode::index(Page::Welcome))
        .child(
            RouteNode::new("/app", Page::AppPage)
                .child(RouteNode::index(Page::AppHome))
                // literal children win over the parameter regardless of order
                .child(RouteNode::new(":slug", Page::Other))
                .child(RouteNode::new("about", Page::AppAbout))
                .child(RouteNode::new("/app/contact", Page::AppContact))
                .child(RouteNode::redirect("redirect-me", "/app/about")),
        )
        .child(RouteNode::new("*", Page::NotFound))])
}

impl Page {
    pub fn draw(&self, f: &mut Frame<'_, '_>, outlet: Option<Vec<Line>>) {
        match self {
            Page::Layout => {
                f.link("Home (/)", "/")
                    .link("App (/app)", "app")
                    .link("404", "no-match")
                    .text("Home (/)")
                    .text("Selected page:")
                    .outlet(outlet);
            }
            Page::Welcome => {
                f.text("Welcome")
                    .text("(added as index route so outlet won't be empty)");
            }
            Page::AppPage => {
                f.text("App Home (/app)")
                    .nav_link("About (/app/about)", "/app/about")
                    .button(
                        "Contact (/app/contact)",
                        Click::Navigate {
                            target: String::from("contact"),
                            options: NavigateOptions::push().with_state(json!({ "foo": "sent" })),
                        },
                    )
                    .link("Params (/app/:slug)", "some-params")
                    .link("Redirect to about (/app/about)", "redirect-me")
                    .text("Children routes:")
                    .outlet(outlet);
            }
            Page::AppHome => {
                f.text("App: Default Home");
            }
            Page::AppAbout => {
                f.text("App: About");
            }
            Page::AppContact => {
                f.text("App: Contact");
                if let Some(state) = f.cx().location_state() {
                    f.text(format!("Sent along: {state}"));
                }
            }
            Page::NotFound => {
                f.text("404");
            }
            Page::Other => {
                let cx = f.cx();
                let params = serde_json::to_string_pretty(cx.params()).unwrap_or_default();
                let page = cx.query().get("page").map(String::as_str).unwrap_or("");

                f.text("params object:")
                    .text(params)
                    .text("search params value:")
                    .button(
                        "Set search params",
                        Click::SetQuery(vec![(String::from("page"), String::from("2"))]),
                    )
                    .text(format!("Page: {page}"));
            }
        }
    }
}

