//! A plain text renderer for the demo pages.

use std::fmt::{self, Display, Formatter};

use tracing::warn;
use waypoint_router::prelude::*;

use crate::app::Page;

/// What activating a link or button does.
#[derive(Clone, Debug)]
pub enum Click {
    /// Navigate to a target, resolved against the view that rendered the link.
    Navigate {
        target: String,
        options: NavigateOptions,
    },
    /// Replace the query parameters of the current location.
    SetQuery(Vec<(String, String)>),
}

/// A link or button the user can activate with `click:N`.
#[derive(Clone, Debug)]
pub struct Link {
    label: String,
    href: Option<String>,
    active: Option<bool>,
    click: Click,
    navigator: Navigator,
}

impl Link {
    /// Queue the navigation of this link. The router carries it out on its next
    /// `handle_messages`.
    pub fn click(&self) -> anyhow::Result<()> {
        match &self.click {
            Click::Navigate { target, options } => {
                self.navigator.navigate(target.clone(), options.clone())
            }
            Click::SetQuery(query) => self.navigator.set_query(query, NavigateOptions::push())?,
        }
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

#[derive(Clone, Debug)]
enum Item {
    Text(String),
    Link(Link),
}

#[derive(Clone, Debug)]
pub struct Line {
    depth: usize,
    item: Item,
}

/// The output of one view, built line by line.
pub struct Frame<'c, 'a> {
    cx: &'c OutletContext<'a, Page>,
    lines: Vec<Line>,
}

impl<'c, 'a> Frame<'c, 'a> {
    fn new(cx: &'c OutletContext<'a, Page>) -> Self {
        Self {
            cx,
            lines: Vec::new(),
        }
    }

    pub fn cx(&self) -> &'c OutletContext<'a, Page> {
        self.cx
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Item::Text(text.into()))
    }

    /// A link to `to`, resolved against this view's route.
    pub fn link(&mut self, label: &str, to: &str) -> &mut Self {
        self.anchor(label, to, false)
    }

    /// Like [`Frame::link`], marked if it points at the current location.
    pub fn nav_link(&mut self, label: &str, to: &str) -> &mut Self {
        self.anchor(label, to, true)
    }

    pub fn button(&mut self, label: &str, click: Click) -> &mut Self {
        let navigator = self.cx.navigator().clone();
        self.push(Item::Link(Link {
            label: label.to_string(),
            href: None,
            active: None,
            click,
            navigator,
        }))
    }

    /// Embed the output of the next inner route, one level deeper.
    pub fn outlet(&mut self, outlet: Option<Vec<Line>>) -> &mut Self {
        for mut line in outlet.unwrap_or_default() {
            line.depth += 1;
            self.lines.push(line);
        }
        self
    }

    fn anchor(&mut self, label: &str, to: &str, nav: bool) -> &mut Self {
        let href = match self.cx.build_link(to) {
            Ok(href) => href,
            Err(e) => {
                warn!("not rendering link {label:?}: {e}");
                return self;
            }
        };

        let active = nav.then(|| self.cx.is_active(to, false));
        let navigator = self.cx.navigator().clone();
        self.push(Item::Link(Link {
            label: label.to_string(),
            href: Some(href.clone()),
            active,
            click: Click::Navigate {
                target: href,
                options: NavigateOptions::push(),
            },
            navigator,
        }))
    }

    fn push(&mut self, item: Item) -> &mut Self {
        self.lines.push(Line { depth: 0, item });
        self
    }
}

/// Renders [`Page`]s as indented text.
pub struct TextRenderer;

impl Renderer<Page> for TextRenderer {
    type Output = Vec<Line>;

    fn render(
        &mut self,
        view: &Page,
        cx: &OutletContext<'_, Page>,
        outlet: Option<Vec<Line>>,
    ) -> Vec<Line> {
        let mut frame = Frame::new(cx);
        view.draw(&mut frame, outlet);
        frame.lines
    }
}

/// A fully rendered page, with its links numbered from top to bottom, starting at 1.
#[derive(Debug, Default)]
pub struct Screen {
    lines: Vec<Line>,
}

impl Screen {
    pub fn render(router: &Router<Page>) -> Self {
        Self {
            lines: router.render(&mut TextRenderer).unwrap_or_default(),
        }
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.lines.iter().filter_map(|l| match &l.item {
            Item::Link(link) => Some(link),
            Item::Text(_) => None,
        })
    }

    /// The `n`th link, counting from 1.
    pub fn link(&self, n: usize) -> Option<&Link> {
        self.links().nth(n.checked_sub(1)?)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut n = 0;
        for line in &self.lines {
            let indent = "  ".repeat(line.depth);
            match &line.item {
                Item::Text(text) => {
                    for text in text.lines() {
                        writeln!(f, "{indent}{text}")?;
                    }
                }
                Item::Link(link) => {
                    n += 1;
                    write!(f, "{indent}[{n}] {}", link.label)?;
                    if let Some(href) = &link.href {
                        write!(f, " -> {href}")?;
                    }
                    if link.active == Some(true) {
                        write!(f, " (active)")?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}
