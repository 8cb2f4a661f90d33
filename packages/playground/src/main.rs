//! Drive the demo app from the command line.
//!
//! ```text
//! waypoint-playground /app click:2 back query:page=3
//! ```

use std::{fmt, str::FromStr};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use waypoint_router::prelude::*;

mod app;
mod logging;
mod render;

use render::Screen;

/// Navigate the demo app and print every page along the way.
#[derive(Parser, Debug)]
#[clap(name = "waypoint-playground", version)]
struct Cli {
    /// The location the app starts at.
    #[clap(long, default_value = "/")]
    start: String,

    /// How many redirects a single navigation may follow.
    #[clap(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    max_redirects: usize,

    /// Print every routable path and exit.
    #[clap(long)]
    routes: bool,

    /// Log filter directives, e.g. `waypoint_router=debug`. Overrides `WAYPOINT_LOG`.
    #[clap(long)]
    log: Option<String>,

    /// What to do, in order: `PATH` or `push:PATH`, `replace:PATH`, `back`, `forward`,
    /// `query:k=v&...` or `click:N` to activate the Nth link of the current page.
    actions: Vec<Action>,
}

#[derive(Clone, Debug, PartialEq)]
enum Action {
    Push(String),
    Replace(String),
    Back,
    Forward,
    Query(Vec<(String, String)>),
    Click(usize),
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.split_once(':') {
            Some(("push", path)) => Action::Push(path.to_string()),
            Some(("replace", path)) => Action::Replace(path.to_string()),
            Some(("query", query)) => Action::Query(
                serde_urlencoded::from_str(query)
                    .with_context(|| format!("invalid query string {query:?}"))?,
            ),
            Some(("click", n)) => {
                Action::Click(n.parse().with_context(|| format!("invalid link number {n:?}"))?)
            }
            Some((kind, _)) if !kind.contains('/') => bail!("unknown action {kind:?}"),
            _ => match s {
                "back" => Action::Back,
                "forward" => Action::Forward,
                path => Action::Push(path.to_string()),
            },
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Push(path) => write!(f, "push {path}"),
            Action::Replace(path) => write!(f, "replace {path}"),
            Action::Back => write!(f, "back"),
            Action::Forward => write!(f, "forward"),
            Action::Query(query) => write!(f, "query {query:?}"),
            Action::Click(n) => write!(f, "click {n}"),
        }
    }
}

fn perform(router: &mut Router<app::Page>, screen: &Screen, action: &Action) -> anyhow::Result<()> {
    match action {
        Action::Push(path) => router.push(path)?,
        Action::Replace(path) => router.replace(path)?,
        Action::Back => router.go_back()?,
        Action::Forward => router.go_forward()?,
        Action::Query(query) => router.write_query_parameters(query)?,
        Action::Click(n) => {
            let link = screen
                .link(*n)
                .with_context(|| format!("the current page has no link {n}"))?;
            info!(label = link.label(), href = ?link.href(), "clicking");
            link.click()?;
            router.handle_messages()?;
        }
    }
    Ok(())
}

fn print(router: &Router<app::Page>, screen: &Screen) {
    let state = router.state();
    println!("== {} ==", state.location.path());
    match screen.is_empty() {
        true => println!("(nothing matches)"),
        false => print!("{screen}"),
    }
    println!(
        "-- history: {} entries, back: {}, forward: {}",
        state.history_len, state.can_go_back, state.can_go_forward
    );
    println!();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::initialize(args.log.as_deref())?;

    let tree = app::routes().context("invalid route table")?;
    if args.routes {
        for route in tree.sitemap() {
            println!("{route}");
        }
        return Ok(());
    }

    let cfg = RouterConfig::default()
        .history(MemoryHistory::with_initial_path(args.start.as_str()))
        .max_redirects(args.max_redirects);
    let mut router = Router::new(tree, cfg).context("failed to route to the start location")?;

    let mut screen = Screen::render(&router);
    print(&router, &screen);

    for action in &args.actions {
        info!(%action, "performing");
        perform(&mut router, &screen, action).with_context(|| format!("failed to {action}"))?;

        screen = Screen::render(&router);
        print(&router, &screen);
    }

    Ok(())
}
