use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use todo_client::{ClientConfig, ClientError, DataClient, TodoView, Transport, UreqTransport};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod command;

use command::{Command, HELP};

#[derive(Parser, Debug)]
#[command(name = "todo-app", about = "Terminal client for a GraphQL todo list")]
struct Args {
    /// GraphQL endpoint; overrides the config file and TODO_GRAPHQL_ENDPOINT.
    #[arg(long)]
    endpoint: Option<String>,
    /// Config file to read instead of ./todo-client.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut config = ClientConfig::load(args.config.as_deref()).context("failed to load client configuration")?;
    if let Some(endpoint) = args.endpoint.as_deref() {
        config = config.with_endpoint(endpoint).context("invalid --endpoint")?;
    }
    info!(endpoint = %config.endpoint, "starting todo-app");

    let transport = UreqTransport::new(&config);
    let mut client = DataClient::new(&config, transport);
    let mut view = TodoView::mount(&mut client);

    let mut stdout = io::stdout().lock();
    draw(&mut stdout, &view)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read command")?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => {
                prompt(&mut stdout)?;
                continue;
            }
            Err(err) => {
                writeln!(stdout, "{err:#}")?;
                prompt(&mut stdout)?;
                continue;
            }
        };

        let outcome = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(stdout, "{HELP}")?;
                prompt(&mut stdout)?;
                continue;
            }
            Command::List => Ok(()),
            Command::Add(text) => {
                if !text.is_empty() {
                    view.set_input(text);
                }
                view.submit().map(|_| ())
            }
            Command::Toggle(n) => match row_id(&view, n) {
                Some(id) => view.double_activate(&id).map(|_| ()),
                None => {
                    writeln!(stdout, "no row {n}")?;
                    Ok(())
                }
            },
            Command::Delete(n) => match row_id(&view, n) {
                Some(id) => view.activate_delete(&id).map(|_| ()),
                None => {
                    writeln!(stdout, "no row {n}")?;
                    Ok(())
                }
            },
        };

        report(&mut stdout, outcome)?;
        draw(&mut stdout, &view)?;
    }

    Ok(())
}

fn row_id<T: Transport>(view: &TodoView<'_, T>, n: usize) -> Option<todo_client::TodoId> {
    view.rows().into_iter().nth(n.checked_sub(1)?).map(|row| row.id)
}

fn report(out: &mut impl Write, outcome: Result<(), ClientError>) -> io::Result<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(err) => writeln!(out, "error: {err}"),
    }
}

fn draw<T: Transport>(out: &mut impl Write, view: &TodoView<'_, T>) -> io::Result<()> {
    writeln!(out)?;
    for line in view.render_lines() {
        writeln!(out, "{line}")?;
    }
    if !view.input().is_empty() {
        writeln!(out, "(unsent: {})", view.input())?;
    }
    prompt(out)
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "todo> ")?;
    out.flush()
}
