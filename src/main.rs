use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use env_logger::Env;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use shortcut_admin::config::Config;
use shortcut_admin::handlers::link_handlers::Presenter;
use shortcut_admin::routes::commands::{Flow, dispatch, parse};
use shortcut_admin::services::link_service::HttpLinkService;
use shortcut_admin::views::table::TableView;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::parse();
    let service = HttpLinkService::new(&config.origin, config.credentials())
        .with_context(|| format!("Cannot manage links at {}", config.origin))?;
    log::info!("Managing links at {}", service.endpoint());

    let mut presenter = Presenter::new(service, config.origin.clone());
    if let Some(seed) = &config.seed {
        presenter
            .import_file(seed)
            .with_context(|| format!("Failed to load seed file {}", seed.display()))?;
    }

    let view = TableView {
        color: !config.no_color,
    };
    let mut stdout = std::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                write!(stdout, "{}", e.render())?;
                continue;
            }
        };
        if dispatch(&mut presenter, command, &view, &mut stdout).await? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
