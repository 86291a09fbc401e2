use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::error::PresenterError;
use crate::handlers::link_handlers::{Presenter, Submission};
use crate::handlers::share_handlers::{qr_svg, qr_terminal};
use crate::models::link::now_millis;
use crate::services::link_service::LinkService;
use crate::structs::link_form::LinkForm;
use crate::views::table::TableView;

#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Command,
}

/// Commands of the interactive session.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show the listing
    #[command(alias = "ls")]
    List,
    /// Open an empty edit form
    New,
    /// Create or replace a link
    Put(LinkForm),
    /// Prefill the edit form from a listed link
    Edit { slug: String },
    /// Close the edit form
    Cancel,
    /// Delete a link, or the edited one when no slug is given
    #[command(alias = "rm")]
    Delete { slug: Option<String> },
    /// Print the redirect URL of a link
    Copy { slug: String },
    /// Print the share page and a QR code of a link
    Share {
        slug: String,
        /// Write the QR code as SVG instead of drawing it
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Merge links from a seed file (slug,url,status,since,until)
    Import { path: PathBuf },
    /// Write the listing as a seed file
    Export { path: PathBuf },
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    CommandLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

fn submitted(submission: &Submission, view: &TableView) -> String {
    let (verb, row) = match submission {
        Submission::Created(row) => ("created", row),
        Submission::Updated(row) => ("updated", row),
    };
    format!(
        "{verb} {}\n{}\n",
        row.slug,
        view.row(row, now_millis(), row.slug.chars().count())
    )
}

fn shared<S: LinkService>(
    presenter: &mut Presenter<S>,
    slug: &str,
    svg: Option<PathBuf>,
) -> Result<String, PresenterError> {
    let links = presenter.share(slug)?;
    match svg {
        Some(path) => {
            std::fs::write(&path, qr_svg(&links.redirect)?)?;
            Ok(format!("{}\nwrote {}\n", links.share, path.display()))
        }
        None => Ok(format!("{}\n{}\n", links.share, qr_terminal(&links.redirect)?)),
    }
}

/// Runs one command against the presenter. Presenter failures are written
/// to `out` and never end the session.
pub async fn dispatch<S: LinkService, W: Write>(
    presenter: &mut Presenter<S>,
    command: Command,
    view: &TableView,
    out: &mut W,
) -> io::Result<Flow> {
    let outcome = match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::List => Ok(view.render(presenter.listing(), now_millis())),
        Command::New => {
            presenter.open_create();
            Ok(String::from("new link: put --url <url> [--slug <slug>]\n"))
        }
        Command::Put(form) => presenter
            .submit_form(&form)
            .await
            .map(|submission| submitted(&submission, view)),
        Command::Edit { slug } => presenter
            .open_edit(&slug)
            .map(|form| format!("{}\n", form.command_line())),
        Command::Cancel => {
            presenter.hide();
            Ok(String::new())
        }
        Command::Delete { slug: Some(slug) } => presenter
            .delete(&slug)
            .await
            .map(|_| format!("deleted {slug}\n")),
        Command::Delete { slug: None } => presenter
            .delete_edited()
            .await
            .map(|_| String::from("deleted\n")),
        Command::Copy { slug } => presenter
            .share(&slug)
            .map(|links| format!("{}\n", links.redirect)),
        Command::Share { slug, svg } => shared(presenter, &slug, svg),
        Command::Import { path } => presenter.import_file(&path).map(|report| {
            let mut text = format!("imported {} links\n", report.imported);
            for skipped in &report.skipped {
                text.push_str(&format!("skipped: {skipped}\n"));
            }
            text
        }),
        Command::Export { path } => presenter
            .export_file(&path)
            .map(|count| format!("exported {count} links to {}\n", path.display())),
    };

    match outcome {
        Ok(text) => write!(out, "{text}")?,
        Err(e) => writeln!(out, "error: {e}")?,
    }
    Ok(Flow::Continue)
}
