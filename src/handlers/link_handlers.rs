use chrono::Local;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use url::Url;

use crate::error::{PresenterError, ValidationError};
use crate::handlers::share_handlers::{ShareLinks, share_links};
use crate::models::link::{ShortLinkRecord, now_millis};
use crate::models::listing::{LinkRow, Listing, SeedReport};
use crate::services::link_service::LinkService;
use crate::structs::link_form::LinkForm;
use crate::structs::link_request::PutShortcut;
use crate::utils::slug::generate_slug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Hidden,
    Creating,
    /// Editing a listed link; deletion is armed for its slug.
    Editing { slug: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Created(LinkRow),
    Updated(LinkRow),
}

impl Submission {
    pub fn row(&self) -> &LinkRow {
        match self {
            Submission::Created(row) | Submission::Updated(row) => row,
        }
    }
}

/// Holds the visible listing and the edit form, and talks to the link
/// service. The listing only changes after the service answered.
pub struct Presenter<S: LinkService> {
    service: S,
    origin: Url,
    listing: Listing,
    form: FormState,
    message: Option<String>,
}

impl<S: LinkService> Presenter<S> {
    pub fn new(service: S, origin: Url) -> Self {
        Self::with_listing(service, origin, Listing::default())
    }

    pub fn with_listing(service: S, origin: Url, listing: Listing) -> Self {
        Self {
            service,
            origin,
            listing,
            form: FormState::Hidden,
            message: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// The inline message area: last failure, cleared by a success.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn report<T>(&mut self, result: Result<T, PresenterError>) -> Result<T, PresenterError> {
        match &result {
            Ok(_) => self.message = None,
            Err(e) => self.message = Some(e.to_string()),
        }
        result
    }

    fn close_form(&mut self) {
        self.form = FormState::Hidden;
        self.message = None;
    }

    pub fn open_create(&mut self) {
        self.form = FormState::Creating;
        self.message = None;
    }

    /// Prefills the edit form from the listed row of `slug`.
    pub fn open_edit(&mut self, slug: &str) -> Result<LinkForm, PresenterError> {
        let result = match self.listing.get(slug) {
            Some(row) => Ok(LinkForm::from_row(row, &Local)),
            None => Err(ValidationError::UnknownSlug(slug.to_string()).into()),
        };
        if result.is_ok() {
            self.form = FormState::Editing {
                slug: slug.to_string(),
            };
        }
        self.report(result)
    }

    pub fn hide(&mut self) {
        self.close_form();
    }

    pub fn validate(&self, record: &ShortLinkRecord) -> Result<PutShortcut, ValidationError> {
        record.validate_at(now_millis())
    }

    pub async fn submit(&mut self, record: &ShortLinkRecord) -> Result<Submission, PresenterError> {
        let result = self.put(record).await;
        if result.is_ok() {
            self.close_form();
        }
        self.report(result)
    }

    async fn put(&mut self, record: &ShortLinkRecord) -> Result<Submission, PresenterError> {
        let row = self.validate(record)?;
        let existing = self.listing.contains(&row.slug);

        // Rows stay keyed by the submitted slug whatever the service echoes.
        if let Some(answer) = self.service.put(&row).await? {
            if answer.slug != row.slug {
                log::warn!("Service acknowledged '{}' as '{}'", row.slug, answer.slug);
            }
        }

        self.listing = self.listing.render(row.clone());
        if existing {
            log::info!("Updated '{}' -> {}", row.slug, row.url);
            Ok(Submission::Updated(row))
        } else {
            log::info!("Created '{}' -> {}", row.slug, row.url);
            Ok(Submission::Created(row))
        }
    }

    /// Submits the edit form. A form without slug edits the open link, or
    /// creates a link under a generated slug.
    pub async fn submit_form(&mut self, form: &LinkForm) -> Result<Submission, PresenterError> {
        let slug = match (&form.slug, &self.form) {
            (Some(slug), _) => slug.clone(),
            (None, FormState::Editing { slug }) => slug.clone(),
            (None, _) => generate_slug(),
        };
        let record = form.to_record(&slug, &Local, Local::now().date_naive());
        match record {
            Ok(record) => self.submit(&record).await,
            Err(e) => self.report(Err(e.into())),
        }
    }

    pub async fn delete(&mut self, slug: &str) -> Result<(), PresenterError> {
        let result = self.service.delete(slug).await;
        if let Ok(answer) = &result {
            self.listing = self.listing.without(slug);
            self.close_form();
            match answer {
                Some(answer) => log::info!("Deleted '{}' ({} rows)", slug, answer.rows_affected),
                None => log::info!("Deleted '{}'", slug),
            }
        }
        self.report(result.map(|_| ()))
    }

    /// Deletes the link of the open edit form.
    pub async fn delete_edited(&mut self) -> Result<(), PresenterError> {
        match self.form.clone() {
            FormState::Editing { slug } => self.delete(&slug).await,
            _ => self.report(Err(ValidationError::NoEditForm.into())),
        }
    }

    pub fn share(&mut self, slug: &str) -> Result<ShareLinks, PresenterError> {
        let result = if self.listing.contains(slug) {
            share_links(&self.origin, slug).map_err(PresenterError::from)
        } else {
            Err(ValidationError::UnknownSlug(slug.to_string()).into())
        };
        self.report(result)
    }

    /// Merges a seed file into the listing without contacting the service.
    pub fn import_file(&mut self, path: &Path) -> Result<SeedReport, PresenterError> {
        let result = File::open(path)
            .map(|file| self.listing.import(BufReader::new(file)))
            .map_err(PresenterError::from);
        if let Ok(report) = &result {
            log::info!(
                "Imported {} links from {} ({} skipped)",
                report.imported,
                path.display(),
                report.skipped.len()
            );
        }
        self.report(result)
    }

    pub fn export_file(&mut self, path: &Path) -> Result<usize, PresenterError> {
        let result = File::create(path)
            .map_err(PresenterError::from)
            .and_then(|file| self.listing.export(BufWriter::new(file)))
            .map(|_| self.listing.len());
        self.report(result)
    }
}
