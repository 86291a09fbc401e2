use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::{PresenterError, ValidationError};
use crate::models::link::{ShortLinkRecord, TrustState};
use crate::structs::link_request::PutShortcut;

/// A listed link: the record as acknowledged by the link service.
pub type LinkRow = PutShortcut;

/// Line of a seed or backup file: `slug,url,status,since,until`.
#[derive(Serialize, Deserialize, Debug)]
struct SeedLine {
    slug: String,
    url: String,
    status: String,
    since: i64,
    until: i64,
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub imported: usize,
    pub skipped: Vec<ValidationError>,
}

/// The visible rows, in display order, at most one per slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    rows: Vec<LinkRow>,
}

impl Listing {
    pub fn new(rows: Vec<LinkRow>) -> Self {
        let mut listing = Self::default();
        for row in rows {
            listing.upsert(row);
        }
        listing
    }

    pub fn rows(&self) -> &[LinkRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&LinkRow> {
        self.rows.iter().find(|row| row.slug == slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    /// The listing with `row` replacing the row of the same slug in place,
    /// or appended when the slug is new.
    pub fn render(&self, row: LinkRow) -> Listing {
        let mut next = self.clone();
        next.upsert(row);
        next
    }

    /// The listing without the row of `slug`.
    pub fn without(&self, slug: &str) -> Listing {
        let mut next = self.clone();
        next.remove(slug);
        next
    }

    pub fn upsert(&mut self, row: LinkRow) {
        match self.rows.iter_mut().find(|current| current.slug == row.slug) {
            Some(current) => *current = row,
            None => self.rows.push(row),
        }
    }

    pub fn remove(&mut self, slug: &str) -> Option<LinkRow> {
        let index = self.rows.iter().position(|row| row.slug == slug)?;
        Some(self.rows.remove(index))
    }

    /// Merges the rows of a seed file. Lines that do not hold a valid link
    /// are skipped and reported.
    pub fn import<R: Read>(&mut self, reader: R) -> SeedReport {
        let mut report = SeedReport::default();
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        for (index, line) in csv.deserialize::<SeedLine>().enumerate() {
            let line_number = index as u64 + 1;
            match line.map_err(|e| e.to_string()).and_then(|line| seed_row(&line)) {
                Ok(row) => {
                    self.upsert(row);
                    report.imported += 1;
                }
                Err(reason) => {
                    log::warn!("Skipping seed line {}: {}", line_number, reason);
                    report.skipped.push(ValidationError::InvalidSeed {
                        line: line_number,
                        reason,
                    });
                }
            }
        }
        report
    }

    /// Writes every row in the seed file format.
    pub fn export<W: Write>(&self, writer: W) -> Result<(), PresenterError> {
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        for row in &self.rows {
            csv.serialize(SeedLine {
                slug: row.slug.clone(),
                url: row.url.clone(),
                status: row.trust_state().to_string(),
                since: row.since,
                until: row.until,
            })?;
        }
        csv.flush()?;
        Ok(())
    }
}

fn seed_row(line: &SeedLine) -> Result<LinkRow, String> {
    let trust = TrustState::parse(&line.status)
        .ok_or_else(|| format!("unknown status '{}'", line.status))?;
    // Session commands are split on whitespace, so such slugs could never be addressed.
    if line.slug.chars().any(char::is_whitespace) {
        return Err(format!("slug '{}' contains whitespace", line.slug));
    }
    ShortLinkRecord::new(line.slug.clone(), line.url.clone())
        .valid_from(line.since)
        .valid_until(line.until)
        .requires_approval(trust.requires_approval())
        .validate_at(line.since)
        .map_err(|e| e.to_string())
}
