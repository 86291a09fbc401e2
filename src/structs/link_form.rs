use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use clap::Args;

use crate::error::ValidationError;
use crate::models::link::ShortLinkRecord;
use crate::structs::link_request::PutShortcut;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// The edit form: raw field values as the administrator typed them.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkForm {
    /// Slug of the link, generated when omitted on creation
    #[arg(long)]
    pub slug: Option<String>,
    /// Target URL
    #[arg(long)]
    pub url: String,
    /// First day the link redirects (YYYY-MM-DD)
    #[arg(long)]
    pub from_date: Option<String>,
    /// Time of day on the first day (HH:MM or HH:MM:SS)
    #[arg(long)]
    pub from_time: Option<String>,
    /// Last day the link redirects (YYYY-MM-DD)
    #[arg(long)]
    pub to_date: Option<String>,
    /// Time of day on the last day (HH:MM or HH:MM:SS)
    #[arg(long)]
    pub to_time: Option<String>,
    /// Require manual approval before redirecting
    #[arg(long)]
    pub approval: bool,
}

fn filled(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDateTime(value.to_string()))
}

fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ValidationError::InvalidDateTime(value.to_string()))
}

/// Combines a date and a time field into epoch milliseconds in `tz`.
/// Returns `None` when both fields are empty.
fn resolve<Tz: TimeZone>(
    tz: &Tz,
    date: Option<&str>,
    time: Option<&str>,
    default_date: NaiveDate,
) -> Result<Option<i64>, ValidationError> {
    if date.is_none() && time.is_none() {
        return Ok(None);
    }
    let day = date.map(parse_date).transpose()?.unwrap_or(default_date);
    let clock = time.map(parse_time).transpose()?.unwrap_or_default();
    let local = NaiveDateTime::new(day, clock);

    tz.from_local_datetime(&local)
        .earliest()
        .map(|moment| Some(moment.timestamp_millis()))
        .ok_or_else(|| ValidationError::InvalidDateTime(local.to_string()))
}

fn split<Tz: TimeZone>(tz: &Tz, millis: i64) -> (Option<String>, Option<String>) {
    match tz.timestamp_millis_opt(millis).single() {
        Some(moment) => {
            let local = moment.naive_local();
            (
                Some(local.format(DATE_FORMAT).to_string()),
                Some(local.format(TIME_FORMAT).to_string()),
            )
        }
        None => (None, None),
    }
}

impl LinkForm {
    /// Turns the fields into a record. `today` fills a from-time given
    /// without a date; a lone to-time falls on 9999-01-01.
    pub fn to_record<Tz: TimeZone>(
        &self,
        slug: &str,
        tz: &Tz,
        today: NaiveDate,
    ) -> Result<ShortLinkRecord, ValidationError> {
        let far_future = NaiveDate::from_ymd_opt(9999, 1, 1).unwrap_or(NaiveDate::MAX);
        let since = resolve(tz, filled(&self.from_date), filled(&self.from_time), today)?;
        let until = resolve(tz, filled(&self.to_date), filled(&self.to_time), far_future)?;

        Ok(ShortLinkRecord {
            slug: slug.to_string(),
            target_url: self.url.clone(),
            valid_from: since,
            valid_until: until,
            requires_approval: Some(self.approval),
        })
    }

    /// Prefills the form from a listed row.
    pub fn from_row<Tz: TimeZone>(row: &PutShortcut, tz: &Tz) -> Self {
        let (from_date, from_time) = split(tz, row.since);
        let (to_date, to_time) = split(tz, row.until);
        Self {
            slug: Some(row.slug.clone()),
            url: row.url.clone(),
            from_date,
            from_time,
            to_date,
            to_time,
            approval: row.approval,
        }
    }

    /// The `put` command that resubmits this form unchanged.
    pub fn command_line(&self) -> String {
        let mut line = String::from("put");
        if let Some(slug) = &self.slug {
            line.push_str(&format!(" --slug {slug}"));
        }
        line.push_str(&format!(" --url {}", self.url));
        let fields = [
            ("--from-date", &self.from_date),
            ("--from-time", &self.from_time),
            ("--to-date", &self.to_date),
            ("--to-time", &self.to_time),
        ];
        for (flag, value) in fields {
            if let Some(value) = value {
                line.push_str(&format!(" {flag} {value}"));
            }
        }
        if self.approval {
            line.push_str(" --approval");
        }
        line
    }
}
