//! Maps each source's raw record shapes onto the canonical [`Article`] and
//! [`Author`] types.

use crate::config::ThemeOptions;
use crate::model::{Article, Author};
use crate::{contentful, local, paths};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::fmt;

/// Average reading speed used to estimate [`Article::time_to_read`].
const WORDS_PER_MINUTE: usize = 265;

/// Converts a raw source record into a canonical record of type `T`.
pub trait Normalize<T> {
    fn normalize(self, options: &ThemeOptions) -> Result<T>;
}

impl Normalize<Article> for local::RawArticle {
    fn normalize(self, options: &ThemeOptions) -> Result<Article> {
        let date_for_seo = parse_date(&self.id, &self.date)?;
        let slug = paths::slugify(
            self.slug.as_deref().unwrap_or(&self.title),
            &options.base_path,
        );
        Ok(Article {
            time_to_read: time_to_read(&self.body),
            date: display_date(&date_for_seo),
            date_for_seo,
            slug,
            id: self.id,
            title: self.title,
            author: self.author,
            secret: self.secret,
            excerpt: self.excerpt,
            canonical_url: self.canonical_url,
            hero: self.hero,
            subscription: self.subscription,
        })
    }
}

impl Normalize<Article> for contentful::RawArticle {
    fn normalize(self, options: &ThemeOptions) -> Result<Article> {
        let date_for_seo = parse_date(&self.id, &self.date)?;
        Ok(Article {
            time_to_read: time_to_read(self.body.as_deref().unwrap_or_default()),
            date: display_date(&date_for_seo),
            date_for_seo,
            slug: paths::join(&[&options.base_path, &self.slug]),
            author: self
                .author
                .into_iter()
                .map(|a| a.name)
                .collect::<Vec<_>>()
                .join(", "),
            id: self.id,
            title: self.title,
            secret: self.secret,
            excerpt: self.excerpt,
            canonical_url: self.canonical_url,
            hero: self.hero.map(|image| image.url),
            subscription: self.subscription,
        })
    }
}

impl Normalize<Author> for local::RawAuthor {
    fn normalize(self, options: &ThemeOptions) -> Result<Author> {
        Ok(Author {
            slug: paths::slugify(
                &self.name,
                &paths::join(&[&options.base_path, &options.authors_path]),
            ),
            name: self.name,
            bio: self.bio,
            avatar: self.avatar,
            featured: self.featured,
        })
    }
}

impl Normalize<Author> for contentful::RawAuthor {
    fn normalize(self, options: &ThemeOptions) -> Result<Author> {
        Ok(Author {
            slug: paths::join(&[&options.base_path, &options.authors_path, &self.slug]),
            name: self.name,
            bio: self.bio,
            avatar: self.avatar.map(|image| image.url),
            featured: self.featured,
        })
    }
}

/// Timestamp layouts without an offset. Fractional seconds are optional.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%MZ"];

/// Timestamp layouts with an offset, beyond what RFC 3339 covers.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];

/// Parses a plain `YYYY-MM-DD` date (midnight), an RFC 3339 timestamp, or a
/// timestamp at minute precision with or without an offset. Timestamps with
/// an offset are converted to UTC; timestamps without one are taken as UTC.
fn parse_date(id: &str, date: &str) -> Result<NaiveDateTime> {
    let date = date.trim();
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, format) {
            return Ok(dt);
        }
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(date, format) {
            return Ok(dt.naive_utc());
        }
    }
    DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.naive_utc())
        .map_err(|err| Error::InvalidDate {
            id: id.to_owned(),
            date: date.to_owned(),
            err,
        })
}

/// Formats a date the way article pages display it, e.g. `April 30th, 2019`.
fn display_date(date: &NaiveDateTime) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%B"), day, suffix, date.year())
}

fn time_to_read(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    let minutes = (words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE;
    minutes.max(1) as u32
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a raw record which can't be normalized.
#[derive(Debug)]
pub enum Error {
    /// Returned when a record's date matches none of the accepted layouts.
    InvalidDate {
        id: String,
        date: String,
        err: chrono::ParseError,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidDate { id, date, err } => {
                write!(f, "Invalid date `{}` for `{}`: {}", date, id, err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidDate { err, .. } => Some(err),
        }
    }
}
