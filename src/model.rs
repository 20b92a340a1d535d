//! Defines the canonical [`Article`] and [`Author`] types which every content
//! source is normalized into (see [`crate::normalize`]).

use chrono::NaiveDateTime;
use serde::Serialize;

/// A blog article, regardless of which source it was queried from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Article {
    /// The source-specific identifier of the article.
    pub id: String,

    pub title: String,

    /// The article's path on the site. Unique across all articles.
    pub slug: String,

    /// The names of the article's authors, separated by commas (e.g.,
    /// `Dennis Brotzky, Thiago Costa`).
    pub author: String,

    /// The human-readable publication date (e.g., `April 30th, 2019`).
    pub date: String,

    /// The publication date used for ordering and for search engines.
    pub date_for_seo: NaiveDateTime,

    /// Secret articles are excluded from listing pages and suggestions but
    /// still get a page of their own.
    pub secret: bool,

    pub excerpt: String,

    pub canonical_url: Option<String>,

    /// Estimated reading time in minutes. Never less than 1.
    pub time_to_read: u32,

    pub hero: Option<String>,

    /// Whether the article page should offer a newsletter subscription.
    pub subscription: bool,
}

/// An article author. Authors are identified by `name`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Author {
    pub name: String,

    /// The path of the author's page.
    pub slug: String,

    pub bio: String,

    pub avatar: Option<String>,

    pub featured: bool,
}

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    /// Builds an article dated `2020-01-{day}` written by `author`.
    pub fn article(title: &str, author: &str, day: u32) -> Article {
        Article {
            id: title.to_lowercase(),
            title: title.to_owned(),
            slug: crate::paths::slugify(title, "/"),
            author: author.to_owned(),
            date: format!("January {}, 2020", day),
            date_for_seo: NaiveDate::from_ymd_opt(2020, 1, day)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("valid fixture date"),
            secret: false,
            excerpt: String::new(),
            canonical_url: None,
            time_to_read: 1,
            hero: None,
            subscription: false,
        }
    }

    pub fn secret(mut article: Article) -> Article {
        article.secret = true;
        article
    }

    pub fn author(name: &str) -> Author {
        Author {
            name: name.to_owned(),
            slug: crate::paths::slugify(name, "/authors"),
            bio: String::new(),
            avatar: None,
            featured: false,
        }
    }
}
