//! Defines the [`Source`] trait implemented by each content connector and the
//! query step which turns a source's raw records into canonical
//! [`Article`]s and [`Author`]s.

use crate::config::ThemeOptions;
use crate::model::{Article, Author};
use crate::normalize::Normalize;
use serde::Deserialize;
use std::fmt;
use tracing::{error, info};

/// A connection wrapper around a queried record.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> From<T> for Edge<T> {
    fn from(node: T) -> Edge<T> {
        Edge { node }
    }
}

/// A content source. Each source has its own raw record shapes which are
/// normalized via [`Normalize`].
pub trait Source {
    type Article: Normalize<Article>;
    type Author: Normalize<Author>;
    type Error: std::error::Error + 'static;

    /// The name of the source, used in logs.
    fn name(&self) -> &str;

    fn query_authors(&self) -> std::result::Result<Vec<Edge<Self::Author>>, Self::Error>;

    fn query_articles(&self) -> std::result::Result<Vec<Edge<Self::Article>>, Self::Error>;
}

/// The normalized content contributed by a single source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceContent {
    pub articles: Vec<Article>,
    pub authors: Vec<Author>,
}

/// Queries and normalizes the authors and articles of `source`. A record
/// which can't be normalized is logged and skipped; the rest of the source is
/// kept.
pub fn query<S: Source>(source: &S, options: &ThemeOptions) -> Result<SourceContent> {
    let authors = source
        .query_authors()
        .map_err(|err| Error::Query(Box::new(err)))?;
    let articles = source
        .query_articles()
        .map_err(|err| Error::Query(Box::new(err)))?;

    Ok(SourceContent {
        authors: normalize_all(source.name(), authors, options),
        articles: normalize_all(source.name(), articles, options),
    })
}

fn normalize_all<R: Normalize<T>, T>(
    source: &str,
    edges: Vec<Edge<R>>,
    options: &ThemeOptions,
) -> Vec<T> {
    edges
        .into_iter()
        .filter_map(|edge| match edge.node.normalize(options) {
            Ok(record) => Some(record),
            Err(err) => {
                error!(source, "Skipping record: {}", err);
                None
            }
        })
        .collect()
}

/// Like [`query`], but a failing source is logged and contributes nothing
/// instead of failing the build.
pub fn query_or_empty<S: Source>(source: &S, options: &ThemeOptions) -> SourceContent {
    info!(source = source.name(), "Querying authors & articles");
    match query(source, options) {
        Ok(content) => {
            info!(
                source = source.name(),
                authors = content.authors.len(),
                articles = content.articles.len(),
                "Queried source"
            );
            content
        }
        Err(err) => {
            error!(source = source.name(), "{}", err);
            SourceContent::default()
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure to query a source.
#[derive(Debug)]
pub enum Error {
    /// Returned when the source itself fails.
    Query(Box<dyn std::error::Error>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Query(err) => write!(f, "Querying source: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Query(err) => Some(err.as_ref()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::local;
    use std::io;

    struct Failing;

    impl Source for Failing {
        type Article = local::RawArticle;
        type Author = local::RawAuthor;
        type Error = io::Error;

        fn name(&self) -> &str {
            "failing"
        }

        fn query_authors(&self) -> io::Result<Vec<Edge<local::RawAuthor>>> {
            Ok(vec![Edge::from(local::RawAuthor {
                name: String::from("Jane Doe"),
                bio: String::new(),
                avatar: None,
                featured: false,
            })])
        }

        fn query_articles(&self) -> io::Result<Vec<Edge<local::RawArticle>>> {
            Err(io::Error::new(io::ErrorKind::Other, "connection refused"))
        }
    }

    fn raw_article(id: &str, date: &str) -> local::RawArticle {
        local::RawArticle {
            id: id.to_owned(),
            title: id.to_owned(),
            author: String::from("Jane Doe"),
            date: date.to_owned(),
            slug: None,
            secret: false,
            excerpt: String::new(),
            canonical_url: None,
            hero: None,
            subscription: false,
            body: String::new(),
        }
    }

    struct OneBadDate;

    impl Source for OneBadDate {
        type Article = local::RawArticle;
        type Author = local::RawAuthor;
        type Error = io::Error;

        fn name(&self) -> &str {
            "one-bad-date"
        }

        fn query_authors(&self) -> io::Result<Vec<Edge<local::RawAuthor>>> {
            Failing.query_authors()
        }

        fn query_articles(&self) -> io::Result<Vec<Edge<local::RawArticle>>> {
            Ok(vec![
                Edge::from(raw_article("good", "2020-01-02")),
                Edge::from(raw_article("bad", "sometime in spring")),
                Edge::from(raw_article("also-good", "2020-01-03T09:30")),
            ])
        }
    }

    #[test]
    fn test_bad_record_is_skipped() -> Result<()> {
        let content = query(&OneBadDate, &ThemeOptions::default())?;
        let ids: Vec<&str> = content.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(vec!["good", "also-good"], ids);
        assert_eq!(1, content.authors.len());
        Ok(())
    }

    #[test]
    fn test_failing_source_is_empty() {
        assert!(query(&Failing, &ThemeOptions::default()).is_err());
        assert_eq!(
            SourceContent::default(),
            query_or_empty(&Failing, &ThemeOptions::default())
        );
    }
}
