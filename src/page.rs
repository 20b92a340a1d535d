//! Defines the planned [`Page`] and the [`PageSink`] pages are registered
//! with.

use crate::model::{Article, Author};
use serde::Serialize;

/// A page for the renderer to produce: where it lives, which template renders
/// it, and the data the template receives.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    pub path: String,
    pub component: String,
    pub context: Context,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Context {
    Listing(ListingContext),
    Article(Box<ArticleContext>),
}

/// The context of one page of a paginated listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListingContext {
    /// The articles shown on this page.
    pub group: Vec<Article>,

    /// The 1-based page number.
    pub index: usize,

    pub first: bool,
    pub last: bool,
    pub page_count: usize,
    pub path_prefix: String,

    pub additional: ListingExtras,
}

/// Listing-specific data shared by every page of a listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListingExtras {
    Articles {
        authors: Vec<Author>,
        base_path: String,
        skip: usize,
        limit: usize,
    },
    Author {
        author: Author,
        original_path: String,
        skip: usize,
        limit: usize,
    },
}

/// The context of a single article's page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArticleContext {
    pub article: Article,

    /// The article's authors, in the order the authors are known.
    pub authors: Vec<Author>,

    pub base_path: String,
    pub permalink: String,
    pub slug: String,
    pub id: String,
    pub title: String,
    pub canonical_url: Option<String>,
    pub mailchimp: Option<String>,

    /// Up to two suggested articles to read next.
    pub next: Vec<Article>,
}

/// Receives planned pages.
pub trait PageSink {
    type Error;

    fn create_page(&mut self, page: Page) -> Result<(), Self::Error>;
}

impl PageSink for Vec<Page> {
    type Error = std::convert::Infallible;

    fn create_page(&mut self, page: Page) -> Result<(), Self::Error> {
        self.push(page);
        Ok(())
    }
}
