//! Plans every page of the site from aggregated [`Content`]: the paginated
//! article listing, one page per article, and a paginated listing per author.
//!
//! Pages are registered with a [`PageSink`] in that order.

use crate::aggregate::Content;
use crate::config::ThemeOptions;
use crate::model::{Article, Author};
use crate::page::*;
use crate::paths;
use std::fmt;
use tracing::{debug, info};

/// Registers all pages for `content` with `sink`.
pub fn plan_pages<S: PageSink>(
    options: &ThemeOptions,
    content: &Content,
    sink: &mut S,
) -> Result<(), Error<S::Error>> {
    if options.page_length == 0 {
        return Err(Error::ZeroPageLength);
    }
    let public = content.public();

    info!(base_path = %options.base_path, "Creating articles page");
    paginate(
        Paginated {
            edges: &public,
            path_prefix: &options.base_path,
            page_length: options.page_length,
            template: &options.templates.articles,
            additional: ListingExtras::Articles {
                authors: content.authors.clone(),
                base_path: options.base_path.clone(),
                skip: options.page_length,
                limit: options.page_length,
            },
        },
        sink,
    )?;

    info!(articles = content.articles.len(), "Creating article posts");
    for (index, article) in content.articles.iter().enumerate() {
        let authors = authors_for::<S::Error>(article, &content.authors)?;
        let page = article_page(options, article, authors, next_articles(index, &public));
        debug!(path = %page.path, "Creating article page");
        sink.create_page(page).map_err(Error::Sink)?;
    }

    if options.authors_page {
        info!(authors_path = %options.authors_path, "Creating authors page");
        for author in &content.authors {
            let written = articles_by(author, &public);
            paginate(
                Paginated {
                    edges: &written,
                    path_prefix: &author.slug,
                    page_length: options.page_length,
                    template: &options.templates.author,
                    additional: ListingExtras::Author {
                        author: author.clone(),
                        original_path: paths::slugify(&author.slug, &options.authors_path),
                        skip: options.page_length,
                        limit: options.page_length,
                    },
                },
                sink,
            )?;
        }
    }

    Ok(())
}

fn article_page(
    options: &ThemeOptions,
    article: &Article,
    authors: Vec<&Author>,
    next: Vec<&Article>,
) -> Page {
    Page {
        path: article.slug.clone(),
        component: options.templates.article.clone(),
        context: Context::Article(Box::new(ArticleContext {
            article: article.clone(),
            authors: authors.into_iter().cloned().collect(),
            base_path: options.base_path.clone(),
            permalink: format!("{}{}/", options.site_url, article.slug),
            slug: article.slug.clone(),
            id: article.id.clone(),
            title: article.title.clone(),
            canonical_url: article.canonical_url.clone(),
            mailchimp: options.mailchimp.clone(),
            next: next.into_iter().cloned().collect(),
        })),
    }
}

/// Picks the articles suggested after the article at position `index` of the
/// full (newest first) article list: the next two public articles, wrapping
/// around to the newest ones at the end of the list.
pub fn next_articles<'a>(index: usize, public: &[&'a Article]) -> Vec<&'a Article> {
    let mut next: Vec<&Article> = public.iter().skip(index + 1).take(2).copied().collect();
    if next.is_empty() {
        next = public.iter().take(2).copied().collect();
    }
    if next.len() == 1 && public.len() != 2 {
        next.push(public[0]);
    }
    if public.len() == 1 {
        next.clear();
    }
    next
}

/// Returns the known authors named (case-insensitively) in the article's
/// comma-separated author list.
pub fn authors_for<'a, E>(article: &Article, authors: &'a [Author]) -> Result<Vec<&'a Author>, Error<E>> {
    let names: Vec<String> = article
        .author
        .split(',')
        .map(|name| name.trim().to_lowercase())
        .collect();
    let found: Vec<&Author> = authors
        .iter()
        .filter(|author| names.contains(&author.name.to_lowercase()))
        .collect();
    if found.is_empty() {
        return Err(Error::UnknownAuthor {
            title: article.title.clone(),
            author: article.author.clone(),
        });
    }
    Ok(found)
}

/// Returns the public articles whose author list mentions `author`.
pub fn articles_by<'a>(author: &Author, public: &[&'a Article]) -> Vec<&'a Article> {
    let name = author.name.to_lowercase();
    public
        .iter()
        .filter(|article| article.author.to_lowercase().contains(&name))
        .copied()
        .collect()
}

/// A listing to be split into pages of `page_length` articles. Page `n` lives
/// at [`paths::paginated_path`]`(n, path_prefix)`.
pub struct Paginated<'a> {
    pub edges: &'a [&'a Article],
    pub path_prefix: &'a str,
    pub page_length: usize,
    pub template: &'a str,
    pub additional: ListingExtras,
}

/// Registers the pages of a [`Paginated`] listing. An empty listing has no
/// pages.
pub fn paginate<S: PageSink>(listing: Paginated, sink: &mut S) -> Result<(), Error<S::Error>> {
    if listing.page_length == 0 {
        return Err(Error::ZeroPageLength);
    }
    let page_count = (listing.edges.len() + listing.page_length - 1) / listing.page_length;
    for (i, chunk) in listing.edges.chunks(listing.page_length).enumerate() {
        let index = i + 1;
        let page = Page {
            path: paths::paginated_path(index, listing.path_prefix),
            component: listing.template.to_owned(),
            context: Context::Listing(ListingContext {
                group: chunk.iter().map(|&article| article.clone()).collect(),
                index,
                first: index == 1,
                last: index == page_count,
                page_count,
                path_prefix: listing.path_prefix.to_owned(),
                additional: listing.additional.clone(),
            }),
        };
        debug!(path = %page.path, "Creating listing page");
        sink.create_page(page).map_err(Error::Sink)?;
    }
    Ok(())
}

/// Represents an error planning pages. `E` is the [`PageSink`]'s error type.
#[derive(Debug)]
pub enum Error<E> {
    /// Returned when an article names no known author.
    UnknownAuthor { title: String, author: String },

    /// Returned when listings are configured with zero articles per page.
    ZeroPageLength,

    /// Returned when the sink rejects a page.
    Sink(E),
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownAuthor { title, author } => write!(
                f,
                "We could not find the author for \"{}\". Check that the \
                 article's author field names a configured author. Provided \
                 author: {}",
                title, author
            ),
            Error::ZeroPageLength => write!(f, "`page_length` must be at least 1"),
            Error::Sink(err) => err.fmt(f),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for Error<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Sink(err) => Some(err),
            _ => None,
        }
    }
}
