//! The library code for `plume`, which plans the pages of a blog theme. The
//! architecture is a one-directional pipeline:
//!
//! 1. Querying each enabled content source ([`crate::local`],
//!    [`crate::contentful`]) through the [`crate::source::Source`] trait
//! 2. Normalizing each source's raw records into canonical
//!    [`crate::model::Article`]s and [`crate::model::Author`]s
//!    ([`crate::normalize`])
//! 3. Merging, deduplicating, and sorting the content of all sources
//!    ([`crate::aggregate`])
//! 4. Planning pages ([`crate::plan`]) and writing the plan to disk
//!    ([`crate::write`])
//!
//! A source that fails to query is logged and contributes nothing; the build
//! continues with the remaining sources. Planning, on the other hand, fails
//! outright when there is no content at all or when an article names an
//! author that doesn't exist.
//!
//! The plan consists of three groups of pages. The article listing is
//! paginated over all non-secret articles, newest first. Every article
//! (secret or not) gets its own page along with its authors and up to two
//! suggestions of what to read next. Finally, each author gets a paginated
//! listing of their non-secret articles.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod aggregate;
pub mod build;
pub mod config;
pub mod contentful;
pub mod local;
pub mod model;
pub mod normalize;
pub mod page;
pub mod paths;
pub mod plan;
pub mod source;
pub mod write;
