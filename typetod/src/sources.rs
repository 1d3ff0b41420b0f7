use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use derive_more::From;
use scribe::{ContentItem, ContentSource, FetchError, OnPop, ResourceQueue, SharedSource};
use thiserror::Error;

use crate::config::{Settings, SourceKind};

pub mod feed;
pub mod files;
pub mod fortune;
pub mod piped;

pub use piped::PipedSource;

#[derive(Debug, Error, From)]
pub enum SourceError {
    #[error("The file '{}' doesn't exist", .0.display())]
    #[from(skip)]
    MissingFile(PathBuf),

    #[error("'{}' is a directory. Use -r to search it", .0.display())]
    #[from(skip)]
    Directory(PathBuf),

    #[error("Failed to read directory '{}': {error}", directory.display())]
    #[from(skip)]
    ReadDirectory {
        directory: PathBuf,
        error: io::Error,
    },

    #[error("Unable to find '{tool}' in path: {error}")]
    #[from(skip)]
    ToolMissing { tool: String, error: which::Error },

    #[error("Failed to generate samples: {0}")]
    Generate(FetchError),

    #[error("Could not fetch the feed at '{url}': {error}")]
    #[from(skip)]
    FeedUnreachable { url: String, error: minreq::Error },

    #[error("The feed at '{url}' answered with status {status}")]
    #[from(skip)]
    FeedStatus { url: String, status: i32 },

    #[error("The feed is not valid UTF-8: {0}")]
    #[from(skip)]
    FeedEncoding(minreq::Error),

    #[error("No item found in the feed")]
    #[from(skip)]
    EmptyFeed,
}

/// Build the content source selected by `settings`
///
/// Everything that can fail up front (missing files, missing tools, an unreachable feed) fails
/// here, before the terminal is touched.
pub fn resolve(settings: &Settings, args: &[String]) -> Result<SharedSource, SourceError> {
    let source = match settings.source {
        SourceKind::Fortune => shared(fortune::queue(settings.tab_width)?),
        SourceKind::Files => {
            let items = files::collect(args, settings.recursive)?
                .into_iter()
                .map(|file| Box::new(file) as Box<dyn ContentItem>);
            shared(ResourceQueue::new(items, OnPop::Remove))
        }
        SourceKind::Feed => {
            let url = args.first().map_or("", String::as_str);
            shared(feed::queue(url)?)
        }
        SourceKind::Piped => shared(PipedSource::stdin()),
    };

    tracing::info!(kind = %settings.source, "Content source ready");
    Ok(source)
}

fn shared(source: impl ContentSource + 'static) -> SharedSource {
    Arc::new(Mutex::new(source))
}
