//! Async iteration over item search results.

use std::collections::VecDeque;

use dti_core::{Item, SearchCursor, SearchQuery};

use crate::client::Client;
use crate::error::Result;

/// Pulls pages from DTI as items are consumed.
///
/// ```no_run
/// # async fn run(client: dti::Client) -> dti::Result<()> {
/// let mut search = client.search(dti::SearchParams::new().query("hat").fits(1, 8))?;
/// while let Some(item) = search.next().await? {
///     println!("{}", item.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Search {
    client: Client,
    cursor: SearchCursor,
    buffer: VecDeque<Item>,
}

impl Search {
    pub(crate) fn new(client: Client, query: SearchQuery) -> Self {
        Self {
            client,
            cursor: SearchCursor::new(query),
            buffer: VecDeque::new(),
        }
    }

    pub fn query(&self) -> &SearchQuery {
        self.cursor.query()
    }

    /// The next result, fetching another page when the current one runs out.
    pub async fn next(&mut self) -> Result<Option<Item>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            let api = self.client.api();
            let Some(request) = self.cursor.next_request(api)? else {
                return Ok(None);
            };
            let response = self.client.send(request).await?;
            let page = self.cursor.parse_page(self.client.api(), response)?;
            tracing::debug!(items = page.len(), offset = self.cursor.offset(), "search page");
            self.buffer.extend(page);
        }
    }

    /// Drain every remaining page.
    pub async fn collect_all(mut self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }
}
