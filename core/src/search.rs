//! Item search: picking a query from loose parameters, and paging through it.

use crate::client::DtiClient;
use crate::enums::{ItemKind, LayerImageSize};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::models::Item;

pub const DEFAULT_PER_PAGE: u32 = 30;

/// Loose search parameters, as a caller would fill in a search form.
///
/// Only some combinations make sense; [`SearchParams::into_query`] picks one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: Option<String>,
    pub item_names: Vec<String>,
    pub item_kind: Option<ItemKind>,
    pub species_id: Option<u32>,
    pub color_id: Option<u32>,
    pub item_ids: Vec<u64>,
    pub size: LayerImageSize,
    pub per_page: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: None,
            item_names: Vec::new(),
            item_kind: None,
            species_id: None,
            color_id: None,
            item_ids: Vec::new(),
            size: LayerImageSize::default(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn item_name(mut self, name: impl Into<String>) -> Self {
        self.item_names.push(name.into());
        self
    }

    pub fn item_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn item_kind(mut self, kind: ItemKind) -> Self {
        self.item_kind = Some(kind);
        self
    }

    /// Restrict a text query to items that fit this species/color.
    pub fn fits(mut self, species_id: u32, color_id: u32) -> Self {
        self.species_id = Some(species_id);
        self.color_id = Some(color_id);
        self
    }

    pub fn item_ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.item_ids.extend(ids);
        self
    }

    pub fn size(mut self, size: LayerImageSize) -> Self {
        self.size = size;
        self
    }

    /// Page size for fitted searches. Zero is treated as one.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// First match wins: fitted query, exact names, plain query, ids.
    pub fn into_query(self) -> Result<SearchQuery, ApiError> {
        match self {
            SearchParams {
                query: Some(query),
                species_id: Some(species_id),
                color_id: Some(color_id),
                item_kind,
                size,
                per_page,
                ..
            } => Ok(SearchQuery::ToFit {
                query,
                species_id,
                color_id,
                item_kind,
                size,
                per_page: per_page.max(1),
            }),
            SearchParams { item_names, .. } if !item_names.is_empty() => Ok(SearchQuery::Names(item_names)),
            SearchParams {
                query: Some(query),
                item_kind,
                ..
            } if !query.is_empty() => Ok(SearchQuery::Query { query, item_kind }),
            SearchParams { item_ids, .. } if !item_ids.is_empty() => Ok(SearchQuery::Ids(item_ids)),
            _ => Err(ApiError::NoSearchCriteria),
        }
    }
}

/// One concrete search DTI can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Text search limited to items that fit a species/color. Paginated.
    ToFit {
        query: String,
        species_id: u32,
        color_id: u32,
        item_kind: Option<ItemKind>,
        size: LayerImageSize,
        per_page: u32,
    },
    /// Exact, case-sensitive names. Unknown names are dropped.
    Names(Vec<String>),
    Query {
        query: String,
        item_kind: Option<ItemKind>,
    },
    /// Every id must exist, or the search fails with `InvalidItemId`.
    Ids(Vec<u64>),
}

/// Paging state for a [`SearchQuery`].
///
/// Call [`SearchCursor::next_request`] until it returns `None`, feeding each
/// response to [`SearchCursor::parse_page`].
#[derive(Debug, Clone)]
pub struct SearchCursor {
    query: SearchQuery,
    offset: u32,
    exhausted: bool,
}

impl SearchCursor {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            offset: 0,
            exhausted: false,
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn next_request(&self, client: &DtiClient) -> Result<Option<HttpRequest>, ApiError> {
        if self.exhausted {
            return Ok(None);
        }
        let request = match &self.query {
            SearchQuery::ToFit {
                query,
                species_id,
                color_id,
                item_kind,
                size,
                per_page,
            } => client.build_item_search_to_fit(query, *species_id, *color_id, *item_kind, self.offset, *per_page, *size)?,
            SearchQuery::Names(names) => client.build_items_by_name(names)?,
            SearchQuery::Query { query, item_kind } => client.build_item_search(query, *item_kind)?,
            SearchQuery::Ids(ids) => client.build_items_by_ids(ids)?,
        };
        Ok(Some(request))
    }

    /// Parse one page and advance. A failed page leaves the cursor unchanged.
    pub fn parse_page(&mut self, client: &DtiClient, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        let items = match &self.query {
            SearchQuery::ToFit { .. } | SearchQuery::Query { .. } => client.parse_item_search(response)?,
            SearchQuery::Names(_) => client.parse_items_by_name(response)?,
            SearchQuery::Ids(_) => client.parse_items_by_ids(response)?,
        };
        match &self.query {
            SearchQuery::ToFit { per_page, .. } => {
                self.offset += per_page;
                self.exhausted = (items.len() as u64) < u64::from(*per_page);
            }
            _ => self.exhausted = true,
        }
        Ok(items)
    }
}
