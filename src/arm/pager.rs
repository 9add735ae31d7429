use std::collections::HashSet;
use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;

use super::client::{ArmClient, read_json};
use super::types::ArmList;
use super::ArmError;

/// Follows `nextLink` one page at a time.
pub struct Pager<T> {
    client: ArmClient,
    next_url: Option<String>,
    fetched: HashSet<String>,
    pages: usize,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> Pager<T> {
    pub(crate) fn new(client: ArmClient, first_url: String) -> Self {
        Self {
            client,
            next_url: Some(first_url),
            fetched: HashSet::new(),
            pages: 0,
            _marker: PhantomData,
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// The next page, or `None` once the last page has been returned.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>, ArmError> {
        let Some(url) = self.next_url.take() else {
            return Ok(None);
        };

        if !self.fetched.insert(url.clone()) {
            return Err(ArmError::PaginationLoop { next_link: url });
        }

        let response = self.client.send(Method::GET, &url, None).await?;
        let response = self.client.check_status(response, &[200], &url).await?;
        let page: ArmList<T> = read_json(response).await?;

        self.pages += 1;
        self.next_url = page.next_link.filter(|link| !link.is_empty());

        tracing::debug!(
            page = self.pages,
            count = page.value.len(),
            has_more = self.next_url.is_some(),
            "fetched page"
        );

        Ok(Some(page.value))
    }

    pub async fn collect_all(mut self) -> Result<Vec<T>, ArmError> {
        let mut all_results = Vec::new();
        while let Some(page) = self.next_page().await? {
            all_results.extend(page);
        }
        Ok(all_results)
    }
}
