use crate::HEADER_SIZE;
use crate::errors::header_error::HeaderError;
use crate::errors::page_error::{PageResult, WithPageId};
use crate::errors::page_op_error::PageOpError;
use crate::header::{HeaderMut, HeaderRef};
use crate::page::api::Page;
use crate::page_id::PageId;

/// Accessor methods for the `Page` struct.
impl Page {
    /// Returns the unique identifier of the page.
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Sets the `PageId` field of the page instance
    pub fn set_page_id(&mut self, page_id: PageId) {
        self.page_id = page_id;
    }

    /// Returns the backward chain link stored in the header.
    pub fn prev_page(&self) -> PageResult<PageId> {
        self.link(|header| header.get_prev_page())
    }

    /// Returns the forward chain link stored in the header.
    pub fn next_page(&self) -> PageResult<PageId> {
        self.link(|header| header.get_next_page())
    }

    /// Updates the backward chain link.
    pub fn set_prev_page(&mut self, page_id: PageId) -> PageResult<()> {
        self.set_link(page_id, |header, value| header.set_prev_page(value))
    }

    /// Updates the forward chain link.
    pub fn set_next_page(&mut self, page_id: PageId) -> PageResult<()> {
        self.set_link(page_id, |header, value| header.set_next_page(value))
    }

    fn link(
        &self,
        get: impl FnOnce(&HeaderRef<'_>) -> Result<i32, HeaderError>,
    ) -> PageResult<PageId> {
        let value = self
            .header_ref()
            .and_then(|header| get(&header))
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)?;
        Ok(PageId::new(value))
    }

    fn set_link(
        &mut self,
        page_id: PageId,
        set: impl FnOnce(&mut HeaderMut<'_>, i32) -> Result<(), HeaderError>,
    ) -> PageResult<()> {
        let own_id = self.page_id;
        self.header_mut()
            .and_then(|mut header| set(&mut header, page_id.value()))
            .map_err(PageOpError::from)
            .with_page_id(own_id)
    }

    /// Returns a read-only reference to the page header.
    pub(crate) fn header_ref(&'_ self) -> Result<HeaderRef<'_>, HeaderError> {
        HeaderRef::new(&self.data[..HEADER_SIZE])
    }

    /// Returns a mutable reference to the page header.
    pub(crate) fn header_mut(&'_ mut self) -> Result<HeaderMut<'_>, HeaderError> {
        HeaderMut::new(&mut self.data[..HEADER_SIZE])
    }
}

#[cfg(test)]
mod accessors_tests {
    use super::*;
    use crate::page_type::PageType;

    #[test]
    fn test_get_page_id() {
        let page_id = PageId::new(5);
        let mut page = Page::new_zeroed(page_id);
        page.initialize(page_id, PageType::Directory).unwrap();

        assert_eq!(page.page_id(), page_id);
    }

    #[test]
    fn chain_links_round_trip() {
        let mut page = Page::new_zeroed(PageId::new(2));
        page.initialize(PageId::new(2), PageType::Directory).unwrap();

        assert_eq!(page.prev_page().unwrap(), PageId::INVALID);
        assert_eq!(page.next_page().unwrap(), PageId::INVALID);

        page.set_prev_page(PageId::new(1)).unwrap();
        page.set_next_page(PageId::new(3)).unwrap();

        assert_eq!(page.prev_page().unwrap(), PageId::new(1));
        assert_eq!(page.next_page().unwrap(), PageId::new(3));
    }
}
