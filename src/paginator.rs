pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: u32,
    page_count: u32,
}

impl<'a, T> Paginator<'a, T> {
    pub fn from(items: &'a [T], page_size: u32) -> Self {
        if items.is_empty() || page_size == 0 {
            return Paginator {
                items,
                page_size,
                page_count: 0,
            };
        }
        let item_count = items.len() as u32;
        let upper_bound = item_count - 1;
        let page_count = (upper_bound / page_size) + 1;

        Paginator {
            items,
            page_size,
            page_count,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Pages are 1-indexed. Page 0 and pages past the end are empty.
    pub fn get_page(&self, page: u32) -> &'a [T] {
        if page == 0 || page > self.page_count {
            return &[];
        }

        let start = ((page - 1) * self.page_size) as usize;
        let end = (start + self.page_size as usize).min(self.items.len());
        &self.items[start..end]
    }
}

pub fn paginate<T>(items: &[T], page_size: u32, page_number: u32) -> &[T] {
    Paginator::from(items, page_size).get_page(page_number)
}
