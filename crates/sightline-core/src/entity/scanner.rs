//! Enumeration of the target's two-level entity list.

use tracing::trace;

use crate::memory::layout::entity_list;
use crate::memory::{ReadMemory, RemoteAddr};

/// Shape of the entity list: a page-pointer array followed by pages of
/// fixed-stride slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityListLayout {
    pub pointer_size: u64,
    pub page_array_offset: u64,
    pub page_shift: u32,
    pub slot_mask: u64,
    pub slot_stride: u64,
}

impl Default for EntityListLayout {
    fn default() -> Self {
        Self {
            pointer_size: entity_list::POINTER_SIZE,
            page_array_offset: entity_list::PAGE_ARRAY_OFFSET,
            page_shift: entity_list::PAGE_SHIFT,
            slot_mask: entity_list::SLOT_MASK,
            slot_stride: entity_list::SLOT_STRIDE,
        }
    }
}

impl EntityListLayout {
    pub fn page_index(&self, index: u64) -> u64 {
        index >> self.page_shift
    }

    pub fn slot_index(&self, index: u64) -> u64 {
        index & self.slot_mask
    }

    /// Address holding the pointer to the page that contains `index`.
    pub fn page_pointer_address(&self, list: RemoteAddr, index: u64) -> RemoteAddr {
        list.offset(
            self.page_index(index)
                .wrapping_mul(self.pointer_size)
                .wrapping_add(self.page_array_offset),
        )
    }

    /// Address of the slot for `index` inside an already resolved page.
    pub fn slot_address(&self, page: RemoteAddr, index: u64) -> RemoteAddr {
        page.offset(self.slot_index(index).wrapping_mul(self.slot_stride))
    }

    /// Follow both hops for `index`. `None` if either hop fails or is null.
    pub fn resolve<R: ReadMemory + ?Sized>(
        &self,
        reader: &R,
        list: RemoteAddr,
        index: u64,
    ) -> Option<RemoteAddr> {
        let page = reader
            .read_ptr(self.page_pointer_address(list, index))
            .ok()?
            .non_null()?;
        reader
            .read_ptr(self.slot_address(page, index))
            .ok()?
            .non_null()
    }

    /// Resolve an entity handle, which carries flag bits above the index.
    pub fn resolve_handle<R: ReadMemory + ?Sized>(
        &self,
        reader: &R,
        list: RemoteAddr,
        handle: u32,
    ) -> Option<RemoteAddr> {
        self.resolve(
            reader,
            list,
            u64::from(handle) & entity_list::HANDLE_INDEX_MASK,
        )
    }
}

/// Walks the entity list and yields controller addresses in index order.
pub struct EntityScanner<'a, R: ReadMemory + ?Sized> {
    reader: &'a R,
    layout: EntityListLayout,
    max_entities: u32,
}

impl<'a, R: ReadMemory + ?Sized> EntityScanner<'a, R> {
    pub fn new(reader: &'a R, layout: EntityListLayout) -> Self {
        Self {
            reader,
            layout,
            max_entities: entity_list::MAX_CONTROLLERS,
        }
    }

    pub fn with_max_entities(mut self, max_entities: u32) -> Self {
        self.max_entities = max_entities;
        self
    }

    /// Candidate controllers for indices `0..max_entities`.
    ///
    /// A failed or null hop skips that index only.
    pub fn scan(&self, list: RemoteAddr) -> Vec<RemoteAddr> {
        let controllers: Vec<_> = (0..u64::from(self.max_entities))
            .filter_map(|index| {
                let entry = self.layout.resolve(self.reader, list, index);
                if entry.is_none() {
                    trace!("entity list index {} unresolved", index);
                }
                entry
            })
            .collect();
        trace!(
            "scanned {} of {} entity list slots",
            controllers.len(),
            self.max_entities
        );
        controllers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    const LIST: u64 = 0x10_0000;
    const PAGE0: u64 = 0x20_0000;
    const PAGE1: u64 = 0x30_0000;

    #[test]
    fn test_page_and_slot_boundaries() {
        let layout = EntityListLayout::default();
        assert_eq!((layout.page_index(0), layout.slot_index(0)), (0, 0));
        assert_eq!((layout.page_index(511), layout.slot_index(511)), (0, 511));
        assert_eq!((layout.page_index(512), layout.slot_index(512)), (1, 0));
    }

    #[test]
    fn test_addresses() {
        let layout = EntityListLayout::default();
        let list = RemoteAddr::new(LIST);
        assert_eq!(layout.page_pointer_address(list, 0).get(), LIST + 0x10);
        assert_eq!(layout.page_pointer_address(list, 511).get(), LIST + 0x10);
        assert_eq!(layout.page_pointer_address(list, 512).get(), LIST + 0x18);

        let page = RemoteAddr::new(PAGE0);
        assert_eq!(layout.slot_address(page, 0).get(), PAGE0);
        assert_eq!(layout.slot_address(page, 511).get(), PAGE0 + 511 * 0x70);
        assert_eq!(layout.slot_address(page, 512).get(), PAGE0);
    }

    #[test]
    fn test_resolve_across_pages() {
        let reader = MockMemoryBuilder::new()
            .write_u64(LIST + 0x10, PAGE0)
            .write_u64(LIST + 0x18, PAGE1)
            .write_u64(PAGE0, 0xA000)
            .write_u64(PAGE0 + 511 * 0x70, 0xB000)
            .write_u64(PAGE1, 0xC000)
            .build();
        let layout = EntityListLayout::default();
        let list = RemoteAddr::new(LIST);

        assert_eq!(layout.resolve(&reader, list, 0), Some(RemoteAddr::new(0xA000)));
        assert_eq!(layout.resolve(&reader, list, 511), Some(RemoteAddr::new(0xB000)));
        assert_eq!(layout.resolve(&reader, list, 512), Some(RemoteAddr::new(0xC000)));
    }

    #[test]
    fn test_resolve_handle_masks_flag_bits() {
        let reader = MockMemoryBuilder::new()
            .write_u64(LIST + 0x10, PAGE0)
            .write_u64(PAGE0 + 3 * 0x70, 0xD000)
            .build();
        let layout = EntityListLayout::default();

        assert_eq!(
            layout.resolve_handle(&reader, RemoteAddr::new(LIST), 0x0A_8003),
            Some(RemoteAddr::new(0xD000))
        );
    }

    #[test]
    fn test_scan_skips_null_and_unreadable_entries() {
        let reader = MockMemoryBuilder::new()
            .write_u64(LIST + 0x10, PAGE0)
            .write_u64(PAGE0 + 0x70, 0xA000)
            .write_u64(PAGE0 + 2 * 0x70, 0)
            .write_u64(PAGE0 + 3 * 0x70, 0xB000)
            .build();

        let scanner =
            EntityScanner::new(&reader, EntityListLayout::default()).with_max_entities(8);
        assert_eq!(
            scanner.scan(RemoteAddr::new(LIST)),
            vec![RemoteAddr::new(0xA000), RemoteAddr::new(0xB000)]
        );
    }

    #[test]
    fn test_scan_null_page_yields_nothing() {
        let reader = MockMemoryBuilder::new().write_u64(LIST + 0x10, 0).build();
        let scanner = EntityScanner::new(&reader, EntityListLayout::default());
        assert!(scanner.scan(RemoteAddr::new(LIST)).is_empty());
        // One page-pointer read per index, no slot reads behind a null page
        assert_eq!(reader.read_count(), 64);
    }
}
