/*++

Licensed under the Apache-2.0 license.

File Name:

    image_info.rs

Abstract:

    File contains the table of images loaded during this boot session.

--*/

use xloader_drivers::{cprintln, SystemMemory};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{ImageHeader, ImageInfoEntry, ImgId, INVALID_IMG_ID};
use zerocopy::AsBytes;

/// Set in the entry count returned by [`ImageInfoTable::store_list`] when
/// an entry was ever dropped for lack of space
pub const IMAGE_INFO_OVERFLOW: u32 = 1 << 31;

pub struct ImageInfoTable {
    entries: Vec<ImageInfoEntry>,
    capacity: usize,
    overflowed: bool,
}

impl ImageInfoTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn entries(&self) -> &[ImageInfoEntry] {
        &self.entries
    }

    /// Look up the entry of a loaded image.
    ///
    /// # Returns
    ///
    /// * `LoaderError::LOADER_INVALID_IMGID` for the invalid id
    /// * `LoaderError::LOADER_NO_VALID_IMG_FOUND` if the image is not loaded
    pub fn get(&self, img_id: u32) -> LoaderResult<&ImageInfoEntry> {
        if img_id == INVALID_IMG_ID {
            Err(LoaderError::LOADER_INVALID_IMGID)?;
        }
        self.entries
            .iter()
            .find(|e| e.img_id == img_id)
            .ok_or(LoaderError::LOADER_NO_VALID_IMG_FOUND)
    }

    /// Reconfigurable images need their parent loaded first
    pub fn check_parent(&self, ih: &ImageHeader) -> LoaderResult<()> {
        if !ImgId::is_dfx(ih.img_id) || ih.puid == 0 {
            return Ok(());
        }
        if !self.entries.iter().any(|e| e.uid == ih.puid) {
            cprintln!(
                "[xloader] Parent 0x{:08x} of image 0x{:08x} not loaded",
                ih.puid,
                ih.img_id
            );
            Err(LoaderError::LOADER_IMG_PARENT_NOT_LOADED)?;
        }
        Ok(())
    }

    /// Drops the reconfigurable descendants of `uid`
    fn invalidate_children(&mut self, uid: u32) {
        let mut parents = vec![uid];
        while let Some(parent) = parents.pop() {
            let mut idx = 0;
            while idx < self.entries.len() {
                let entry = self.entries[idx];
                if entry.puid == parent && entry.uid != parent && ImgId::is_dfx(entry.img_id) {
                    parents.push(entry.uid);
                    self.entries.remove(idx);
                } else {
                    idx += 1;
                }
            }
        }
    }

    /// Record a loaded image, replacing any entry with the same id.
    ///
    /// # Arguments
    ///
    /// * `ih` - Header of the loaded image
    pub fn upsert(&mut self, ih: &ImageHeader) -> LoaderResult<()> {
        if ih.img_id == INVALID_IMG_ID {
            return Ok(());
        }
        let entry = ImageInfoEntry {
            img_id: ih.img_id,
            uid: ih.uid,
            puid: ih.puid,
            func_id: ih.func_id,
        };
        let existing = self.entries.iter().position(|e| e.img_id == ih.img_id);
        if existing.is_none() && self.entries.len() >= self.capacity {
            self.overflowed = true;
            Err(LoaderError::LOADER_IMAGE_INFO_TBL_FULL)?;
        }
        if let Some(idx) = existing {
            let old_uid = self.entries[idx].uid;
            self.invalidate_children(old_uid);
        }
        self.invalidate_children(entry.uid);

        // Children may sit before the entry, so find it again
        match self.entries.iter().position(|e| e.img_id == ih.img_id) {
            Some(idx) => self.entries[idx] = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// Copy the table to memory.
    ///
    /// # Arguments
    ///
    /// * `mem` - System memory
    /// * `dst` - Destination address
    /// * `max_entries` - Entries the destination can hold
    ///
    /// # Returns
    ///
    /// * Number of entries, with [`IMAGE_INFO_OVERFLOW`] set if the table
    ///   ever overflowed
    pub fn store_list(&self, mem: &mut SystemMemory, dst: u64, max_entries: u32) -> LoaderResult<u32> {
        if (max_entries as usize) < self.entries.len() {
            Err(LoaderError::LOADER_INVALID_DEST_IMGINFOTBL_SIZE)?;
        }
        mem.write(dst, self.entries.as_slice().as_bytes())?;
        let mut num = self.entries.len() as u32;
        if self.overflowed {
            num |= IMAGE_INFO_OVERFLOW;
        }
        Ok(num)
    }
}
