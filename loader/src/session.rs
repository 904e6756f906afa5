/*++

Licensed under the Apache-2.0 license.

File Name:

    session.rs

Abstract:

    File contains the state of one PDI load and the remembered PDIs the
    loader can restart images from.

--*/

use crate::handoff::DelayedHandoffs;
use std::collections::VecDeque;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::PdiSrc;
use xloader_image_verify::PdiKind;

/// Where a PDI can be read from again
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PdiLocation {
    pub src: PdiSrc,
    /// Device init flags: raw boot mode nibble and multiboot value
    pub flags: u32,
    /// Media offset of the PDI on the device
    pub base: u64,
    pub kind: PdiKind,
    /// Id of a PDI read from the image store. The store compacts on
    /// removal, so `base` is only valid for the load that resolved it.
    pub store_id: Option<u32>,
}

impl PdiLocation {
    /// Whether both locations name the same PDI
    pub fn same_pdi(&self, other: &PdiLocation) -> bool {
        match (self.store_id, other.store_id) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

/// Destination of PL data while a PDI is read back
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReadbackTarget {
    pub dst: u64,
    pub max_len: u64,
    pub processed: u64,
}

impl ReadbackTarget {
    pub fn new(dst: u64, max_len: u64) -> Self {
        Self {
            dst,
            max_len,
            processed: 0,
        }
    }

    /// Reserves `len` bytes and returns where they go
    pub fn reserve(&self, len: u64) -> LoaderResult<u64> {
        if self.processed + len > self.max_len {
            Err(LoaderError::LOADER_READBACK_BUFFER_OVERFLOW)?;
        }
        Ok(self.dst + self.processed)
    }
}

/// State of the PDI being loaded
pub struct PdiSession {
    pub location: PdiLocation,
    /// Device and base partitions are read from; differs from `location`
    /// once a secondary boot device takes over
    pub data_src: PdiSrc,
    pub data_base: u64,
    pub pdi_id: u32,
    pub img_idx: usize,
    pub prtn_idx: usize,
    pub delayed: DelayedHandoffs,
    pub readback: Option<ReadbackTarget>,
}

impl PdiSession {
    pub fn new(location: PdiLocation, max_delayed_handoffs: usize) -> Self {
        Self {
            location,
            data_src: location.src,
            data_base: location.base,
            pdi_id: 0,
            img_idx: 0,
            prtn_idx: 0,
            delayed: DelayedHandoffs::new(max_delayed_handoffs),
            readback: None,
        }
    }

    pub fn with_readback(mut self, readback: ReadbackTarget) -> Self {
        self.readback = Some(readback);
        self
    }
}

/// Partial PDIs loaded in this boot session, oldest first
pub struct RestartList {
    pdis: VecDeque<(u32, PdiLocation)>,
    capacity: usize,
}

impl RestartList {
    pub fn new(capacity: usize) -> Self {
        Self {
            pdis: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Remembers a PDI; a PDI already known at the same place moves to the
    /// front and the oldest entry makes room when the list is full
    pub fn record(&mut self, pdi_id: u32, location: PdiLocation) {
        self.pdis.retain(|(_, loc)| !loc.same_pdi(&location));
        if self.capacity == 0 {
            return;
        }
        if self.pdis.len() >= self.capacity {
            self.pdis.pop_front();
        }
        self.pdis.push_back((pdi_id, location));
    }

    /// PDIs most recent first
    pub fn iter_recent(&self) -> impl Iterator<Item = &(u32, PdiLocation)> {
        self.pdis.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.pdis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pdis.is_empty()
    }
}
