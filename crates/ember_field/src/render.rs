//! Renderer seam
//!
//! The simulator never talks to a graphics API directly. It hands borrowed
//! [`FieldBuffers`] to a [`FieldRenderer`], which owns whatever device-side
//! storage it needs behind an opaque handle. Handles are allocated once per
//! field and released exactly once when the field is replaced or disposed.

use ember_core::{Rgb, Vec3};

/// Borrowed, GPU-ready views of a field's particle buffers
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldBuffers<'a> {
    pub positions: &'a [Vec3],
    pub sizes: &'a [f32],
    pub colors: &'a [Rgb],
}

impl<'a> FieldBuffers<'a> {
    /// Views over no particles
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions as packed `f32 x 3` bytes
    pub fn position_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.positions)
    }

    pub fn size_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.sizes)
    }

    /// Colors as packed `f32 x 3` bytes
    pub fn color_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.colors)
    }
}

/// Backend that mirrors particle buffers on the device
pub trait FieldRenderer {
    /// Device-side storage for one field
    type Handle;

    /// Create storage for `buffers` and upload all of them
    fn allocate(&mut self, buffers: &FieldBuffers<'_>) -> Self::Handle;

    /// Refresh storage after a tick. Sizes and colors never change for a
    /// handle, so only positions need to be written.
    fn upload(&mut self, handle: &Self::Handle, buffers: &FieldBuffers<'_>);

    /// Free the storage behind `handle`
    fn release(&mut self, handle: Self::Handle);
}

/// Renderer that keeps nothing on a device
///
/// Used for tests, benchmarks and server-side simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl FieldRenderer for Headless {
    type Handle = ();

    fn allocate(&mut self, _buffers: &FieldBuffers<'_>) {}

    fn upload(&mut self, _handle: &(), _buffers: &FieldBuffers<'_>) {}

    fn release(&mut self, _handle: ()) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_views_are_packed() {
        let positions = [Vec3::new(1.0, 2.0, 3.0); 4];
        let sizes = [1.5f32; 4];
        let colors = [Rgb::new(1.0, 0.0, 0.0); 4];
        let buffers = FieldBuffers {
            positions: &positions,
            sizes: &sizes,
            colors: &colors,
        };
        assert_eq!(buffers.len(), 4);
        assert_eq!(buffers.position_bytes().len(), 4 * 12);
        assert_eq!(buffers.size_bytes().len(), 4 * 4);
        assert_eq!(buffers.color_bytes().len(), 4 * 12);
    }

    #[test]
    fn test_empty_buffers() {
        let buffers = FieldBuffers::empty();
        assert!(buffers.is_empty());
        assert!(buffers.position_bytes().is_empty());
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::{FieldBuffers, FieldRenderer};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared log of renderer calls, readable after the renderer is dropped
    #[derive(Debug, Default)]
    pub struct Ledger {
        next: u32,
        pub live: Vec<u32>,
        pub released: Vec<u32>,
        /// `(handle, particle count)` per allocation
        pub allocations: Vec<(u32, usize)>,
        pub uploads: usize,
    }

    #[derive(Clone, Debug, Default)]
    pub struct RecordingRenderer {
        pub ledger: Rc<RefCell<Ledger>>,
    }

    impl FieldRenderer for RecordingRenderer {
        type Handle = u32;

        fn allocate(&mut self, buffers: &FieldBuffers<'_>) -> u32 {
            let mut ledger = self.ledger.borrow_mut();
            let handle = ledger.next;
            ledger.next += 1;
            ledger.live.push(handle);
            ledger.allocations.push((handle, buffers.len()));
            handle
        }

        fn upload(&mut self, handle: &u32, _buffers: &FieldBuffers<'_>) {
            let mut ledger = self.ledger.borrow_mut();
            assert!(ledger.live.contains(handle), "upload to dead handle {handle}");
            ledger.uploads += 1;
        }

        fn release(&mut self, handle: u32) {
            let mut ledger = self.ledger.borrow_mut();
            let index = ledger
                .live
                .iter()
                .position(|&h| h == handle)
                .unwrap_or_else(|| panic!("handle {handle} released twice"));
            ledger.live.remove(index);
            ledger.released.push(handle);
        }
    }
}
