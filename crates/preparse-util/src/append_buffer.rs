//! Growable append-only buffer of fixed-width cells.
//!
//! The recorder keeps two of these: one of `u32` cells for function entries
//! or the error message, one of bytes for the encoded symbol stream. Cells
//! are only ever appended or discarded wholesale with [`AppendBuffer::reset`];
//! finalization copies the contents out with [`AppendBuffer::write_to`].

/// Append-only sequence of `Copy` cells.
///
/// # Example
///
/// ```
/// use preparse_util::AppendBuffer;
///
/// let mut cells: AppendBuffer<u32> = AppendBuffer::new();
/// cells.add(5);
/// cells.add_block(&[10, 0]);
///
/// let mut out = [0u32; 3];
/// cells.write_to(&mut out);
/// assert_eq!(out, [5, 10, 0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppendBuffer<T> {
    cells: Vec<T>,
}

impl<T: Copy> AppendBuffer<T> {
    #[inline]
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// Appends a single cell.
    #[inline]
    pub fn add(&mut self, value: T) {
        self.cells.push(value);
    }

    /// Appends `block` and returns the stored copy.
    pub fn add_block(&mut self, block: &[T]) -> &[T] {
        let start = self.cells.len();
        self.cells.extend_from_slice(block);
        &self.cells[start..]
    }

    /// Appends `count` copies of `value`.
    pub fn add_repeated(&mut self, count: usize, value: T) {
        self.cells.resize(self.cells.len() + count, value);
    }

    /// Discards every cell, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.cells.clear();
    }

    /// Number of cells appended since creation or the last reset.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Copies every cell into `destination`.
    ///
    /// # Panics
    ///
    /// Panics if `destination.len()` differs from [`len`](Self::len).
    pub fn write_to(&self, destination: &mut [T]) {
        assert_eq!(
            destination.len(),
            self.cells.len(),
            "destination must hold exactly {} cells",
            self.cells.len()
        );
        destination.copy_from_slice(&self.cells);
    }
}
