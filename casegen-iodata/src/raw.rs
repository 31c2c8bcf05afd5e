//! Conversion between managed values and the sentinel-terminated raw
//! pointer convention.
//!
//! Consumers without dynamic containers receive their parameters in a C
//! calling convention: a dimension-0 value is a single heap cell (text is a
//! NUL-terminated byte buffer), a dimension-D value is a heap array of
//! `len + 1` pointers to dimension D-1 buffers whose last slot is a null
//! sentinel. No length is stored anywhere; the sentinel scan is the only
//! way to recover it. This is strictly an in-process calling convention,
//! never a wire format.

use std::alloc::{alloc, dealloc, Layout};
use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::data::{Scalar, ScalarKind, Shape, Value};
use crate::error::IoDataError;

/// Raw allocations currently alive, across every `RawView`.
static LIVE_ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

/// The number of raw-buffer allocations currently alive.
///
/// Every cell, text buffer and pointer array counts as one allocation. The
/// counter is global, so it goes back to its previous reading once a view
/// is released; tests use it to verify that nothing leaks.
pub fn live_raw_allocations() -> usize {
    LIVE_ALLOCATIONS.load(Ordering::SeqCst)
}

/// An owned raw representation of a [`Value`].
///
/// The view is the borrow phase of the two-phase contract: while it is
/// alive [`RawView::as_ptr`] stays valid and foreign code may walk the
/// buffers freely. Releasing the view, either with [`RawView::release`] or
/// by dropping it, frees every allocation reachable from the root exactly
/// once. Taking `self` by value makes a second release unrepresentable, so
/// the exactly-once free contract of the convention is enforced by
/// ownership instead of by caller discipline.
pub struct RawView {
    /// The shape the view was built with; drives every recursive walk.
    shape: Shape,
    /// Type-erased root pointer.
    root: *mut c_void,
}

impl RawView {
    /// Convert `value` into freshly allocated raw storage.
    ///
    /// The value must match `shape`. On any failure every allocation made
    /// up to that point is released before the error is returned, so a
    /// failed conversion never leaks.
    pub fn from_value(value: &Value, shape: Shape) -> Result<RawView, IoDataError> {
        let root = alloc_value(value, shape)?;
        trace!("built raw view of a {} value", shape);
        Ok(RawView { shape, root })
    }

    /// The root pointer of the raw representation.
    ///
    /// Valid until the view is released. For dimension 0 this points to a
    /// single cell (or to the first byte of a NUL-terminated text buffer),
    /// otherwise to the first slot of the sentinel-terminated pointer
    /// array.
    pub fn as_ptr(&self) -> *const c_void {
        self.root
    }

    /// The shape the view was built with.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Rebuild the managed value by walking the raw storage, discovering
    /// every length from the sentinel positions.
    pub fn to_value(&self) -> Value {
        // SAFETY: root was produced by alloc_value with self.shape and is
        // still alive.
        unsafe { read_value(self.root, self.shape) }
    }

    /// Release the raw storage, consuming the view.
    ///
    /// Dropping the view is equivalent; this form only makes the release
    /// point explicit at the call site.
    pub fn release(self) {}
}

impl Drop for RawView {
    fn drop(&mut self) {
        // SAFETY: root was produced by alloc_value with self.shape, and
        // ownership guarantees this runs exactly once.
        unsafe { free_value(self.root, self.shape) }
        trace!("released raw view of a {} value", self.shape);
    }
}

/// Allocate `layout`, counting it, failing when the allocator reports an
/// exhausted heap instead of aborting the process.
fn checked_alloc(layout: Layout) -> Result<*mut u8, IoDataError> {
    // SAFETY: every layout used here has non-zero size, the smallest is a
    // one-byte cell.
    let ptr = unsafe { alloc(layout) };
    if ptr.is_null() {
        return Err(IoDataError::AllocationFailure);
    }
    LIVE_ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
    Ok(ptr)
}

/// Release one counted allocation.
///
/// # Safety
///
/// `ptr` must come from a `checked_alloc` of the same `layout`.
unsafe fn counted_dealloc(ptr: *mut u8, layout: Layout) {
    LIVE_ALLOCATIONS.fetch_sub(1, Ordering::SeqCst);
    dealloc(ptr, layout);
}

fn pointer_array_layout(slots: usize) -> Result<Layout, IoDataError> {
    Layout::array::<*mut c_void>(slots).map_err(|_| IoDataError::AllocationFailure)
}

fn alloc_value(value: &Value, shape: Shape) -> Result<*mut c_void, IoDataError> {
    if shape.dimension == 0 {
        return match value {
            Value::Scalar(scalar) if scalar.kind() == shape.kind => alloc_scalar(scalar),
            _ => Err(IoDataError::ShapeMismatch),
        };
    }
    let items = match value {
        Value::Array(items) => items,
        Value::Scalar(_) => return Err(IoDataError::ShapeMismatch),
    };
    let layout = pointer_array_layout(items.len() + 1)?;
    let array = checked_alloc(layout)? as *mut *mut c_void;
    // SAFETY: the array has items.len() + 1 slots.
    unsafe {
        array.add(items.len()).write(ptr::null_mut());
        for (index, item) in items.iter().enumerate() {
            match alloc_value(item, shape.inner()) {
                Ok(child) => array.add(index).write(child),
                Err(err) => {
                    // Free the part already built before propagating.
                    for built in 0..index {
                        free_value(*array.add(built), shape.inner());
                    }
                    counted_dealloc(array as *mut u8, layout);
                    return Err(err);
                }
            }
        }
    }
    Ok(array as *mut c_void)
}

fn alloc_scalar(scalar: &Scalar) -> Result<*mut c_void, IoDataError> {
    // SAFETY: each cell is written right after its successful allocation,
    // with the type its layout was made for.
    unsafe {
        Ok(match scalar {
            Scalar::Int(value) => {
                let cell = checked_alloc(Layout::new::<i32>())? as *mut i32;
                cell.write(*value);
                cell as *mut c_void
            }
            Scalar::Long(value) => {
                let cell = checked_alloc(Layout::new::<i64>())? as *mut i64;
                cell.write(*value);
                cell as *mut c_void
            }
            Scalar::Float(value) => {
                let cell = checked_alloc(Layout::new::<f32>())? as *mut f32;
                cell.write(*value);
                cell as *mut c_void
            }
            Scalar::Double(value) => {
                let cell = checked_alloc(Layout::new::<f64>())? as *mut f64;
                cell.write(*value);
                cell as *mut c_void
            }
            Scalar::Bool(value) => {
                let cell = checked_alloc(Layout::new::<u8>())?;
                cell.write(*value as u8);
                cell as *mut c_void
            }
            Scalar::Text(text) => alloc_text(text)?,
        })
    }
}

/// Allocate an owned NUL-terminated copy of `text`.
fn alloc_text(text: &[u8]) -> Result<*mut c_void, IoDataError> {
    if text.contains(&0) {
        return Err(IoDataError::EmbeddedNul);
    }
    let layout = Layout::array::<u8>(text.len() + 1).map_err(|_| IoDataError::AllocationFailure)?;
    let buffer = checked_alloc(layout)?;
    // SAFETY: the buffer has text.len() + 1 bytes.
    unsafe {
        ptr::copy_nonoverlapping(text.as_ptr(), buffer, text.len());
        buffer.add(text.len()).write(0);
    }
    Ok(buffer as *mut c_void)
}

/// Recursively release a raw tree.
///
/// # Safety
///
/// `ptr` must be the root of a tree built by `alloc_value` with this
/// `shape`, not released before.
unsafe fn free_value(ptr: *mut c_void, shape: Shape) {
    if shape.dimension == 0 {
        free_scalar(ptr, shape.kind);
        return;
    }
    let array = ptr as *mut *mut c_void;
    let mut len = 0;
    while !(*array.add(len)).is_null() {
        free_value(*array.add(len), shape.inner());
        len += 1;
    }
    let layout = Layout::array::<*mut c_void>(len + 1).expect("layout already allocated");
    counted_dealloc(array as *mut u8, layout);
}

unsafe fn free_scalar(ptr: *mut c_void, kind: ScalarKind) {
    let layout = match kind {
        ScalarKind::Int => Layout::new::<i32>(),
        ScalarKind::Long => Layout::new::<i64>(),
        ScalarKind::Float => Layout::new::<f32>(),
        ScalarKind::Double => Layout::new::<f64>(),
        ScalarKind::Bool => Layout::new::<u8>(),
        ScalarKind::Text => {
            let buffer = ptr as *mut u8;
            Layout::array::<u8>(text_len(buffer) + 1).expect("layout already allocated")
        }
    };
    counted_dealloc(ptr as *mut u8, layout);
}

/// Length of a NUL-terminated text buffer, terminator excluded.
///
/// # Safety
///
/// `buffer` must point to a NUL-terminated allocation.
unsafe fn text_len(buffer: *const u8) -> usize {
    let mut len = 0;
    while *buffer.add(len) != 0 {
        len += 1;
    }
    len
}

/// Rebuild a managed value from a raw tree.
///
/// # Safety
///
/// `ptr` must be the root of a live tree built by `alloc_value` with this
/// `shape`.
unsafe fn read_value(ptr: *const c_void, shape: Shape) -> Value {
    if shape.dimension == 0 {
        return Value::Scalar(read_scalar(ptr, shape.kind));
    }
    let array = ptr as *const *const c_void;
    let mut items = Vec::new();
    let mut index = 0;
    while !(*array.add(index)).is_null() {
        items.push(read_value(*array.add(index), shape.inner()));
        index += 1;
    }
    Value::Array(items)
}

unsafe fn read_scalar(ptr: *const c_void, kind: ScalarKind) -> Scalar {
    match kind {
        ScalarKind::Int => Scalar::Int(*(ptr as *const i32)),
        ScalarKind::Long => Scalar::Long(*(ptr as *const i64)),
        ScalarKind::Float => Scalar::Float(*(ptr as *const f32)),
        ScalarKind::Double => Scalar::Double(*(ptr as *const f64)),
        ScalarKind::Bool => Scalar::Bool(*(ptr as *const u8) != 0),
        ScalarKind::Text => {
            let buffer = ptr as *const u8;
            let len = text_len(buffer);
            let mut text = Vec::with_capacity(len);
            for offset in 0..len {
                text.push(*buffer.add(offset));
            }
            Scalar::Text(text)
        }
    }
}
