//! Declarative parallel/sequential execution utilities.
//!
//! The round engine and the direct-call market both fan work out over a
//! collection of independently locked items. These helpers hide the choice
//! between rayon and a plain iterator behind one call, so the `cfg` logic
//! lives here in ONE place.
//!
//! # Runtime Override
//!
//! Every helper takes a `force_sequential` flag. When `true`, execution is
//! sequential even if the `parallel` feature is enabled. The engine wires this
//! to `ParallelizationConfig`, which lets tests compare both modes in one
//! build.
//!
//! # Example
//!
//! ```ignore
//! use parking_lot::Mutex;
//!
//! let counters: Vec<Mutex<u64>> = (0..4).map(Mutex::new).collect();
//! let doubled = parallel::map_mutex_slice(&counters, |c| { *c *= 2; *c }, false);
//! assert_eq!(doubled, vec![0, 2, 4, 6]);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use parking_lot::Mutex;

/// Execute a side-effectful closure for each element, potentially in parallel.
///
/// The closure must be safe to call concurrently (e.g. only touching the
/// element itself through its own lock).
///
/// # Parameters
/// - `force_sequential`: When true, forces sequential execution even if parallel feature is enabled
#[inline]
pub fn for_each_slice<T, F>(slice: &[T], f: F, force_sequential: bool)
where
    T: Sync,
    F: Fn(&T) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().for_each(f);
        } else {
            slice.par_iter().for_each(f);
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().for_each(f);
    }
}

/// Map over a slice of Mutex-wrapped items, locking each.
///
/// Results come back in slice order in both modes (rayon's indexed collect
/// preserves order), which is what lets callers merge per-item output
/// deterministically afterwards.
///
/// # Parameters
/// - `force_sequential`: When true, forces sequential execution even if parallel feature is enabled
#[inline]
pub fn map_mutex_slice<T, F, R>(slice: &[Mutex<T>], f: F, force_sequential: bool) -> Vec<R>
where
    T: Send,
    F: Fn(&mut T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(|m| f(&mut *m.lock())).collect()
        } else {
            slice.par_iter().map(|m| f(&mut *m.lock())).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(|m| f(&mut *m.lock())).collect()
    }
}
