//! # Thread Utilities

use std::thread;

/// Get the max parallelism available.
///
/// Honors ``RAYON_NUM_THREADS`` when the "rayon" feature is enabled.
pub fn est_max_parallelism() -> usize {
    let default = || {
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    };

    #[cfg(feature = "rayon")]
    {
        match std::env::var("RAYON_NUM_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            Some(x @ 1..) => x,
            _ => default(),
        }
    }

    #[cfg(not(feature = "rayon"))]
    default()
}
