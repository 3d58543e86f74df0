//! # Concurrency Support
//!
//! Pretokenization is the only parallel phase; the merge loop is sequential.
//! Both phases observe a shared [`CancelFlag`].

mod cancel_flag;
mod threads;

#[doc(inline)]
pub use cancel_flag::CancelFlag;
#[doc(inline)]
pub use threads::est_max_parallelism;
