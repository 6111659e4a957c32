//! pluglib-test-harness: test utilities for pluglib.
//!
//! Provides [`MockRadioMemory`], an in-memory implementation of the
//! [`MemoryTransport`](pluglib_core::MemoryTransport) trait, so codeplug
//! read/write flows can be exercised deterministically without a radio on
//! the bench.

pub mod mock_memory;

pub use mock_memory::MockRadioMemory;
