// Copyright 2026 The webid Authors.
//
// Permission to use, copy, modify, and/or distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHORS DISCLAIM ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR
// ANY SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN
// ACTION OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF
// OR IN CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.

//! Bounding identity resolution in time and in concurrency.

use crate::{ResolveError, Triple};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

/// The time limit used by [`Timeout::with_default_limit`].
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// The default number of resolutions a [`Timeout`] lets run at once,
/// counting abandoned ones that have not yet stopped.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 32;

/// Tells a resolver when to give up.
///
/// A resolver should pass [`remaining`](Self::remaining) to its I/O as a
/// timeout and return early once [`is_cancelled`](Self::is_cancelled) turns
/// true. Its result is discarded by then anyway.
#[derive(Clone, Debug)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
    deadline: Instant,
}

impl Cancellation {
    fn new(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline,
        }
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether the caller stopped waiting or the deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire) || Instant::now() >= self.deadline
    }

    /// When the caller stops waiting.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// The time left before the deadline; zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// An identity resolver with a wall-clock time limit and a cap on how many
/// resolutions may run at once.
///
/// Each resolution runs on its own thread. When the limit passes first the
/// caller gets [`ResolveError::TimedOut`] immediately and the resolver's
/// [`Cancellation`] fires. A resolver that ignores it keeps its thread, and
/// its slot, until it returns; once all slots are taken new resolutions fail
/// fast with [`ResolveError::TooManyInFlight`] instead of spawning more.
///
/// ```
/// use std::time::Duration;
/// use webid::{Cancellation, ResolveError, Timeout, Triple};
///
/// let resolver = Timeout::new(
///     |_uri: &str, _cancel: &Cancellation| Ok::<_, ResolveError>(Vec::<Triple>::new()),
///     Duration::from_secs(5),
/// );
/// assert!(resolver.resolve("https://alice.example/#me").unwrap().is_empty());
/// ```
pub struct Timeout<F> {
    resolver: Arc<F>,
    limit: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

// Holds one in-flight slot for as long as the resolver thread runs,
// including when the resolver panics.
struct Slot(Arc<AtomicUsize>);

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<F, I> Timeout<F>
where
    F: Fn(&str, &Cancellation) -> Result<I, ResolveError> + Send + Sync + 'static,
    I: IntoIterator<Item = Triple>,
{
    /// Wraps `resolver` so that each resolution takes at most `limit`.
    pub fn new(resolver: F, limit: Duration) -> Self {
        Self {
            resolver: Arc::new(resolver),
            limit,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wraps `resolver` with [`DEFAULT_RESOLVE_TIMEOUT`].
    pub fn with_default_limit(resolver: F) -> Self {
        Self::new(resolver, DEFAULT_RESOLVE_TIMEOUT)
    }

    /// Sets how many resolutions may run at once. At least one is always
    /// allowed.
    pub fn max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Resolves `identity`, giving up once the time limit has passed.
    ///
    /// The triples are collected on the resolving thread before they are
    /// handed back.
    pub fn resolve(&self, identity: &str) -> Result<Vec<Triple>, ResolveError> {
        let slot = self.acquire_slot()?;
        let cancellation = Cancellation::new(Instant::now() + self.limit);

        // Capacity 1 so that a late answer never blocks the abandoned thread.
        let (sender, receiver) = mpsc::sync_channel(1);
        let resolver = Arc::clone(&self.resolver);
        let owned_identity = identity.to_owned();
        let thread_cancellation = cancellation.clone();

        let _ = thread::Builder::new()
            .name("webid-resolve".into())
            .spawn(move || {
                let _slot = slot;
                let result = resolver(&owned_identity, &thread_cancellation)
                    .map(|triples| triples.into_iter().collect::<Vec<_>>());
                // Fails only when the caller stopped waiting.
                let _ = sender.send(result);
            })
            .map_err(ResolveError::fetch)?;

        match receiver.recv_timeout(self.limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                cancellation.cancel();
                warn!(identity, limit = ?self.limit, "WebID profile resolution timed out");
                Err(ResolveError::TimedOut(self.limit))
            }
            // The resolver panicked.
            Err(RecvTimeoutError::Disconnected) => Err(ResolveError::Aborted),
        }
    }

    fn acquire_slot(&self) -> Result<Slot, ResolveError> {
        let previous = self.in_flight.fetch_add(1, Ordering::AcqRel);
        let slot = Slot(Arc::clone(&self.in_flight));
        if previous >= self.max_in_flight {
            warn!(
                in_flight = previous,
                max_in_flight = self.max_in_flight,
                "too many WebID profile resolutions in flight"
            );
            return Err(ResolveError::TooManyInFlight(self.max_in_flight));
        }
        Ok(slot)
    }
}

impl<F> Timeout<F> {
    /// The time limit.
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// The number of resolutions currently running, including abandoned
    /// ones that have not returned yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}
