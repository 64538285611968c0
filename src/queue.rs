//! Portable bounded request queue for `no_std` environments.
//!
//! Serial handlers and other interrupt-context producers park pattern
//! strings, trigger forces and property updates here; the engine's
//! executor drains them between ticks with
//! [`PatternEngine::apply_requests`](crate::PatternEngine::apply_requests).
//! Built on `critical-section` and `heapless::Deque`, so it is safe to
//! share between threads and interrupts.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::{Deque, String};

/// Longest pattern string a queued request can carry.
pub const MAX_PATTERN_LEN: usize = 128;

/// One unit of work handed to the engine executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineRequest {
    /// Execute a pattern string
    Pattern(String<MAX_PATTERN_LEN>),
    /// Fire externally triggered layers with this force
    TriggerForce(i16),
    /// Update the external hue/whiteness values
    ColorProperty { degree_hue: u16, pcent_white: u8 },
    /// Update the external pixel-count percentage
    CountProperty(u8),
    /// Update the engine's maximum brightness
    Brightness(u8),
}

/// Error returned when trying to send to a full queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrySendError(pub EngineRequest);

/// Error returned when trying to receive from an empty queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// A bounded, thread-safe queue of engine requests.
///
/// Synchronized with critical sections, making it suitable for embedded
/// environments where producers run in interrupt context.
pub struct RequestQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<EngineRequest, SIZE>>>,
}

impl<const SIZE: usize> RequestQueue<SIZE> {
    /// Create a new empty queue.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this queue.
    ///
    /// Multiple senders can coexist; they share access to the same queue.
    pub const fn sender(&self) -> RequestSender<'_, SIZE> {
        RequestSender { queue: self }
    }

    /// Get a receiver handle for this queue.
    pub const fn receiver(&self) -> RequestReceiver<'_, SIZE> {
        RequestReceiver { queue: self }
    }

    /// Try to send a request into the queue.
    ///
    /// Returns `Err(TrySendError(request))` if the queue is full.
    pub fn try_send(&self, request: EngineRequest) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(request).map_err(TrySendError)
        })
    }

    /// Try to receive a request from the queue.
    ///
    /// Returns `Err(TryReceiveError)` if the queue is empty.
    pub fn try_receive(&self) -> Result<EngineRequest, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }
}

impl<const SIZE: usize> Default for RequestQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`RequestQueue`].
///
/// This is a lightweight reference that can be cloned and passed around.
#[derive(Clone, Copy)]
pub struct RequestSender<'a, const SIZE: usize> {
    queue: &'a RequestQueue<SIZE>,
}

impl<const SIZE: usize> RequestSender<'_, SIZE> {
    /// Try to send a request into the queue.
    pub fn try_send(&self, request: EngineRequest) -> Result<(), TrySendError> {
        self.queue.try_send(request)
    }

    /// Queue a pattern string for execution.
    ///
    /// Fails when the text does not fit [`MAX_PATTERN_LEN`] or the queue
    /// is full.
    pub fn send_pattern(&self, pattern: &str) -> Result<(), TrySendError> {
        let mut text = String::new();
        text.push_str(pattern)
            .map_err(|()| TrySendError(EngineRequest::Pattern(String::new())))?;
        self.try_send(EngineRequest::Pattern(text))
    }
}

/// A receiver handle for a [`RequestQueue`].
#[derive(Clone, Copy)]
pub struct RequestReceiver<'a, const SIZE: usize> {
    queue: &'a RequestQueue<SIZE>,
}

impl<const SIZE: usize> RequestReceiver<'_, SIZE> {
    /// Try to receive a request from the queue.
    pub fn try_receive(&self) -> Result<EngineRequest, TryReceiveError> {
        self.queue.try_receive()
    }
}
