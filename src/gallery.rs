//! Lightbox navigation over a fixed, ordered image collection.
//!
//! [`GalleryNavigator`] is a two-state machine:
//!
//! ```text
//!            open(i)                 next / prev
//!   Closed ──────────▶ Open ◀──┐     (self-loop, wraps around)
//!     ▲                 │ │    │
//!     └──── close() ────┘ └────┘ open(j) re-targets
//! ```
//!
//! `next` and `prev` wrap modulo N and are accepted in either state; while
//! closed nothing is displayed but the index still moves. `close` keeps the
//! index, so a later reopen without an explicit index would resume there.
//!
//! ## Scroll lock
//!
//! While a lightbox is open the page behind it must not scroll. Navigators
//! share a [`ScrollLock`] and hold it exactly while open: acquired on the
//! Closed→Open transition, released on Open→Closed (or when an open
//! navigator is dropped). Opening twice holds it once.

use std::cell::Cell;
use std::fmt;
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GalleryError {
    #[error("Gallery has no images")]
    Empty,
    #[error("Image index {index} out of range for {len} images")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Unknown gallery command '{0}' (expected open:N, next, prev or close)")]
    UnknownCommand(String),
}

/// Page-wide "view mode" flag that suppresses background scrolling.
///
/// Counts holders rather than calls, so several navigators can share it;
/// each navigator holds it at most once.
#[derive(Debug, Default)]
pub struct ScrollLock {
    holders: Cell<usize>,
    acquisitions: Cell<u64>,
}

impl ScrollLock {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }

    /// Total number of times a holder took the lock.
    pub fn acquisitions(&self) -> u64 {
        self.acquisitions.get()
    }

    fn acquire(&self) {
        self.holders.set(self.holders.get() + 1);
        self.acquisitions.set(self.acquisitions.get() + 1);
        tracing::debug!(holders = self.holders.get(), "scroll lock acquired");
    }

    fn release(&self) {
        let holders = self.holders.get();
        debug_assert!(holders > 0, "scroll lock released without a holder");
        self.holders.set(holders.saturating_sub(1));
        tracing::debug!(holders = self.holders.get(), "scroll lock released");
    }
}

/// Snapshot of a navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GalleryState {
    pub is_open: bool,
    pub current_index: usize,
}

#[derive(Debug)]
pub struct GalleryNavigator {
    len: NonZeroUsize,
    state: GalleryState,
    lock: Rc<ScrollLock>,
}

impl GalleryNavigator {
    /// Closed navigator over `len` images, starting at index 0.
    pub fn new(len: usize, lock: Rc<ScrollLock>) -> Result<Self, GalleryError> {
        let len = NonZeroUsize::new(len).ok_or(GalleryError::Empty)?;
        Ok(Self {
            len,
            state: GalleryState::default(),
            lock,
        })
    }

    pub fn image_count(&self) -> usize {
        self.len.get()
    }

    pub fn state(&self) -> GalleryState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// Show image `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of range. Callers derive the index from the rendered
    /// list, so a bad one is a bug upstream and is not clamped.
    pub fn open(&mut self, index: usize) {
        assert!(
            index < self.len.get(),
            "gallery index {index} out of range for {} images",
            self.len
        );
        if !self.state.is_open {
            self.lock.acquire();
        }
        self.state = GalleryState {
            is_open: true,
            current_index: index,
        };
    }

    /// Hide the viewer. The index is kept.
    pub fn close(&mut self) {
        if self.state.is_open {
            self.state.is_open = false;
            self.lock.release();
        }
    }

    pub fn next(&mut self) {
        self.state.current_index = (self.state.current_index + 1) % self.len.get();
    }

    pub fn prev(&mut self) {
        let len = self.len.get();
        self.state.current_index = (self.state.current_index + len - 1) % len;
    }

    /// Indices of the images before and after the current one, with wraparound.
    pub fn neighbors(&self) -> (usize, usize) {
        let len = self.len.get();
        let i = self.state.current_index;
        ((i + len - 1) % len, (i + 1) % len)
    }

    /// The item on display, if open.
    pub fn current<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        if self.state.is_open {
            items.get(self.state.current_index)
        } else {
            None
        }
    }
}

impl Drop for GalleryNavigator {
    fn drop(&mut self) {
        self.close();
    }
}

/// A user action on the lightbox, as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryCommand {
    Open(usize),
    Next,
    Prev,
    Close,
}

impl GalleryCommand {
    /// Apply to a navigator, rejecting an out-of-range open instead of panicking.
    pub fn apply(self, nav: &mut GalleryNavigator) -> Result<(), GalleryError> {
        match self {
            GalleryCommand::Open(index) if index >= nav.image_count() => {
                Err(GalleryError::IndexOutOfRange {
                    index,
                    len: nav.image_count(),
                })
            }
            GalleryCommand::Open(index) => {
                nav.open(index);
                Ok(())
            }
            GalleryCommand::Next => {
                nav.next();
                Ok(())
            }
            GalleryCommand::Prev => {
                nav.prev();
                Ok(())
            }
            GalleryCommand::Close => {
                nav.close();
                Ok(())
            }
        }
    }
}

impl FromStr for GalleryCommand {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || GalleryError::UnknownCommand(s.to_string());
        match s.trim() {
            "next" => Ok(GalleryCommand::Next),
            "prev" => Ok(GalleryCommand::Prev),
            "close" => Ok(GalleryCommand::Close),
            other => other
                .strip_prefix("open:")
                .and_then(|n| n.parse().ok())
                .map(GalleryCommand::Open)
                .ok_or_else(unknown),
        }
    }
}

impl fmt::Display for GalleryCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryCommand::Open(i) => write!(f, "open:{i}"),
            GalleryCommand::Next => f.write_str("next"),
            GalleryCommand::Prev => f.write_str("prev"),
            GalleryCommand::Close => f.write_str("close"),
        }
    }
}
