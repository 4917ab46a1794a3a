//! # Change Notifications
//!
//! The observer plumbing between the form model and its side-effect
//! subscribers: a typed broadcast [`ChangeBus`] plus a [`debounce`]
//! combinator implementing a cancelable quiescence window.
//!
//! Mutations happen synchronously on the thread driving user input; this
//! crate only carries the *notifications* of those mutations. The debounce
//! timer is the single suspension point in the system: each new value
//! re-arms the window, superseded values are discarded (last-value-wins)
//! and the subscriber observes at most one emission per quiescent period.
//!
//! # Example
//!
//! ```rust
//! use regkit_events::{ChangeBus, recv_change};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Edited { field: &'static str }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = ChangeBus::new();
//!     let mut rx = bus.subscribe();
//!     bus.publish(Edited { field: "email" });
//!
//!     let event = recv_change(&mut rx).await.unwrap();
//!     assert_eq!(event.field, "email");
//! }
//! ```

mod bus;
mod debounce;

pub use bus::{ChangeBus, Event, recv_change};
pub use debounce::{debounce, debounce_filtered};
