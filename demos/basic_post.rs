//! # Example: basic_post
//!
//! Minimal example of posting a typed notification through the shared
//! default dispatcher.
//!
//! Demonstrates how to:
//! - Define a notification type with the [`Notification`] marker.
//! - Register an unbound listener with [`Listener::rc`].
//! - Post and observe synchronous, in-order delivery.
//!
//! ## Flow
//! ```text
//! main ──► default_dispatcher()
//!     ├─► add_listener(Listener::rc(...), None)
//!     ├─► post_notification(&FileSaved, None)
//!     │     └─► handler runs before post returns
//!     └─► remove_listener(...)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_post
//! RUST_LOG=trace cargo run --example basic_post   # with dispatcher tracing
//! ```

use noticenter::{default_dispatcher, Listener, Notification};

struct FileSaved {
    path: String,
    bytes: usize,
}
impl Notification for FileSaved {}

fn main() {
    env_logger::init();

    let dispatcher = default_dispatcher();

    let listener = dispatcher.add_listener(
        Listener::rc(|n: &FileSaved| {
            println!("[saved] path={} bytes={}", n.path, n.bytes);
        }),
        None,
    );

    dispatcher.post_notification(
        &FileSaved {
            path: "/tmp/draft.md".into(),
            bytes: 1_204,
        },
        None,
    );
    dispatcher.post_notification(
        &FileSaved {
            path: "/tmp/final.md".into(),
            bytes: 1_812,
        },
        None,
    );

    dispatcher.remove_listener(&listener, None);
    println!("done");
}
