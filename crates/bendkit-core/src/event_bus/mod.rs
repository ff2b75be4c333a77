//! # Event Bus Module
//!
//! Publish/subscribe channel between the engine and its UI collaborator.
//!
//! - Publishers emit typed [`EngineEvent`]s without knowing subscribers
//! - Subscribers filter by [`EventCategory`]
//! - Both synchronous handlers and async receivers are supported
//!
//! ```rust,ignore
//! use bendkit_core::event_bus::{EventBus, EventFilter, EventCategory, EngineEvent};
//! use std::sync::Arc;
//!
//! let bus = Arc::new(EventBus::new());
//! let id = bus.subscribe(EventFilter::Categories(vec![EventCategory::Status]), |event| {
//!     println!("{}", event.description());
//! });
//! bus.publish(EngineEvent::info("Ready")).ok();
//! bus.unsubscribe(id);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
