//! Terminal control panel for the Bot Control Service.
//!
//! The panel routines ([`router`], [`sync`], [`poller`], [`logs`]) operate on
//! the in-memory [`panel::Panel`] model through a [`service::BotService`].
//! [`app::PanelApp`] drives them on one thread; [`console`] draws the result.

pub mod app;
pub mod cli;
pub mod config;
pub mod console;
pub mod diagnostics;
pub mod logs;
pub mod panel;
pub mod poller;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod sync;
