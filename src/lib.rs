//! Sales chat conversation engine
//!
//! The engine behind the IT-support site's chat widget: a pure conversation
//! store, a controller that gates the scripted Q&A behind lead capture, and
//! a runtime that simulates the bot's typing delay.

pub mod clock;
pub mod config;
pub mod controller;
pub mod runtime;
pub mod script;
pub mod state_machine;
pub mod topics;
pub mod validation;
