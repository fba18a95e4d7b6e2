//! Innovation Board - advisory session client
//!
//! A user asks a question, answers a short run of backend-generated probing
//! questions and receives advice attributed to a fixed roster of personas.
//! This crate implements the client side of that flow: the session step
//! machine and the advisory backend protocol, including the bounded advice
//! poll loop.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
