//! HTTP controller endpoints for the poscal API.
//!
//! Controllers handle HTTP requests, interact with the services, and return
//! appropriate HTTP responses. Session handling lives outside this service,
//! so endpoints acting on behalf of a character take the character id as an
//! explicit query parameter.

pub mod admin;
pub mod calendar;
pub mod tower;
