//! Clients for the remote services the reconciler depends on.
//!
//! The Google Calendar client performs event/calendar CRUD with bounded
//! credential renewal; the posmon client fetches the monitoring feed
//! snapshot.

pub mod google;
pub mod posmon;
