// Application layer - Feed ports, storm processing and update cycles
pub mod earthquake_feed;
pub mod earthquake_service;
pub mod feed_error;
pub mod hurricane_feed;
pub mod hurricane_service;
pub mod layer_service;
pub mod orbit_feed;
pub mod orbit_service;
pub mod poller;
pub mod snapshot_channel;
pub mod storm_processor;
