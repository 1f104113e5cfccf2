// bparam library surface, shared by the binary and integration tests

pub mod listing;
pub mod logging;
