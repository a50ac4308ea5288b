// User profiles: the stored hourly rate read by pricing::rate_lookup.

pub mod handlers;
pub mod store;
