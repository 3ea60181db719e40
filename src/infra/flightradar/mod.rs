mod client;

pub use client::FlightRadarSource;
