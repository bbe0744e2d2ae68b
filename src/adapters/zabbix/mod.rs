mod client;
mod protocol;

pub use client::ZabbixClient;
