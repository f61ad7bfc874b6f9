mod client;

pub use client::{create, Client, Error, MockClient};
