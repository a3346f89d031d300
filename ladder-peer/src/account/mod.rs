mod account_client;

pub use account_client::{AccountClient, http_base};
