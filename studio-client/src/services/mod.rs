pub mod context_client;
