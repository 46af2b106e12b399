pub mod common;
mod steam_client_wire;
