pub mod connection;
pub mod mock_database;
