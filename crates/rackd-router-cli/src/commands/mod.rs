pub mod dispatch;
pub mod resolve;
pub mod routes;
