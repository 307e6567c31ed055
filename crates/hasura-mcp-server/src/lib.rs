pub mod errors;
pub mod graphql;
pub mod hasura;
pub mod json_schema;
pub mod server;
pub mod tools;
