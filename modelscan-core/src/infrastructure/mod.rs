//! Infrastructure: provider clients and AWS request signing

pub mod aws;
pub mod model;
