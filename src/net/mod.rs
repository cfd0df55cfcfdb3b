//! Sensor resource access
//!
//! A [`ResourceClient`] performs one request/response exchange and hands
//! back the raw payload; [`decode`] turns that payload into a reading.

pub mod coap;

pub use coap::{CoapClient, Endpoint};

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Failure of a single fetch
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Endpoint unreachable (resolve, bind, send or receive failed)
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),
    /// No matching response within the request timeout
    #[error("no response within {0:?}")]
    Timeout(Duration),
    /// A response arrived but could not be used
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Payload did not hold a decimal integer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload is empty")]
    Empty,
    #[error("payload is not valid UTF-8")]
    NotUtf8,
    #[error("payload {0:?} is not an integer")]
    NotInteger(String),
}

/// One request/response exchange against a fixed resource
pub trait ResourceClient {
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, NetworkError>> + Send;

    /// Human-readable target for logs
    fn describe(&self) -> String;
}

/// Parse a payload as a base-10 integer string (surrounding whitespace ignored)
pub fn decode(payload: &[u8]) -> Result<i64, DecodeError> {
    let text = std::str::from_utf8(payload).map_err(|_| DecodeError::NotUtf8)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }
    text.parse::<i64>()
        .map_err(|_| DecodeError::NotInteger(text.to_string()))
}
