//! The `{"data": ...}` envelope for admin write responses.
//!
//! Read routes serialize a [`crate::content::ContentView`] instead, which
//! carries the same `data` key next to its loading and error fields.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
